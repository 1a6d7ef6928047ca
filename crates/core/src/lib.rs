//! patient-core: Patient domain types and validation
//!
//! This crate provides the types shared by the patient server and its
//! outbound client: the `Patient` record, the unvalidated `PatientPayload`,
//! field validation and the JSON error body.

pub mod error;
pub mod outcome;
pub mod patient;
pub mod validation;

pub use error::{ValidationFailed, Violation};
pub use outcome::{Outcome, OutcomeKind};
pub use patient::{Gender, Patient, PatientPayload};
pub use validation::validate;
