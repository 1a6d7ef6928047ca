use serde::{Deserialize, Serialize};

use crate::error::{ValidationFailed, Violation};

/// Category of a failed request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    Invalid,
    NotFound,
    Exception,
}

/// JSON body returned with every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl Outcome {
    pub fn new(kind: OutcomeKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
            violations: Vec::new(),
        }
    }

    /// Malformed request body
    pub fn invalid(message: &str) -> Self {
        Self::new(OutcomeKind::Invalid, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(OutcomeKind::NotFound, message)
    }

    pub fn exception(message: &str) -> Self {
        Self::new(OutcomeKind::Exception, message)
    }

    /// One entry per violated field constraint
    pub fn validation(failed: &ValidationFailed) -> Self {
        Self {
            kind: OutcomeKind::Invalid,
            message: failed.to_string(),
            violations: failed.violations.clone(),
        }
    }
}
