pub mod health;
pub mod metrics;
mod patient;

use axum::{Router, routing::get};

use crate::db::PatientStore;
use crate::service::PatientService;

/// Base path of the patient API
pub const BASE_PATH: &str = "/api/patients";

/// Build patient routes
pub fn patient_routes<S: PatientStore>() -> Router<PatientService<S>> {
    Router::new()
        .route(
            "/api/patients",
            get(patient::list::<S>).post(patient::create::<S>),
        )
        .route(
            "/api/patients/health",
            get(health::check::<S>)
                .put(patient::update::<S>)
                .delete(patient::delete::<S>),
        )
        .route(
            "/api/patients/{id}",
            get(patient::read::<S>)
                .put(patient::update::<S>)
                .delete(patient::delete::<S>),
        )
}
