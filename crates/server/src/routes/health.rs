//! Health check endpoint

use axum::extract::State;

use crate::db::PatientStore;
use crate::error::AppError;
use crate::service::PatientService;

/// GET /api/patients/health - Report liveness and the stored patient count
pub async fn check<S: PatientStore>(
    State(service): State<PatientService<S>>,
) -> Result<String, AppError> {
    let count = service.count().await?;
    Ok(format!("Patient Service is running. Total patients: {}", count))
}
