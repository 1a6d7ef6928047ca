//! Patient HTTP handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::NaiveDate;
use patient_core::{PatientPayload, validate};

use super::BASE_PATH;
use crate::db::PatientStore;
use crate::error::AppError;
use crate::service::PatientService;

/// Reference date for the date-of-birth rule
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// GET /api/patients - List all patients
pub async fn list<S: PatientStore>(
    State(service): State<PatientService<S>>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("GET /api/patients - Fetching all patients");
    let patients = service.get_all().await?;
    Ok(Json(patients))
}

/// GET /api/patients/{id} - Read a patient
pub async fn read<S: PatientStore>(
    State(service): State<PatientService<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(id = %id, "GET /api/patients/{{id}} - Fetching patient by id");

    match service.get_by_id(&id).await? {
        Some(patient) => Ok(Json(patient)),
        None => Err(AppError::NotFound(format!("Patient not found with id: {}", id))),
    }
}

/// POST /api/patients - Create a patient
pub async fn create<S: PatientStore>(
    State(service): State<PatientService<S>>,
    body: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("POST /api/patients - Creating new patient");
    let Json(payload) = body?;
    let patient = validate(&payload, today())?;

    let created = service.create(patient).await?;
    let location = format!("{}/{}", BASE_PATH, created.id.as_deref().unwrap_or_default());

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

/// PUT /api/patients/{id} - Replace a patient
pub async fn update<S: PatientStore>(
    State(service): State<PatientService<S>>,
    Path(id): Path<String>,
    body: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(id = %id, "PUT /api/patients/{{id}} - Updating patient");
    let Json(payload) = body?;
    let patient = validate(&payload, today())?;

    let updated = service.update(&id, patient).await?;
    Ok(Json(updated))
}

/// DELETE /api/patients/{id} - Delete a patient
pub async fn delete<S: PatientStore>(
    State(service): State<PatientService<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(id = %id, "DELETE /api/patients/{{id}} - Deleting patient");
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
