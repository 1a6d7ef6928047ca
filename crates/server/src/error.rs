//! Application error handling

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use patient_core::{Outcome, ValidationFailed};

use crate::db::StoreError;
use crate::service::ServiceError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Validation(ValidationFailed),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, outcome) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Outcome::not_found(&msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Outcome::invalid(&msg)),
            AppError::Validation(failed) => {
                (StatusCode::BAD_REQUEST, Outcome::validation(&failed))
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Outcome::exception(&msg))
            }
        };

        (status, Json(outcome)).into_response()
    }
}

impl From<ValidationFailed> for AppError {
    fn from(failed: ValidationFailed) -> Self {
        AppError::Validation(failed)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => AppError::NotFound(err.to_string()),
            ServiceError::Store(err) => err.into(),
        }
    }
}
