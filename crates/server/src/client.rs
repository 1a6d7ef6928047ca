//! Outbound client for the patient API
//!
//! One HTTP call per operation, no retries. Transport errors and non-2xx
//! responses are wrapped into [`ClientError::CallFailed`] together with a
//! description of the operation that failed.

use patient_core::Patient;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{Instrument, Span};

/// Base URL used when `PATIENT_SERVICE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/patients";

/// Underlying cause of a failed call
#[derive(Debug, Error)]
pub enum CallFailure {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response ({status}): {body}")]
    Status { status: StatusCode, body: String },
}

/// Error returned by every [`PatientClient`] operation
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{context}")]
    CallFailed {
        context: String,
        #[source]
        source: CallFailure,
    },
}

impl ClientError {
    pub fn cause(&self) -> &CallFailure {
        match self {
            ClientError::CallFailed { source, .. } => source,
        }
    }
}

fn call_failed(context: String, source: CallFailure) -> ClientError {
    tracing::error!(error = %source, "{}", context);
    ClientError::CallFailed { context, source }
}

/// Client mirroring the `/api/patients` endpoints
#[derive(Clone)]
pub struct PatientClient {
    http: reqwest::Client,
    base_url: String,
    span: Span,
}

impl PatientClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_span(base_url, tracing::info_span!("patient_client"))
    }

    pub fn with_span(base_url: impl Into<String>, span: Span) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            span,
        }
    }

    /// Create a client from `PATIENT_SERVICE_URL`
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("PATIENT_SERVICE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_all_patients(&self) -> Result<Vec<Patient>, ClientError> {
        async {
            tracing::info!("Calling GET /api/patients");
            let patients: Vec<Patient> = fetch(self.http.get(&self.base_url))
                .await
                .map_err(|e| call_failed("Failed to retrieve patients".into(), e))?;
            tracing::info!(count = patients.len(), "Retrieved patients");
            Ok(patients)
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn get_patient_by_id(&self, id: &str) -> Result<Patient, ClientError> {
        async {
            tracing::info!(id, "Calling GET /api/patients/{{id}}");
            let patient = fetch(self.http.get(self.url(id)))
                .await
                .map_err(|e| call_failed(format!("Failed to retrieve patient with id: {}", id), e))?;
            tracing::info!(id, "Retrieved patient");
            Ok(patient)
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn create_patient(&self, patient: &Patient) -> Result<Patient, ClientError> {
        async {
            tracing::info!("Calling POST /api/patients");
            let created: Patient = fetch(self.http.post(&self.base_url).json(patient))
                .await
                .map_err(|e| call_failed("Failed to create patient".into(), e))?;
            tracing::info!(id = created.id.as_deref().unwrap_or_default(), "Created patient");
            Ok(created)
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn update_patient(&self, id: &str, patient: &Patient) -> Result<Patient, ClientError> {
        async {
            tracing::info!(id, "Calling PUT /api/patients/{{id}}");
            let updated = fetch(self.http.put(self.url(id)).json(patient))
                .await
                .map_err(|e| call_failed(format!("Failed to update patient with id: {}", id), e))?;
            tracing::info!(id, "Updated patient");
            Ok(updated)
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn delete_patient(&self, id: &str) -> Result<(), ClientError> {
        async {
            tracing::info!(id, "Calling DELETE /api/patients/{{id}}");
            send(self.http.delete(self.url(id)))
                .await
                .map_err(|e| call_failed(format!("Failed to delete patient with id: {}", id), e))?;
            tracing::info!(id, "Deleted patient");
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn get_health_status(&self) -> Result<String, ClientError> {
        async {
            tracing::info!("Calling GET /api/patients/health");
            let response = send(self.http.get(self.url("health")))
                .await
                .map_err(|e| call_failed("Failed to check health status".into(), e))?;
            response
                .text()
                .await
                .map_err(|e| call_failed("Failed to check health status".into(), e.into()))
        }
        .instrument(self.span.clone())
        .await
    }

    fn url(&self, segment: &str) -> String {
        format!("{}/{}", self.base_url, segment)
    }
}

/// Send a request, treating any non-2xx status as a failure
async fn send(request: RequestBuilder) -> Result<Response, CallFailure> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        return Err(CallFailure::Status { status, body });
    }
    Ok(response)
}

async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, CallFailure> {
    Ok(send(request).await?.json::<T>().await?)
}
