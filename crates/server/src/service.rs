//! Patient service: existence checks around the persistence gateway

use patient_core::Patient;
use thiserror::Error;
use tracing::{Instrument, Span};

use crate::db::{PatientStore, StoreError};

/// Failure of a service operation
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Patient not found with id: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates patient operations over a [`PatientStore`].
///
/// Payloads are expected to be validated by the caller. Every operation runs
/// inside the span handed in at construction.
#[derive(Clone)]
pub struct PatientService<S> {
    store: S,
    span: Span,
}

impl<S: PatientStore> PatientService<S> {
    pub fn new(store: S) -> Self {
        Self::with_span(store, tracing::info_span!("patient_service"))
    }

    pub fn with_span(store: S, span: Span) -> Self {
        Self { store, span }
    }

    /// All stored patients, in store order
    pub async fn get_all(&self) -> Result<Vec<Patient>, ServiceError> {
        async {
            tracing::info!("Fetching all patients");
            let patients = self.store.find_all().await?;
            tracing::info!(count = patients.len(), "Found patients");
            Ok(patients)
        }
        .instrument(self.span.clone())
        .await
    }

    /// A patient by id; absence is `Ok(None)`
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Patient>, ServiceError> {
        async {
            tracing::info!(id, "Fetching patient");
            let patient = self.store.find_by_id(id).await?;
            if patient.is_none() {
                tracing::warn!(id, "Patient not found");
            }
            Ok(patient)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Persist a new patient. Any id on the input is discarded.
    pub async fn create(&self, patient: Patient) -> Result<Patient, ServiceError> {
        async {
            tracing::info!(
                first_name = %patient.first_name,
                last_name = %patient.last_name,
                "Creating new patient"
            );
            let saved = self.store.save(patient.with_id(None)).await?;
            tracing::info!(id = saved.id.as_deref().unwrap_or_default(), "Created patient");
            Ok(saved)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Replace the stored patient `id`. The path id wins over any id in the input.
    pub async fn update(&self, id: &str, patient: Patient) -> Result<Patient, ServiceError> {
        async {
            tracing::info!(id, "Updating patient");
            if !self.store.exists_by_id(id).await? {
                tracing::error!(id, "Cannot update - patient not found");
                return Err(ServiceError::NotFound(id.to_string()));
            }

            let updated = self.store.save(patient.with_id(Some(id.to_string()))).await?;
            tracing::info!(id, "Updated patient");
            Ok(updated)
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        async {
            tracing::info!(id, "Deleting patient");
            if !self.store.exists_by_id(id).await? {
                tracing::error!(id, "Cannot delete - patient not found");
                return Err(ServiceError::NotFound(id.to_string()));
            }

            self.store.delete_by_id(id).await?;
            tracing::info!(id, "Deleted patient");
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn exists_by_id(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(self.store.exists_by_id(id).await?)
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.store.count().await?)
    }
}
