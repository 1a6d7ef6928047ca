//! Persistence gateway for patient records

mod document;
mod memory;
mod postgres;

pub use document::PatientDocument;
pub use memory::InMemoryPatientStore;
pub use postgres::PgPatientStore;

use deadpool_postgres::{Config, Pool, Runtime};
use patient_core::Patient;
use thiserror::Error;
use tokio_postgres::NoTls;

/// Storage failure surfaced by a [`PatientStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Malformed patient document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Failed to create database pool: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),
}

/// By-id document store holding patient records.
///
/// `save` assigns a fresh id to records without one and replaces the stored
/// record otherwise. Implementations provide their own per-record atomicity.
pub trait PatientStore: Clone + Send + Sync + 'static {
    fn find_all(&self) -> impl Future<Output = Result<Vec<Patient>, StoreError>> + Send;

    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Patient>, StoreError>> + Send;

    fn save(&self, patient: Patient) -> impl Future<Output = Result<Patient, StoreError>> + Send;

    fn exists_by_id(&self, id: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn delete_by_id(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Create a connection pool from a database URL
pub async fn create_pool(database_url: &str) -> Result<Pool, StoreError> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    Ok(cfg.create_pool(Some(Runtime::Tokio1), NoTls)?)
}

/// Generate an id for a record saved for the first time
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
