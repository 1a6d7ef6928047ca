use deadpool_postgres::Pool;
use patient_core::Patient;
use serde_json::Value as JsonValue;
use tokio_postgres::Row;

use super::{PatientDocument, PatientStore, StoreError, new_id};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    document JSONB NOT NULL
)";

/// PostgreSQL-backed patient store keeping one JSONB document per record
#[derive(Clone)]
pub struct PgPatientStore {
    pool: Pool,
}

impl PgPatientStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create the patients table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.batch_execute(CREATE_TABLE).await?;
        Ok(())
    }
}

fn decode(row: &Row) -> Result<Patient, StoreError> {
    let id: String = row.get(0);
    let document: JsonValue = row.get(1);
    let document: PatientDocument = serde_json::from_value(document)?;
    Ok(document.into_patient(id))
}

impl PatientStore for PgPatientStore {
    async fn find_all(&self) -> Result<Vec<Patient>, StoreError> {
        let client = self.pool.get().await?;
        let rows = client
            .query("SELECT id, document FROM patients", &[])
            .await?;
        rows.iter().map(decode).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT id, document FROM patients WHERE id = $1", &[&id])
            .await?;

        match row {
            Some(row) => Ok(Some(decode(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, patient: Patient) -> Result<Patient, StoreError> {
        let id = patient.id.clone().unwrap_or_else(new_id);
        let document = serde_json::to_value(PatientDocument::from(&patient))?;

        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO patients (id, document) VALUES ($1, $2)
                 ON CONFLICT (id) DO UPDATE SET document = EXCLUDED.document",
                &[&id, &document],
            )
            .await?;

        Ok(patient.with_id(Some(id)))
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "SELECT EXISTS(SELECT 1 FROM patients WHERE id = $1)",
                &[&id],
            )
            .await?;
        Ok(row.get(0))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client
            .execute("DELETE FROM patients WHERE id = $1", &[&id])
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let client = self.pool.get().await?;
        let row = client.query_one("SELECT COUNT(*) FROM patients", &[]).await?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }
}
