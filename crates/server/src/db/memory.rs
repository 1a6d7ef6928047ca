use std::collections::HashMap;
use std::sync::Arc;

use patient_core::Patient;
use tokio::sync::RwLock;

use super::{PatientStore, StoreError, new_id};

/// Patient store held in process memory, for local runs and tests
#[derive(Clone, Default)]
pub struct InMemoryPatientStore {
    records: Arc<RwLock<HashMap<String, Patient>>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PatientStore for InMemoryPatientStore {
    async fn find_all(&self) -> Result<Vec<Patient>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn save(&self, patient: Patient) -> Result<Patient, StoreError> {
        let id = patient.id.clone().unwrap_or_else(new_id);
        let stored = patient.with_id(Some(id.clone()));
        self.records.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.records.read().await.contains_key(id))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.records.write().await.remove(id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().await.len() as u64)
    }
}
