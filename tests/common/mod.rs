//! Shared test fixtures: an in-memory `DocumentStore` implementation and
//! entity builders.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{self, Document};
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use ward::domain::{MedicalRecord, Patient, StoreError};
use ward::store::DocumentStore;

/// In-memory document store with the same existence/conflict semantics as
/// the MongoDB-backed one. Keyed by document id; filters are bson equality
/// predicates evaluated against the serialized document.
pub struct MemoryDocumentStore<D> {
    documents: Mutex<BTreeMap<String, D>>,
}

impl<D> MemoryDocumentStore<D> {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<D> Default for MemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D> DocumentStore<D> for MemoryDocumentStore<D>
where
    D: Clone + Serialize + Send + Sync + 'static,
{
    async fn create(&self, id: &str, document: &D) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().await;
        if documents.contains_key(id) {
            return Err(StoreError::Conflict);
        }
        documents.insert(id.to_string(), document.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<D>, StoreError> {
        let documents = self.documents.lock().await;
        Ok(documents.values().cloned().collect())
    }

    async fn find(&self, id: &str) -> Result<D, StoreError> {
        let documents = self.documents.lock().await;
        documents.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_by_filter(&self, filter: Document) -> Result<Vec<D>, StoreError> {
        let documents = self.documents.lock().await;
        Ok(documents
            .values()
            .filter(|document| matches_filter(document, &filter))
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, document: &D) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().await;
        if !documents.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        documents.insert(id.to_string(), document.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().await;
        documents
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn matches_filter<D: Serialize>(document: &D, filter: &Document) -> bool {
    let Ok(document) = bson::to_document(document) else {
        return false;
    };
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

/// A valid patient with the given id and insurance number
pub fn patient(id: &str, insurance_number: &str) -> Patient {
    Patient {
        id: id.to_string(),
        first_name: "Jana".to_string(),
        last_name: "Novak".to_string(),
        date_of_birth: "1990-01-01".to_string(),
        gender: "F".to_string(),
        insurance_number: insurance_number.to_string(),
        blood_type: "A+".to_string(),
        status: "Stable".to_string(),
        allergies: String::new(),
        medical_notes: String::new(),
        created_at: None,
        updated_at: None,
    }
}

/// A valid medical record with the given id belonging to `patient_id`
pub fn medical_record(id: &str, patient_id: &str) -> MedicalRecord {
    MedicalRecord {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        date_of_visit: Some(Utc::now()),
        diagnosis: "Acute respiratory infection".to_string(),
        symptoms: vec!["cough".to_string()],
        treatment: "Rest and fluids".to_string(),
        medications: Vec::new(),
        doctor_name: "Dr. Eva Horak".to_string(),
        notes: String::new(),
        follow_up_date: String::new(),
        created_at: None,
        updated_at: None,
    }
}
