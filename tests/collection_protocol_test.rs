//! Collection-update protocol properties against an in-memory store.

mod common;

use async_trait::async_trait;
use common::{patient, MemoryDocumentStore};
use http::StatusCode;
use mongodb::bson::Document;
use serde_json::json;
use ward::domain::{Patient, StoreError};
use ward::store::{
    apply_update, ensure_collection, CollectionUpdateError, DocumentStore, StoredCollection,
    TransformOutcome,
};

const COLLECTION_ID: &str = "patients";

type PatientCollectionStore = MemoryDocumentStore<StoredCollection<Patient>>;

async fn seeded_store(items: Vec<Patient>) -> PatientCollectionStore {
    let store = MemoryDocumentStore::new();
    store
        .create(COLLECTION_ID, &StoredCollection::new(COLLECTION_ID, items))
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn append_persists_and_returns_payload() {
    let a = patient("pat-a", "900101/0001");
    let b = patient("pat-b", "900101/0002");
    let c = patient("pat-c", "900101/0003");
    let store = seeded_store(vec![a.clone(), b.clone()]).await;

    let appended = c.clone();
    let (status, payload) = apply_update(&store, COLLECTION_ID, move |mut patients| {
        let response = serde_json::to_value(&appended).unwrap();
        patients.push(appended);
        TransformOutcome::persist(patients, StatusCode::CREATED, response)
    })
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payload.unwrap(), serde_json::to_value(&c).unwrap());

    let stored = store.find(COLLECTION_ID).await.unwrap();
    assert_eq!(stored.items, vec![a, b, c]);
}

#[tokio::test]
async fn read_only_transform_leaves_stored_state_identical() {
    let items = vec![patient("pat-a", "900101/0001"), patient("pat-b", "900101/0002")];
    let store = seeded_store(items).await;
    let before = store.find(COLLECTION_ID).await.unwrap();

    let (status, payload) = apply_update(&store, COLLECTION_ID, |patients: Vec<Patient>| {
        TransformOutcome::reply(StatusCode::OK, json!(patients.len()))
    })
    .await
    .unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload.unwrap(), json!(2));

    let after = store.find(COLLECTION_ID).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn missing_collection_substitutes_empty_snapshot() {
    let store: PatientCollectionStore = MemoryDocumentStore::new();

    let (status, payload) = apply_update(&store, COLLECTION_ID, |patients: Vec<Patient>| {
        TransformOutcome::reply(StatusCode::OK, json!(patients.len()))
    })
    .await
    .unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload.unwrap(), json!(0));
}

#[tokio::test]
async fn persisting_into_missing_collection_is_vanished() {
    let store: PatientCollectionStore = MemoryDocumentStore::new();

    let result = apply_update(&store, COLLECTION_ID, |patients: Vec<Patient>| {
        TransformOutcome::persist_status(patients, StatusCode::NO_CONTENT)
    })
    .await;

    assert!(matches!(result, Err(CollectionUpdateError::Vanished)));
}

#[tokio::test]
async fn lost_update_second_write_wins() {
    let a = patient("pat-a", "900101/0001");
    let b = patient("pat-b", "900101/0002");
    let c = patient("pat-c", "900101/0003");
    let store = seeded_store(vec![a.clone()]).await;

    // First writer reads [a] and appends b.
    let appended = b;
    apply_update(&store, COLLECTION_ID, move |mut patients| {
        patients.push(appended);
        TransformOutcome::persist_status(patients, StatusCode::CREATED)
    })
    .await
    .unwrap();

    // Second writer operates on the stale snapshot [a] it captured before
    // the first write, appending c without re-reading.
    let mut stale_snapshot = vec![a.clone()];
    stale_snapshot.push(c.clone());
    apply_update(&store, COLLECTION_ID, move |_current| {
        TransformOutcome::persist_status(stale_snapshot, StatusCode::CREATED)
    })
    .await
    .unwrap();

    // The second write silently overwrote the first: b is gone.
    let stored = store.find(COLLECTION_ID).await.unwrap();
    assert_eq!(stored.items, vec![a, c]);
}

#[tokio::test]
async fn ensure_collection_creates_once_and_is_idempotent() {
    let store: PatientCollectionStore = MemoryDocumentStore::new();

    assert!(matches!(
        store.find(COLLECTION_ID).await,
        Err(StoreError::NotFound)
    ));

    ensure_collection(&store, COLLECTION_ID).await.unwrap();
    let created = store.find(COLLECTION_ID).await.unwrap();
    assert!(created.items.is_empty());

    // A second call leaves the existing document alone.
    ensure_collection(&store, COLLECTION_ID).await.unwrap();
    assert_eq!(store.find(COLLECTION_ID).await.unwrap(), created);
}

/// Store whose find/update fail with transport errors, for surfacing tests.
struct FailingStore {
    fail_find: bool,
}

#[async_trait]
impl DocumentStore<StoredCollection<Patient>> for FailingStore {
    async fn create(&self, _id: &str, _doc: &StoredCollection<Patient>) -> Result<(), StoreError> {
        Err(StoreError::Transport("create failed".to_string()))
    }

    async fn find_all(&self) -> Result<Vec<StoredCollection<Patient>>, StoreError> {
        Err(StoreError::Transport("find_all failed".to_string()))
    }

    async fn find(&self, id: &str) -> Result<StoredCollection<Patient>, StoreError> {
        if self.fail_find {
            Err(StoreError::Transport("find failed".to_string()))
        } else {
            Ok(StoredCollection::empty(id))
        }
    }

    async fn find_by_filter(
        &self,
        _filter: Document,
    ) -> Result<Vec<StoredCollection<Patient>>, StoreError> {
        Err(StoreError::Transport("find_by_filter failed".to_string()))
    }

    async fn update(&self, _id: &str, _doc: &StoredCollection<Patient>) -> Result<(), StoreError> {
        Err(StoreError::Transport("update failed".to_string()))
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Transport("delete failed".to_string()))
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn fetch_failure_aborts_with_load_error() {
    let store = FailingStore { fail_find: true };

    let result = apply_update(&store, COLLECTION_ID, |patients: Vec<Patient>| {
        TransformOutcome::reply(StatusCode::OK, json!(patients.len()))
    })
    .await;

    match result {
        Err(CollectionUpdateError::Load(StoreError::Transport(message))) => {
            assert!(message.contains("find failed"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn persist_failure_aborts_with_persist_error() {
    let store = FailingStore { fail_find: false };

    let result = apply_update(&store, COLLECTION_ID, |patients: Vec<Patient>| {
        TransformOutcome::persist_status(patients, StatusCode::NO_CONTENT)
    })
    .await;

    assert!(matches!(
        result,
        Err(CollectionUpdateError::Persist(StoreError::Transport(_)))
    ));
}
