//! Whole-collection read-modify-write protocol
//!
//! A logical collection (all patients, all medical records) is stored as a
//! single document holding the full ordered sequence. Each request fetches
//! that document, hands the snapshot to a pure transform, and writes the
//! result back only when the transform produced a new sequence.
//!
//! This gives one caller read-modify-write semantics for the span of one
//! request and nothing more: two concurrent updates against the same
//! collection id can fetch the same snapshot, and the second write
//! overwrites the first. The one detectable variant, the collection
//! document disappearing between fetch and write, surfaces as
//! [`CollectionUpdateError::Vanished`] rather than a silent success.

use crate::domain::StoreError;
use crate::store::document::DocumentStore;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A logical collection stored as one document
///
/// `id` is the fixed, well-known collection identifier (e.g. `"patients"`);
/// `items` is the full ordered sequence of entities. An empty `items` is a
/// valid, present collection; document existence is independent of member
/// existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCollection<T> {
    pub id: String,
    pub items: Vec<T>,
}

impl<T> StoredCollection<T> {
    /// Creates a collection document from a sequence of entities
    pub fn new(id: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            id: id.into(),
            items,
        }
    }

    /// Creates an empty collection document
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, Vec::new())
    }
}

/// What a transform decided
///
/// `updated` carries the new sequence to persist, or `None` for a pure read
/// that skips persistence entirely. `response` and `status` pass through to
/// the caller either way; a `None` response means an empty body.
pub struct TransformOutcome<T> {
    pub updated: Option<Vec<T>>,
    pub response: Option<Value>,
    pub status: StatusCode,
}

impl<T> TransformOutcome<T> {
    /// A pure read: no persistence, reply with `status` and `response`
    pub fn reply(status: StatusCode, response: Value) -> Self {
        Self {
            updated: None,
            response: Some(response),
            status,
        }
    }

    /// Persist `items`, then reply with `status` and `response`
    pub fn persist(items: Vec<T>, status: StatusCode, response: Value) -> Self {
        Self {
            updated: Some(items),
            response: Some(response),
            status,
        }
    }

    /// Persist `items`, then reply with `status` and an empty body
    pub fn persist_status(items: Vec<T>, status: StatusCode) -> Self {
        Self {
            updated: Some(items),
            response: None,
            status,
        }
    }
}

/// Failure modes of [`apply_update`]
///
/// A missing collection at fetch time is not an error (an empty snapshot is
/// substituted); a missing collection at persist time is, and gets its own
/// variant so callers can distinguish the concurrent deletion.
#[derive(Debug, Error)]
pub enum CollectionUpdateError {
    /// The collection document could not be fetched
    #[error("failed to load collection: {0}")]
    Load(#[source] StoreError),

    /// The collection document was deleted between fetch and persist
    #[error("collection was deleted while the update was in flight")]
    Vanished,

    /// The transformed collection could not be written back
    #[error("failed to persist collection: {0}")]
    Persist(#[source] StoreError),
}

/// Fetches a collection snapshot, runs `transform`, conditionally persists
///
/// 1. Fetch the collection document; NotFound substitutes an empty
///    sequence, any other error aborts with [`CollectionUpdateError::Load`].
/// 2. Run the transform on the snapshot.
/// 3. Persist the returned sequence, if any; NotFound here means the
///    collection vanished mid-update and is surfaced, other failures abort
///    with [`CollectionUpdateError::Persist`].
/// 4. Pass the transform's status and response payload through.
pub async fn apply_update<T, S, F>(
    store: &S,
    collection_id: &str,
    transform: F,
) -> Result<(StatusCode, Option<Value>), CollectionUpdateError>
where
    T: Send + Sync + 'static,
    S: DocumentStore<StoredCollection<T>> + ?Sized,
    F: FnOnce(Vec<T>) -> TransformOutcome<T> + Send,
{
    let items = match store.find(collection_id).await {
        Ok(collection) => collection.items,
        Err(StoreError::NotFound) => Vec::new(),
        Err(err) => return Err(CollectionUpdateError::Load(err)),
    };

    let outcome = transform(items);

    if let Some(updated) = outcome.updated {
        let collection = StoredCollection::new(collection_id, updated);
        match store.update(collection_id, &collection).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => return Err(CollectionUpdateError::Vanished),
            Err(err) => return Err(CollectionUpdateError::Persist(err)),
        }
    }

    Ok((outcome.status, outcome.response))
}

/// Creates the collection document if it does not exist yet
///
/// Run once at startup for each logical collection so that the first write
/// through the protocol has a document to replace. A concurrent Conflict
/// from another instance bootstrapping the same collection counts as
/// success.
pub async fn ensure_collection<T, S>(store: &S, collection_id: &str) -> Result<(), StoreError>
where
    T: Send + Sync + 'static,
    S: DocumentStore<StoredCollection<T>> + ?Sized,
{
    match store.find(collection_id).await {
        Ok(_) => Ok(()),
        Err(StoreError::NotFound) => {
            tracing::info!(collection_id, "creating empty collection document");
            match store
                .create(collection_id, &StoredCollection::empty(collection_id))
                .await
            {
                Ok(()) | Err(StoreError::Conflict) => Ok(()),
                Err(err) => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}
