//! Typed document store over MongoDB.
//!
//! Three layers, leaves first:
//!
//! - [`connection`] - one lazily-established client handle per store
//!   instance, safe under concurrent first use, explicit teardown.
//! - [`document`] - generic per-document CRUD for a single entity type
//!   against one named collection, every call bounded by the configured
//!   timeout.
//! - [`collection`] - the read-modify-write protocol that treats a whole
//!   logical collection as a single stored document and runs caller-supplied
//!   pure transforms against its snapshot.

pub mod collection;
pub mod connection;
pub mod document;

pub use collection::{
    apply_update, ensure_collection, CollectionUpdateError, StoredCollection, TransformOutcome,
};
pub use connection::{ConnectionManager, Connector, MongoConnectionManager, MongoConnector};
pub use document::{DocumentStore, MongoDocumentStore};

use crate::domain::StoreError;
use std::future::Future;
use std::time::Duration;

/// Runs a store operation under a deadline
///
/// Elapsing the deadline yields `StoreError::Timeout`; the operation's own
/// error passes through unchanged.
pub(crate) async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}
