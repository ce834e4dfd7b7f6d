//! Generic per-document CRUD
//!
//! [`DocumentStore`] is the contract the HTTP layer and the collection
//! protocol are written against; [`MongoDocumentStore`] implements it for
//! one named MongoDB collection. Documents are addressed by their `id`
//! field and replaced wholesale on update.
//!
//! The existence check preceding each write is a separate round trip from
//! the write itself; under a single-writer assumption that window is
//! harmless, and no locking papers over it here.

use crate::config::MongoDbConfig;
use crate::domain::StoreError;
use crate::store::connection::MongoConnectionManager;
use crate::store::with_timeout;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::time::Duration;

/// CRUD operations for a single entity type against one named collection
///
/// Every operation resolves to the closed [`StoreError`] taxonomy: Conflict
/// when creating an id that exists, NotFound when reading, replacing or
/// deleting an id that does not, Timeout when the configured deadline
/// elapses, Transport for everything else. `find_all` and `find_by_filter`
/// return empty vectors for empty results, never an absent value.
#[async_trait]
pub trait DocumentStore<D>: Send + Sync
where
    D: Send + Sync + 'static,
{
    /// Inserts a new document under `id`
    ///
    /// # Errors
    ///
    /// `StoreError::Conflict` if a document with `id` already exists.
    async fn create(&self, id: &str, document: &D) -> Result<(), StoreError>;

    /// Returns every document in the collection
    async fn find_all(&self) -> Result<Vec<D>, StoreError>;

    /// Returns the document with `id`
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no document has `id`.
    async fn find(&self, id: &str) -> Result<D, StoreError>;

    /// Returns every document matching an equality filter
    async fn find_by_filter(&self, filter: Document) -> Result<Vec<D>, StoreError>;

    /// Replaces the document with `id` wholesale
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no document has `id`.
    async fn update(&self, id: &str, document: &D) -> Result<(), StoreError>;

    /// Removes the document with `id`
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no document has `id`.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Releases the underlying connection; idempotent
    async fn disconnect(&self) -> Result<(), StoreError>;
}

/// MongoDB-backed document store
///
/// Owns its [`MongoConnectionManager`] exclusively: one client handle per
/// store instance, established on first use.
pub struct MongoDocumentStore<D> {
    connection: MongoConnectionManager,
    database: String,
    collection: String,
    timeout: Duration,
    _document: PhantomData<fn() -> D>,
}

impl<D> MongoDocumentStore<D>
where
    D: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static,
{
    /// Creates a store for one named collection
    pub fn new(
        connection: MongoConnectionManager,
        config: &MongoDbConfig,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            connection,
            database: config.database.clone(),
            collection: collection.into(),
            timeout: config.timeout(),
            _document: PhantomData,
        }
    }

    /// The collection this store operates on
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// The database this store operates on
    pub fn database_name(&self) -> &str {
        &self.database
    }

    async fn collection(&self) -> Result<Collection<D>, StoreError> {
        let client = self.connection.acquire().await?;
        Ok(client.database(&self.database).collection(&self.collection))
    }
}

#[async_trait]
impl<D> DocumentStore<D> for MongoDocumentStore<D>
where
    D: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static,
{
    async fn create(&self, id: &str, document: &D) -> Result<(), StoreError> {
        with_timeout(self.timeout, async {
            let collection = self.collection().await?;

            if collection.find_one(doc! { "id": id }).await?.is_some() {
                return Err(StoreError::Conflict);
            }

            collection.insert_one(document).await?;
            Ok(())
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<D>, StoreError> {
        with_timeout(self.timeout, async {
            let collection = self.collection().await?;
            let cursor = collection.find(doc! {}).await?;
            let documents = cursor.try_collect().await?;
            Ok(documents)
        })
        .await
    }

    async fn find(&self, id: &str) -> Result<D, StoreError> {
        with_timeout(self.timeout, async {
            let collection = self.collection().await?;
            collection
                .find_one(doc! { "id": id })
                .await?
                .ok_or(StoreError::NotFound)
        })
        .await
    }

    async fn find_by_filter(&self, filter: Document) -> Result<Vec<D>, StoreError> {
        with_timeout(self.timeout, async {
            let collection = self.collection().await?;
            let cursor = collection.find(filter).await?;
            let documents = cursor.try_collect().await?;
            Ok(documents)
        })
        .await
    }

    async fn update(&self, id: &str, document: &D) -> Result<(), StoreError> {
        with_timeout(self.timeout, async {
            let collection = self.collection().await?;

            if collection.find_one(doc! { "id": id }).await?.is_none() {
                return Err(StoreError::NotFound);
            }

            collection.replace_one(doc! { "id": id }, document).await?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        with_timeout(self.timeout, async {
            let collection = self.collection().await?;

            if collection.find_one(doc! { "id": id }).await?.is_none() {
                return Err(StoreError::NotFound);
            }

            collection.delete_one(doc! { "id": id }).await?;
            Ok(())
        })
        .await
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        self.connection.release().await
    }
}
