//! Connection lifecycle management
//!
//! Each store instance owns exactly one shared client handle, established on
//! first use. The slot is read lock-free on the hot path; only first-time
//! establishment (and teardown) serializes on a mutex, with a re-check under
//! the lock so concurrent first callers set up a single connection between
//! them. A failed establishment leaves the slot empty, so a later call
//! retries; nothing is retried internally.

use crate::config::MongoDbConfig;
use crate::domain::StoreError;
use crate::store::with_timeout;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Establishes and tears down the underlying client handle
///
/// The seam between the connection manager and the driver; swapped for a
/// counting fake in tests.
#[async_trait]
pub trait Connector: Send + Sync {
    /// The handle type produced by establishment; cheap to clone
    type Handle: Clone + Send + Sync + 'static;

    /// Establishes a new handle
    async fn establish(&self, config: &MongoDbConfig) -> Result<Self::Handle, StoreError>;

    /// Tears an established handle down
    async fn teardown(&self, handle: Self::Handle) -> Result<(), StoreError>;
}

/// Production connector backed by the MongoDB driver
pub struct MongoConnector;

#[async_trait]
impl Connector for MongoConnector {
    type Handle = Client;

    async fn establish(&self, config: &MongoDbConfig) -> Result<Client, StoreError> {
        tracing::debug!(target = %config.redacted_uri(), "connecting to MongoDB");

        let mut options = ClientOptions::parse(config.connection_uri()).await?;
        options.connect_timeout = Some(config.timeout());
        options.server_selection_timeout = Some(config.timeout());

        let client = Client::with_options(options)?;

        // Client construction performs no I/O; ping so an unreachable or
        // unauthenticated server fails establishment instead of the first
        // operation.
        client
            .database(&config.database)
            .run_command(doc! { "ping": 1 })
            .await?;

        tracing::info!(target = %config.redacted_uri(), "connected to MongoDB");
        Ok(client)
    }

    async fn teardown(&self, handle: Client) -> Result<(), StoreError> {
        handle.shutdown().await;
        Ok(())
    }
}

/// Lazily-initialized shared connection slot
///
/// Owned exclusively by the store instance it serves.
pub struct ConnectionManager<C: Connector> {
    config: MongoDbConfig,
    connector: C,
    slot: ArcSwapOption<C::Handle>,
    init_lock: Mutex<()>,
}

/// The production connection manager type
pub type MongoConnectionManager = ConnectionManager<MongoConnector>;

impl<C: Connector> ConnectionManager<C> {
    /// Creates a manager with an empty slot; no connection is attempted
    /// until the first [`acquire`](Self::acquire)
    pub fn new(config: MongoDbConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            slot: ArcSwapOption::empty(),
            init_lock: Mutex::new(()),
        }
    }

    /// Returns the shared handle, establishing it first if necessary
    ///
    /// Safe for concurrent invocation: the optimistic load takes no lock,
    /// and the pessimistic re-check under the lock ensures only one caller
    /// performs the actual establishment. Establishment is bounded by the
    /// configured timeout.
    ///
    /// # Errors
    ///
    /// Returns the establishment error (timeout, network, auth); the slot
    /// stays empty so a later call retries.
    pub async fn acquire(&self) -> Result<C::Handle, StoreError> {
        // optimistic check
        if let Some(handle) = self.slot.load_full() {
            return Ok((*handle).clone());
        }

        let _guard = self.init_lock.lock().await;

        // pessimistic check: another caller may have just connected
        if let Some(handle) = self.slot.load_full() {
            return Ok((*handle).clone());
        }

        let handle = with_timeout(
            self.config.timeout(),
            self.connector.establish(&self.config),
        )
        .await?;

        self.slot.store(Some(Arc::new(handle.clone())));
        Ok(handle)
    }

    /// Idempotent teardown
    ///
    /// Closes the handle and clears the slot if one exists; calling with an
    /// empty slot is a no-op, never an error.
    pub async fn release(&self) -> Result<(), StoreError> {
        let _guard = self.init_lock.lock().await;

        if let Some(handle) = self.slot.swap(None) {
            self.connector.teardown((*handle).clone()).await?;
        }
        Ok(())
    }
}
