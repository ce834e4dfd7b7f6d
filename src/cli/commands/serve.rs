//! Serve command implementation
//!
//! Builds the two document stores (each with its own connection manager),
//! wires them into the router state, and runs the server until a shutdown
//! signal arrives.

use crate::api::server::{serve, AppState, SharedStore};
use crate::config::load_config_or_default;
use crate::domain::{MedicalRecord, Patient};
use crate::store::{ConnectionManager, MongoConnector, MongoDocumentStore, StoredCollection};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = load_config_or_default(config_path)?;

        if let Some(port) = self.port {
            tracing::info!(port, "Overriding listen port from CLI");
            config.server.port = port;
        }

        tracing::info!(
            environment = ?config.environment,
            database = %config.mongodb.redacted_uri(),
            patients_collection = %config.mongodb.patients_collection,
            records_collection = %config.mongodb.records_collection,
            "Starting ward API server"
        );

        let patients: SharedStore<Patient> =
            Arc::new(MongoDocumentStore::<StoredCollection<Patient>>::new(
                ConnectionManager::new(config.mongodb.clone(), MongoConnector),
                &config.mongodb,
                config.mongodb.patients_collection.clone(),
            ));
        let records: SharedStore<MedicalRecord> =
            Arc::new(MongoDocumentStore::<StoredCollection<MedicalRecord>>::new(
                ConnectionManager::new(config.mongodb.clone(), MongoConnector),
                &config.mongodb,
                config.mongodb.records_collection.clone(),
            ));

        let state = AppState {
            patients: Arc::clone(&patients),
            records: Arc::clone(&records),
        };

        let result = serve(&config, state, shutdown_signal).await;

        if let Err(err) = patients.disconnect().await {
            tracing::warn!(error = %err, "Failed to close patients store connection");
        }
        if let Err(err) = records.disconnect().await {
            tracing::warn!(error = %err, "Failed to close medical records store connection");
        }

        result?;
        tracing::info!("Server stopped");
        Ok(0)
    }
}
