// Ward - Patient Management REST API
// Copyright (c) 2025 Ward Contributors
// Licensed under the MIT License

//! # Ward - Patient Management REST API
//!
//! Ward is a REST backend for patient and medical-record management,
//! persisted in MongoDB.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Storing** entities through a generic, typed document store with a
//!   lazily established, shared database connection
//! - **Updating** whole logical collections through a read-modify-write
//!   protocol driven by caller-supplied pure transforms
//! - **Serving** the CRUD HTTP API for patients and medical records
//!
//! ## Architecture
//!
//! Ward follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`api`] - HTTP routing, handlers, and error mapping
//! - [`store`] - Connection lifecycle, typed document CRUD, and the
//!   collection-update protocol
//! - [`domain`] - Entity models and the error taxonomy
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ward::api::{serve, AppState, SharedStore};
//! use ward::config::load_config_or_default;
//! use ward::domain::{MedicalRecord, Patient};
//! use ward::store::{ConnectionManager, MongoConnector, MongoDocumentStore, StoredCollection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("ward.toml")?;
//!
//!     let patients: SharedStore<Patient> =
//!         Arc::new(MongoDocumentStore::<StoredCollection<Patient>>::new(
//!             ConnectionManager::new(config.mongodb.clone(), MongoConnector),
//!             &config.mongodb,
//!             config.mongodb.patients_collection.clone(),
//!         ));
//!     let records: SharedStore<MedicalRecord> =
//!         Arc::new(MongoDocumentStore::<StoredCollection<MedicalRecord>>::new(
//!             ConnectionManager::new(config.mongodb.clone(), MongoConnector),
//!             &config.mongodb,
//!             config.mongodb.records_collection.clone(),
//!         ));
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     serve(&config, AppState { patients, records }, shutdown_rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Consistency model
//!
//! Each logical collection ("patients", "medical-records") is stored as a
//! single document holding the full entity sequence. A request gets
//! read-modify-write semantics for its own span only; there is no
//! cross-request isolation, and concurrent writers to the same collection
//! race (last write wins). See [`store::collection`] for the details.
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`] with [`domain::WardError`];
//! store operations resolve to the closed [`domain::StoreError`] taxonomy
//! (NotFound, Conflict, Timeout, Transport) that the HTTP layer maps to
//! 404, 409, 504 and 502.
//!
//! ## Logging
//!
//! Ward uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(patient_id = "pat123456", "patient created");
//! warn!("collection document missing");
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod store;
