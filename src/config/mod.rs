//! Configuration management for Ward.
//!
//! TOML-based configuration with environment variable substitution,
//! `WARD_*` environment overrides, defaults for every value, and validation
//! on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ward::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ward.toml")?;
//!
//! println!("Listening on port {}", config.server.port);
//! println!("Database: {}", config.mongodb.redacted_uri());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [server]
//! bind_address = "0.0.0.0"
//! port = 8080
//!
//! [mongodb]
//! host = "mongodb.internal"
//! port = 27017
//! username = "ward"
//! password = "${WARD_MONGODB_PASSWORD}"
//! database = "patient-management"
//! timeout_seconds = 10
//! ```
//!
//! # Environment Overrides
//!
//! Every key can be overridden with a `WARD_<SECTION>_<KEY>` variable, e.g.
//! `WARD_MONGODB_HOST` or `WARD_SERVER_PORT`. The server also starts with no
//! file at all, from defaults plus environment.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, Environment, LoggingConfig, MongoDbConfig, ServerConfig, WardConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
