//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Ward configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Listen Address: {}:{}",
            config.server.bind_address, config.server.port
        );
        println!(
            "  CORS Origins: {}",
            config.server.cors_allowed_origins.join(", ")
        );
        println!("  MongoDB: {}", config.mongodb.redacted_uri());
        println!(
            "  Collections: {}, {}",
            config.mongodb.patients_collection, config.mongodb.records_collection
        );
        println!("  Operation Timeout: {}s", config.mongodb.timeout_seconds);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );

        Ok(0)
    }
}
