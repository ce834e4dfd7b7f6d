//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Ward using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Ward - Patient Management API
#[derive(Parser, Debug)]
#[command(name = "ward")]
#[command(version, about, long_about = None)]
#[command(author = "Ward Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ward.toml", env = "WARD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the API server
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
