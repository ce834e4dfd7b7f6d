//! Structured logging and observability.
//!
//! Ward logs through the `tracing` ecosystem: a console layer is always on,
//! and an optional JSON file layer with rotation can be enabled through the
//! `[logging]` configuration section.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
