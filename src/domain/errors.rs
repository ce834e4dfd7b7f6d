//! Domain error types
//!
//! The error hierarchy for Ward. The store layer exposes a small closed set
//! of semantic outcomes (`StoreError`); everything above it wraps those in
//! `WardError`. Third-party error types never cross module boundaries.

use std::time::Duration;
use thiserror::Error;

/// Main Ward error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum WardError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Document store errors
///
/// The closed taxonomy every store operation resolves to. The HTTP layer
/// maps these to status codes (404, 409, 504, 502); the store itself never
/// swallows or retries them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with the given identifier
    #[error("document not found")]
    NotFound,

    /// A document with the given identifier already exists
    #[error("conflict: document already exists")]
    Conflict,

    /// The operation deadline elapsed before completion
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Any other database or network failure
    #[error("database error: {0}")]
    Transport(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for WardError {
    fn from(err: std::io::Error) -> Self {
        WardError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for WardError {
    fn from(err: serde_json::Error) -> Self {
        WardError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for WardError {
    fn from(err: toml::de::Error) -> Self {
        WardError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ward_error_display() {
        let err = WardError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::NotFound;
        let ward_err: WardError = store_err.into();
        assert!(matches!(ward_err, WardError::Store(StoreError::NotFound)));
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(StoreError::NotFound.to_string(), "document not found");
        assert_eq!(
            StoreError::Conflict.to_string(),
            "conflict: document already exists"
        );
        assert!(StoreError::Timeout(Duration::from_secs(10))
            .to_string()
            .contains("timed out"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let ward_err: WardError = io_err.into();
        assert!(matches!(ward_err, WardError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let ward_err: WardError = toml_err.into();
        assert!(matches!(ward_err, WardError::Configuration(_)));
        assert!(ward_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_ward_error_implements_std_error() {
        let err = WardError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_store_error_implements_std_error() {
        let err = StoreError::Conflict;
        let _: &dyn std::error::Error = &err;
    }
}
