//! Error types for the HTTP layer
//!
//! Store outcomes map to status codes as follows:
//!
//! | Outcome | HTTP Status |
//! |---|---|
//! | NotFound | 404 |
//! | Conflict | 409 |
//! | Timeout | 504 |
//! | Transport | 502 |
//! | collection vanished mid-update | 404 |
//!
//! Response bodies keep the `{"status", "message"}` shape of the service's
//! original API, with an `"error"` detail on gateway-class failures.

use crate::domain::StoreError;
use crate::store::CollectionUpdateError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// The error type handlers return
///
/// Each variant carries the user-facing message; gateway-class variants also
/// carry the underlying store error text.
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request body or parameters (HTTP 400)
    BadRequest { message: String },

    /// Path and body identifiers disagree (HTTP 403)
    Forbidden { message: String },

    /// No such resource (HTTP 404)
    NotFound { message: String },

    /// Resource already exists (HTTP 409)
    Conflict { message: String },

    /// The store deadline elapsed (HTTP 504)
    GatewayTimeout { message: String, detail: String },

    /// Any other database failure (HTTP 502)
    BadGateway { message: String, detail: String },
}

impl ApiError {
    /// Maps a collection-protocol failure for the given resource name
    pub fn from_update_error(err: CollectionUpdateError, resource: &str) -> Self {
        match err {
            CollectionUpdateError::Vanished => ApiError::NotFound {
                message: format!(
                    "{resource} collection was deleted while processing the request"
                ),
            },
            CollectionUpdateError::Load(store_err) => {
                Self::from_store_error(store_err, format!("Failed to load {resource} from database"))
            }
            CollectionUpdateError::Persist(store_err) => Self::from_store_error(
                store_err,
                format!("Failed to update {resource} in database"),
            ),
        }
    }

    fn from_store_error(err: StoreError, message: String) -> Self {
        match err {
            StoreError::Timeout(_) => ApiError::GatewayTimeout {
                message,
                detail: err.to_string(),
            },
            other => ApiError::BadGateway {
                message,
                detail: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({ "status": "Bad Request", "message": message }),
            ),
            ApiError::Forbidden { message } => (
                StatusCode::FORBIDDEN,
                json!({ "status": "Forbidden", "message": message }),
            ),
            ApiError::NotFound { message } => (
                StatusCode::NOT_FOUND,
                json!({ "status": "Not Found", "message": message }),
            ),
            ApiError::Conflict { message } => (
                StatusCode::CONFLICT,
                json!({ "status": "Conflict", "message": message }),
            ),
            ApiError::GatewayTimeout { message, detail } => (
                StatusCode::GATEWAY_TIMEOUT,
                json!({ "status": "Gateway Timeout", "message": message, "error": detail }),
            ),
            ApiError::BadGateway { message, detail } => (
                StatusCode::BAD_GATEWAY,
                json!({ "status": "Bad Gateway", "message": message, "error": detail }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_vanished_maps_to_not_found() {
        let err = ApiError::from_update_error(CollectionUpdateError::Vanished, "patients");
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = ApiError::from_update_error(
            CollectionUpdateError::Load(StoreError::Timeout(Duration::from_secs(10))),
            "patients",
        );
        assert!(matches!(err, ApiError::GatewayTimeout { .. }));
    }

    #[test]
    fn test_transport_maps_to_bad_gateway() {
        let err = ApiError::from_update_error(
            CollectionUpdateError::Persist(StoreError::Transport("boom".to_string())),
            "medical records",
        );
        match err {
            ApiError::BadGateway { message, detail } => {
                assert!(message.contains("medical records"));
                assert!(detail.contains("boom"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_response_status_codes() {
        let cases = [
            (
                ApiError::BadRequest {
                    message: String::new(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Forbidden {
                    message: String::new(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::NotFound {
                    message: String::new(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Conflict {
                    message: String::new(),
                },
                StatusCode::CONFLICT,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
