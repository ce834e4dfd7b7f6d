//! HTTP surface of the Ward service.
//!
//! Thin glue between axum and the store: handlers parse and validate the
//! request, build a pure transform, and run it through the collection-update
//! protocol. Each handler receives its concrete store dependency through
//! [`AppState`] at router construction time.

pub mod error;
pub mod medical_records;
pub mod patients;
pub mod server;

pub use error::ApiError;
pub use server::{
    build_router, serve, AppState, SharedStore, MEDICAL_RECORDS_COLLECTION, PATIENTS_COLLECTION,
};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// Serializes a domain payload for a transform response
pub(crate) fn json_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// The `{"status", "message"}` error body used inside transform replies
pub(crate) fn error_body(status: &str, message: &str) -> Value {
    json!({ "status": status, "message": message })
}

/// Renders a protocol outcome: a JSON body when present, bare status
/// otherwise
pub(crate) fn reply(status: StatusCode, payload: Option<Value>) -> Response {
    match payload {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}
