//! Router construction and server lifecycle

use crate::api::{medical_records, patients};
use crate::config::WardConfig;
use crate::domain::{MedicalRecord, Patient, Result, WardError};
use crate::store::{ensure_collection, DocumentStore, StoredCollection};
use axum::http::{header, HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Fixed identifier of the patients collection document
pub const PATIENTS_COLLECTION: &str = "patients";

/// Fixed identifier of the medical-records collection document
pub const MEDICAL_RECORDS_COLLECTION: &str = "medical-records";

/// A shared handle to the store backing one logical collection
pub type SharedStore<T> = Arc<dyn DocumentStore<StoredCollection<T>>>;

/// Store dependencies injected into the handlers
///
/// Built once at startup; every handler gets its concrete store through
/// this state rather than a runtime lookup.
#[derive(Clone)]
pub struct AppState {
    pub patients: SharedStore<Patient>,
    pub records: SharedStore<MedicalRecord>,
}

/// Builds the application router
pub fn build_router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    let cors = if cors_allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };
    let cors = cors
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::ORIGIN, header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(12 * 60 * 60));

    Router::new()
        .route("/health", get(health))
        .route("/openapi", get(openapi))
        .route(
            "/api/patients",
            get(patients::get_all_patients).post(patients::create_patient),
        )
        .route(
            "/api/patients/{patient_id}",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route(
            "/api/patients/{patient_id}/medical-records",
            get(medical_records::get_patient_medical_records)
                .post(medical_records::create_medical_record),
        )
        .route(
            "/api/patients/{patient_id}/medical-records/{record_id}",
            put(medical_records::update_medical_record)
                .delete(medical_records::delete_medical_record),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Creates the collection documents the update protocol replaces
///
/// Failures are logged, not fatal: the database is contacted lazily, and an
/// operator can create the documents out of band.
pub async fn bootstrap_collections(state: &AppState) {
    if let Err(err) = ensure_collection(state.patients.as_ref(), PATIENTS_COLLECTION).await {
        tracing::warn!(
            error = %err,
            collection_id = PATIENTS_COLLECTION,
            "could not bootstrap collection document; writes will fail until it exists"
        );
    }
    if let Err(err) = ensure_collection(state.records.as_ref(), MEDICAL_RECORDS_COLLECTION).await {
        tracing::warn!(
            error = %err,
            collection_id = MEDICAL_RECORDS_COLLECTION,
            "could not bootstrap collection document; writes will fail until it exists"
        );
    }
}

/// Binds the listener and serves until the shutdown signal fires
///
/// In-flight requests are drained before returning.
pub async fn serve(
    config: &WardConfig,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    bootstrap_collections(&state).await;

    let router = build_router(state, &config.server.cors_allowed_origins);

    let address = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| WardError::Io(format!("failed to bind {address}: {e}")))?;

    tracing::info!(address = %address, "ward API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            while shutdown.changed().await.is_ok() {
                if *shutdown.borrow() {
                    break;
                }
            }
            tracing::info!("shutdown signal received, draining in-flight requests");
        })
        .await
        .map_err(|e| WardError::Io(e.to_string()))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn openapi() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/yaml")],
        include_str!("openapi.yaml"),
    )
}
