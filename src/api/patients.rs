//! Patient handlers
//!
//! All operations, reads included, go through the collection-update
//! protocol against the patients collection document.

use crate::api::error::ApiError;
use crate::api::server::{AppState, PATIENTS_COLLECTION};
use crate::api::{error_body, json_value, reply};
use crate::domain::{assign_id, find_insurance_conflict, Patient};
use crate::store::{apply_update, TransformOutcome};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;

/// `GET /api/patients`
pub async fn get_all_patients(State(state): State<AppState>) -> Result<Response, ApiError> {
    let (status, payload) = apply_update(
        state.patients.as_ref(),
        PATIENTS_COLLECTION,
        |patients: Vec<Patient>| TransformOutcome::reply(StatusCode::OK, json_value(&patients)),
    )
    .await
    .map_err(|err| ApiError::from_update_error(err, "patients"))?;

    Ok(reply(status, payload))
}

/// `POST /api/patients`
pub async fn create_patient(
    State(state): State<AppState>,
    Json(body): Json<Patient>,
) -> Result<Response, ApiError> {
    if let Err(message) = body.validate() {
        return Err(ApiError::BadRequest { message });
    }

    let mut patient = body;
    patient.id = assign_id(&patient.id);
    patient.stamp_created(Utc::now());

    tracing::debug!(patient_id = %patient.id, "creating patient");

    let (status, payload) = apply_update(
        state.patients.as_ref(),
        PATIENTS_COLLECTION,
        move |mut patients: Vec<Patient>| {
            if patients.iter().any(|p| p.id == patient.id) {
                return TransformOutcome::reply(
                    StatusCode::CONFLICT,
                    error_body("Conflict", "Patient already exists"),
                );
            }
            if find_insurance_conflict(&patients, &patient.insurance_number, &patient.id).is_some()
            {
                return TransformOutcome::reply(
                    StatusCode::CONFLICT,
                    error_body(
                        "Conflict",
                        "Insurance number is already registered to another patient",
                    ),
                );
            }

            let response = json_value(&patient);
            patients.push(patient);
            TransformOutcome::persist(patients, StatusCode::CREATED, response)
        },
    )
    .await
    .map_err(|err| ApiError::from_update_error(err, "patients"))?;

    Ok(reply(status, payload))
}

/// `GET /api/patients/{patientId}`
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Response, ApiError> {
    let (status, payload) = apply_update(
        state.patients.as_ref(),
        PATIENTS_COLLECTION,
        move |patients: Vec<Patient>| {
            match patients.into_iter().find(|p| p.id == patient_id) {
                Some(patient) => TransformOutcome::reply(StatusCode::OK, json_value(&patient)),
                None => TransformOutcome::reply(
                    StatusCode::NOT_FOUND,
                    error_body("Not Found", "Patient not found"),
                ),
            }
        },
    )
    .await
    .map_err(|err| ApiError::from_update_error(err, "patients"))?;

    Ok(reply(status, payload))
}

/// `PUT /api/patients/{patientId}`
pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(body): Json<Patient>,
) -> Result<Response, ApiError> {
    if !body.id.is_empty() && body.id != patient_id {
        return Err(ApiError::Forbidden {
            message: "Patient ID in path and request body do not match".to_string(),
        });
    }
    if let Err(message) = body.validate() {
        return Err(ApiError::BadRequest { message });
    }

    let now = Utc::now();

    let (status, payload) = apply_update(
        state.patients.as_ref(),
        PATIENTS_COLLECTION,
        move |mut patients: Vec<Patient>| {
            if find_insurance_conflict(&patients, &body.insurance_number, &patient_id).is_some() {
                return TransformOutcome::reply(
                    StatusCode::CONFLICT,
                    error_body(
                        "Conflict",
                        "Insurance number is already registered to another patient",
                    ),
                );
            }

            let Some(position) = patients.iter().position(|p| p.id == patient_id) else {
                return TransformOutcome::reply(
                    StatusCode::NOT_FOUND,
                    error_body("Not Found", "Patient not found"),
                );
            };

            patients[position].apply_update(&body, now);
            let response = json_value(&patients[position]);
            TransformOutcome::persist(patients, StatusCode::OK, response)
        },
    )
    .await
    .map_err(|err| ApiError::from_update_error(err, "patients"))?;

    Ok(reply(status, payload))
}

/// `DELETE /api/patients/{patientId}`
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Response, ApiError> {
    let (status, payload) = apply_update(
        state.patients.as_ref(),
        PATIENTS_COLLECTION,
        move |mut patients: Vec<Patient>| {
            match patients.iter().position(|p| p.id == patient_id) {
                Some(position) => {
                    patients.remove(position);
                    TransformOutcome::persist_status(patients, StatusCode::NO_CONTENT)
                }
                None => TransformOutcome::reply(
                    StatusCode::NOT_FOUND,
                    error_body("Not Found", "Patient not found"),
                ),
            }
        },
    )
    .await
    .map_err(|err| ApiError::from_update_error(err, "patients"))?;

    Ok(reply(status, payload))
}
