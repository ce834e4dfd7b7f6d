//! Medical record handlers
//!
//! Records live in their own collection document and carry the owning
//! patient's id; the patient id always comes from the request path.

use crate::api::error::ApiError;
use crate::api::server::{AppState, MEDICAL_RECORDS_COLLECTION};
use crate::api::{error_body, json_value, reply};
use crate::domain::{assign_id, MedicalRecord};
use crate::store::{apply_update, TransformOutcome};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;

/// `GET /api/patients/{patientId}/medical-records`
pub async fn get_patient_medical_records(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Response, ApiError> {
    let (status, payload) = apply_update(
        state.records.as_ref(),
        MEDICAL_RECORDS_COLLECTION,
        move |records: Vec<MedicalRecord>| {
            let matching: Vec<&MedicalRecord> = records
                .iter()
                .filter(|r| r.patient_id == patient_id)
                .collect();
            TransformOutcome::reply(StatusCode::OK, json_value(&matching))
        },
    )
    .await
    .map_err(|err| ApiError::from_update_error(err, "medical records"))?;

    Ok(reply(status, payload))
}

/// `POST /api/patients/{patientId}/medical-records`
pub async fn create_medical_record(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(body): Json<MedicalRecord>,
) -> Result<Response, ApiError> {
    if let Err(message) = body.validate() {
        return Err(ApiError::BadRequest { message });
    }

    let mut record = body;
    record.id = assign_id(&record.id);
    record.patient_id = patient_id;
    record.stamp_created(Utc::now());

    tracing::debug!(
        record_id = %record.id,
        patient_id = %record.patient_id,
        "creating medical record"
    );

    let (status, payload) = apply_update(
        state.records.as_ref(),
        MEDICAL_RECORDS_COLLECTION,
        move |mut records: Vec<MedicalRecord>| {
            if records.iter().any(|r| r.id == record.id) {
                return TransformOutcome::reply(
                    StatusCode::CONFLICT,
                    error_body("Conflict", "Medical record already exists"),
                );
            }

            let response = json_value(&record);
            records.push(record);
            TransformOutcome::persist(records, StatusCode::CREATED, response)
        },
    )
    .await
    .map_err(|err| ApiError::from_update_error(err, "medical records"))?;

    Ok(reply(status, payload))
}

/// `PUT /api/patients/{patientId}/medical-records/{recordId}`
pub async fn update_medical_record(
    State(state): State<AppState>,
    Path((patient_id, record_id)): Path<(String, String)>,
    Json(body): Json<MedicalRecord>,
) -> Result<Response, ApiError> {
    if !body.id.is_empty() && body.id != record_id {
        return Err(ApiError::Forbidden {
            message: "Record ID in path and request body do not match".to_string(),
        });
    }
    if let Err(message) = body.validate() {
        return Err(ApiError::BadRequest { message });
    }

    let now = Utc::now();

    let (status, payload) = apply_update(
        state.records.as_ref(),
        MEDICAL_RECORDS_COLLECTION,
        move |mut records: Vec<MedicalRecord>| {
            let Some(position) = records
                .iter()
                .position(|r| r.id == record_id && r.patient_id == patient_id)
            else {
                return TransformOutcome::reply(
                    StatusCode::NOT_FOUND,
                    error_body("Not Found", "Patient or Medical record not found"),
                );
            };

            records[position].apply_update(&body, now);
            let response = json_value(&records[position]);
            TransformOutcome::persist(records, StatusCode::OK, response)
        },
    )
    .await
    .map_err(|err| ApiError::from_update_error(err, "medical records"))?;

    Ok(reply(status, payload))
}

/// `DELETE /api/patients/{patientId}/medical-records/{recordId}`
pub async fn delete_medical_record(
    State(state): State<AppState>,
    Path((patient_id, record_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (status, payload) = apply_update(
        state.records.as_ref(),
        MEDICAL_RECORDS_COLLECTION,
        move |mut records: Vec<MedicalRecord>| {
            match records
                .iter()
                .position(|r| r.id == record_id && r.patient_id == patient_id)
            {
                Some(position) => {
                    records.remove(position);
                    TransformOutcome::persist_status(records, StatusCode::NO_CONTENT)
                }
                None => TransformOutcome::reply(
                    StatusCode::NOT_FOUND,
                    error_body("Not Found", "Patient or Medical record not found"),
                ),
            }
        },
    )
    .await
    .map_err(|err| ApiError::from_update_error(err, "medical records"))?;

    Ok(reply(status, payload))
}
