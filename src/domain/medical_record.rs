//! Medical record domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prescribed medication entry within a medical record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Name of the medication
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Dosage amount
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dosage: String,

    /// How often to take the medication
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub frequency: String,

    /// Duration of treatment
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub duration: String,
}

/// A medical record belonging to one patient
///
/// `diagnosis` and `dateOfVisit` are required; `patientId` is always taken
/// from the request path, never from the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    /// Unique identifier within the medical-records collection
    #[serde(default)]
    pub id: String,

    /// Owning patient's identifier
    #[serde(default)]
    pub patient_id: String,

    /// When the visit took place (RFC 3339)
    #[serde(default)]
    pub date_of_visit: Option<DateTime<Utc>>,

    #[serde(default)]
    pub diagnosis: String,

    #[serde(default)]
    pub symptoms: Vec<String>,

    #[serde(default)]
    pub treatment: String,

    #[serde(default)]
    pub medications: Vec<Medication>,

    #[serde(default)]
    pub doctor_name: String,

    #[serde(default)]
    pub notes: String,

    /// Planned follow-up as an ISO 8601 date string
    #[serde(default)]
    pub follow_up_date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MedicalRecord {
    /// Validates that all required fields are present
    pub fn validate(&self) -> Result<(), String> {
        let mut missing = Vec::new();
        if self.diagnosis.is_empty() {
            missing.push("diagnosis");
        }
        if self.date_of_visit.is_none() {
            missing.push("dateOfVisit");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("missing required fields: {}", missing.join(", ")))
        }
    }

    /// Sets both timestamps for a newly created record
    pub fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    /// Applies a partial overwrite from an update request
    ///
    /// Required fields are always taken from the incoming record; optional
    /// fields overwrite the stored value only when the request supplies a
    /// non-empty value. `id`, `patientId` and `createdAt` are never touched.
    pub fn apply_update(&mut self, incoming: &MedicalRecord, now: DateTime<Utc>) {
        self.diagnosis = incoming.diagnosis.clone();
        self.date_of_visit = incoming.date_of_visit;

        if !incoming.symptoms.is_empty() {
            self.symptoms = incoming.symptoms.clone();
        }
        if !incoming.treatment.is_empty() {
            self.treatment = incoming.treatment.clone();
        }
        if !incoming.medications.is_empty() {
            self.medications = incoming.medications.clone();
        }
        if !incoming.doctor_name.is_empty() {
            self.doctor_name = incoming.doctor_name.clone();
        }
        if !incoming.notes.is_empty() {
            self.notes = incoming.notes.clone();
        }
        if !incoming.follow_up_date.is_empty() {
            self.follow_up_date = incoming.follow_up_date.clone();
        }

        self.updated_at = Some(now);
    }
}
