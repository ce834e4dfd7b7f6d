//! Patient domain model
//!
//! A patient is identified by a string id that is unique within the patients
//! collection and immutable once assigned. The insurance number acts as a
//! unique secondary key: no two patients may share one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A patient record
///
/// Wire representation uses camelCase field names. `firstName`, `lastName`,
/// `dateOfBirth`, `gender` and `insuranceNumber` are required; the remaining
/// domain fields are optional and default to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Unique identifier within the patients collection
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Date of birth as an ISO 8601 date string (e.g. "1990-01-01")
    #[serde(default)]
    pub date_of_birth: String,

    #[serde(default)]
    pub gender: String,

    /// Unique secondary key across the collection
    #[serde(default)]
    pub insurance_number: String,

    #[serde(default)]
    pub blood_type: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub allergies: String,

    #[serde(default)]
    pub medical_notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Patient {
    /// Validates that all required fields are present
    ///
    /// # Errors
    ///
    /// Returns a message naming the missing fields (wire names).
    pub fn validate(&self) -> Result<(), String> {
        let mut missing = Vec::new();
        if self.first_name.is_empty() {
            missing.push("firstName");
        }
        if self.last_name.is_empty() {
            missing.push("lastName");
        }
        if self.date_of_birth.is_empty() {
            missing.push("dateOfBirth");
        }
        if self.gender.is_empty() {
            missing.push("gender");
        }
        if self.insurance_number.is_empty() {
            missing.push("insuranceNumber");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("missing required fields: {}", missing.join(", ")))
        }
    }

    /// Sets both timestamps for a newly created patient
    pub fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    /// Applies a partial overwrite from an update request
    ///
    /// Required fields are always taken from the incoming record; optional
    /// fields overwrite the stored value only when the request supplies a
    /// non-empty value. `id` and `createdAt` are never touched.
    pub fn apply_update(&mut self, incoming: &Patient, now: DateTime<Utc>) {
        self.first_name = incoming.first_name.clone();
        self.last_name = incoming.last_name.clone();
        self.date_of_birth = incoming.date_of_birth.clone();
        self.gender = incoming.gender.clone();
        self.insurance_number = incoming.insurance_number.clone();

        if !incoming.blood_type.is_empty() {
            self.blood_type = incoming.blood_type.clone();
        }
        if !incoming.status.is_empty() {
            self.status = incoming.status.clone();
        }
        if !incoming.allergies.is_empty() {
            self.allergies = incoming.allergies.clone();
        }
        if !incoming.medical_notes.is_empty() {
            self.medical_notes = incoming.medical_notes.clone();
        }

        self.updated_at = Some(now);
    }
}

/// Finds a patient whose insurance number collides with the given one
///
/// The patient identified by `exclude_id` is skipped so that an update does
/// not conflict with itself.
pub fn find_insurance_conflict<'a>(
    patients: &'a [Patient],
    insurance_number: &str,
    exclude_id: &str,
) -> Option<&'a Patient> {
    patients
        .iter()
        .find(|p| p.id != exclude_id && p.insurance_number == insurance_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_patient() -> Patient {
        Patient {
            id: "pat123456".to_string(),
            first_name: "Jana".to_string(),
            last_name: "Novak".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            gender: "F".to_string(),
            insurance_number: "900101/1234".to_string(),
            blood_type: "A+".to_string(),
            status: "Stable".to_string(),
            allergies: "Penicillin".to_string(),
            medical_notes: "Chronic hypertension".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_validate_complete_patient() {
        assert!(sample_patient().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_required_fields() {
        let mut patient = sample_patient();
        patient.first_name.clear();
        patient.insurance_number.clear();

        let err = patient.validate().unwrap_err();
        assert!(err.contains("firstName"));
        assert!(err.contains("insuranceNumber"));
        assert!(!err.contains("lastName"));
    }

    #[test]
    fn test_serde_uses_camel_case_field_names() {
        let json = serde_json::to_value(sample_patient()).unwrap();
        assert!(json.get("firstName").is_some());
        assert!(json.get("insuranceNumber").is_some());
        assert!(json.get("medicalNotes").is_some());
        assert!(json.get("first_name").is_none());
        // Unset timestamps are omitted entirely
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_deserialize_partial_body_defaults_to_empty() {
        let patient: Patient = serde_json::from_str(r#"{"firstName": "Anna"}"#).unwrap();
        assert_eq!(patient.first_name, "Anna");
        assert!(patient.id.is_empty());
        assert!(patient.last_name.is_empty());
        assert!(patient.validate().is_err());
    }

    #[test]
    fn test_apply_update_overwrites_required_fields() {
        let mut stored = sample_patient();
        let mut incoming = sample_patient();
        incoming.first_name = "Eva".to_string();
        incoming.insurance_number = "850315/5678".to_string();

        stored.apply_update(&incoming, Utc::now());

        assert_eq!(stored.first_name, "Eva");
        assert_eq!(stored.insurance_number, "850315/5678");
    }

    #[test]
    fn test_apply_update_preserves_optional_fields_when_empty() {
        let mut stored = sample_patient();
        let mut incoming = sample_patient();
        incoming.blood_type.clear();
        incoming.allergies.clear();
        incoming.status = "Recovering".to_string();

        stored.apply_update(&incoming, Utc::now());

        assert_eq!(stored.blood_type, "A+");
        assert_eq!(stored.allergies, "Penicillin");
        assert_eq!(stored.status, "Recovering");
    }

    #[test]
    fn test_apply_update_refreshes_updated_at_only() {
        let created = Utc::now();
        let mut stored = sample_patient();
        stored.stamp_created(created);

        let later = created + chrono::Duration::seconds(60);
        stored.apply_update(&sample_patient(), later);

        assert_eq!(stored.created_at, Some(created));
        assert_eq!(stored.updated_at, Some(later));
    }

    #[test]
    fn test_find_insurance_conflict() {
        let mut other = sample_patient();
        other.id = "pat789012".to_string();
        other.insurance_number = "850315/5678".to_string();
        let patients = vec![sample_patient(), other];

        // Same number under a different id conflicts
        assert!(find_insurance_conflict(&patients, "850315/5678", "pat123456").is_some());
        // A patient never conflicts with itself
        assert!(find_insurance_conflict(&patients, "900101/1234", "pat123456").is_none());
        // Unused numbers are free
        assert!(find_insurance_conflict(&patients, "750220/0000", "pat123456").is_none());
    }
}
