//! Patient container types.
//!
//! A patient owns an insertion-ordered list of entries. Each entry belongs to exactly one
//! patient. The core never mutates an entry once it has been added.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::{EntryError, EntryResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A patient together with their entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub ssn: String,
    pub occupation: String,
    pub gender: Gender,
    pub date_of_birth: String,
    #[serde(default)]
    entries: Vec<Entry>,
}

/// Patient fields a host collects before an identifier is assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientFormValues {
    pub name: String,
    pub ssn: String,
    pub occupation: String,
    pub gender: Gender,
    pub date_of_birth: String,
}

impl Patient {
    /// Create a patient with no entries from form values and a collaborator-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::InvalidInput`] if `id` is empty or whitespace.
    pub fn from_form(id: impl Into<String>, values: PatientFormValues) -> EntryResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EntryError::InvalidInput("patient id cannot be empty".into()));
        }
        Ok(Self {
            id,
            name: values.name,
            ssn: values.ssn,
            occupation: values.occupation,
            gender: values.gender,
            date_of_birth: values.date_of_birth,
            entries: Vec::new(),
        })
    }

    /// Parse a patient (with entries) from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Translation`] naming the failing field on a schema mismatch, or
    /// [`EntryError::InvalidInput`] if two entries share an id.
    pub fn from_json(json_text: &str) -> EntryResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let patient =
            serde_path_to_error::deserialize::<_, Self>(&mut deserializer).map_err(|err| {
                let path = err.path().to_string();
                EntryError::Translation(format!(
                    "Patient schema mismatch at {path}: {}",
                    err.into_inner()
                ))
            })?;

        let mut seen = HashSet::with_capacity(patient.entries.len());
        for entry in &patient.entries {
            if !seen.insert(&entry.id) {
                return Err(EntryError::InvalidInput(format!(
                    "patient {} has more than one entry with id {}",
                    patient.id, entry.id
                )));
            }
        }

        Ok(patient)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Append an entry after all existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::InvalidInput`] if the patient already has an entry with the same
    /// id.
    pub fn add_entry(&mut self, entry: Entry) -> EntryResult<&Entry> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(EntryError::InvalidInput(format!(
                "patient {} already has an entry with id {}",
                self.id, entry.id
            )));
        }
        tracing::debug!(
            "adding {} entry {} to patient {}",
            entry.entry_type().discriminant(),
            entry.id,
            self.id
        );
        self.entries.push(entry);
        self.entries
            .last()
            .ok_or_else(|| EntryError::InvalidInput("entry list is empty after insert".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EntryForm;
    use crate::entry::{EntryDetails, EntryId, EntryType, HealthCheckRating};

    const SAMPLE_PATIENT: &str = r#"{
  "id": "d2773336-f723-11e9-8f0b-362b9e155667",
  "name": "John McClane",
  "dateOfBirth": "1986-07-09",
  "ssn": "090786-122X",
  "gender": "male",
  "occupation": "New york city cop",
  "entries": [
    {
      "id": "b4f4eca1-2aa7-4b13-9a18-4a5535c3c8da",
      "date": "2019-10-20",
      "specialist": "MD House",
      "type": "HealthCheck",
      "description": "Yearly control visit. Cholesterol levels back to normal.",
      "healthCheckRating": "Healthy"
    },
    {
      "id": "d811e46d-70b3-4d90-b090-4535c7cf8fb1",
      "date": "2015-01-02",
      "type": "Hospital",
      "specialist": "MD House",
      "diagnosisCodes": ["S62.5"],
      "description": "Healing time appr. 2 weeks. patient doesn't remember how he got the injury.",
      "discharge": { "date": "2015-01-16", "criteria": "Thumb has healed." }
    },
    {
      "id": "fcd59fa6-c4b4-4fec-ac4d-df4fe1f85f62",
      "date": "2019-08-05",
      "type": "OccupationalHealthcare",
      "specialist": "MD House",
      "employerName": "HyPD",
      "diagnosisCodes": ["Z57.1", "Z74.3", "M51.2"],
      "description": "Patient mistakenly found himself in a nuclear plant waste site without protection gear.",
      "sickLeave": { "startDate": "2019-08-05", "endDate": "2019-08-28" }
    }
  ]
}"#;

    fn form_values() -> PatientFormValues {
        PatientFormValues {
            name: "Martin Riggs".into(),
            ssn: "300179-77A".into(),
            occupation: "Cop".into(),
            gender: Gender::Male,
            date_of_birth: "1979-01-30".into(),
        }
    }

    #[test]
    fn parses_patient_with_mixed_entries_in_order() {
        let patient = Patient::from_json(SAMPLE_PATIENT).expect("parse patient");
        assert_eq!(patient.gender, Gender::Male);
        assert_eq!(patient.date_of_birth, "1986-07-09");

        let types: Vec<EntryType> = patient.entries().iter().map(Entry::entry_type).collect();
        assert_eq!(
            types,
            vec![
                EntryType::HealthCheck,
                EntryType::Hospital,
                EntryType::OccupationalHealthcare
            ]
        );
        assert!(patient.entries()[0].values.base.diagnosis_codes.is_empty());
    }

    #[test]
    fn rejects_unknown_gender() {
        let input = SAMPLE_PATIENT.replace("\"gender\": \"male\"", "\"gender\": \"unknown\"");
        let err = Patient::from_json(&input).expect_err("should reject gender");
        assert!(matches!(err, EntryError::Translation(msg) if msg.contains("gender")));
    }

    #[test]
    fn from_json_rejects_repeated_entry_ids() {
        let input = SAMPLE_PATIENT.replace(
            "d811e46d-70b3-4d90-b090-4535c7cf8fb1",
            "b4f4eca1-2aa7-4b13-9a18-4a5535c3c8da",
        );
        let err = Patient::from_json(&input).expect_err("should reject repeated id");
        assert!(matches!(
            err,
            EntryError::InvalidInput(msg) if msg.contains("b4f4eca1-2aa7-4b13-9a18-4a5535c3c8da")
        ));
    }

    #[test]
    fn from_form_starts_without_entries() {
        let patient = Patient::from_form("d27736ec-f723-11e9-8f0b-362b9e155667", form_values())
            .expect("valid patient");
        assert!(patient.entries().is_empty());
        assert_eq!(patient.name, "Martin Riggs");

        let err = Patient::from_form("  ", form_values()).expect_err("should reject blank id");
        assert!(matches!(err, EntryError::InvalidInput(_)));
    }

    #[test]
    fn add_entry_appends_in_insertion_order() {
        let mut patient = Patient::from_form("p1", form_values()).expect("valid patient");

        let mut form = EntryForm::new();
        form.set_description("checkup");
        form.set_date("2024-05-01");
        form.set_specialist("Dr. X");
        form.select_health_check_rating("High Risk");

        let first = form
            .build(EntryType::HealthCheck)
            .into_entry(EntryId::new("e1").unwrap());
        let second = form
            .build(EntryType::Hospital)
            .into_entry(EntryId::new("e2").unwrap());

        patient.add_entry(first).expect("first entry");
        let added = patient.add_entry(second).expect("second entry");
        assert_eq!(added.id.as_str(), "e2");

        let ids: Vec<&str> = patient.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
        assert_eq!(
            patient.entries()[0].values.details,
            EntryDetails::HealthCheck {
                health_check_rating: HealthCheckRating::HighRisk
            }
        );
    }

    #[test]
    fn add_entry_rejects_duplicate_ids() {
        let mut patient = Patient::from_form("p1", form_values()).expect("valid patient");
        let values = EntryForm::new().build(EntryType::Hospital);

        patient
            .add_entry(values.clone().into_entry(EntryId::new("e1").unwrap()))
            .expect("first entry");
        let err = patient
            .add_entry(values.into_entry(EntryId::new("e1").unwrap()))
            .expect_err("should reject duplicate id");
        assert!(matches!(err, EntryError::InvalidInput(msg) if msg.contains("e1")));
        assert_eq!(patient.entries().len(), 1);
    }
}
