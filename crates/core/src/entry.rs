//! Entry type model.
//!
//! An entry is one clinical record attached to a patient. Every entry carries the same base
//! fields and exactly one variant's extra fields:
//!
//! - `Hospital`: a [`Discharge`]
//! - `HealthCheck`: a [`HealthCheckRating`]
//! - `OccupationalHealthcare`: an employer name and an optional [`SickLeave`]
//!
//! The variant is the single source of truth for which extra fields exist. [`EntryDetails`]
//! is a closed enum, so every dispatch on it is an exhaustive `match` and a new variant fails
//! to compile at each dispatch site until it is handled.
//!
//! Wire form (JSON, as exchanged with the patient-record backend):
//!
//! ```json
//! {
//!   "description": "Yearly control visit.",
//!   "date": "2019-10-20",
//!   "specialist": "MD House",
//!   "diagnosisCodes": [],
//!   "type": "HealthCheck",
//!   "healthCheckRating": "Healthy"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::diagnosis::{deserialize_unique_codes, DiagnosisCode};
use crate::{EntryError, EntryResult};

// ============================================================================
// Variant tags
// ============================================================================

/// The closed set of entry variants.
///
/// Hosts select a variant by its display label ([`EntryType::label`]); payloads carry the
/// compact discriminant ([`EntryType::discriminant`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryType {
    Hospital,
    HealthCheck,
    OccupationalHealthcare,
}

impl EntryType {
    /// All variants, in the order a host offers them.
    pub const ALL: [EntryType; 3] = [
        EntryType::Hospital,
        EntryType::HealthCheck,
        EntryType::OccupationalHealthcare,
    ];

    /// Human-readable label shown by the host when choosing which kind of entry to add.
    pub fn label(self) -> &'static str {
        match self {
            EntryType::Hospital => "Hospital",
            EntryType::HealthCheck => "Health Check",
            EntryType::OccupationalHealthcare => "Occupational Healthcare",
        }
    }

    /// Discriminant literal written to the `type` field of a payload.
    pub fn discriminant(self) -> &'static str {
        match self {
            EntryType::Hospital => "Hospital",
            EntryType::HealthCheck => "HealthCheck",
            EntryType::OccupationalHealthcare => "OccupationalHealthcare",
        }
    }

    /// Parse a variant tag supplied by a host.
    ///
    /// Accepts either the display label or the discriminant literal, matched exactly.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::UnknownEntryType`] for anything outside the closed set. Callers
    /// must treat this as a programming error; there is no fallback variant.
    pub fn parse(raw: &str) -> EntryResult<Self> {
        EntryType::ALL
            .into_iter()
            .find(|t| t.label() == raw || t.discriminant() == raw)
            .ok_or_else(|| EntryError::UnknownEntryType(raw.to_string()))
    }

    /// Editable fields the host must render for this variant, in display order.
    pub fn form_fields(self) -> &'static [FormField] {
        match self {
            EntryType::Hospital => &[
                FormField::Date,
                FormField::Description,
                FormField::Specialist,
                FormField::DischargeDate,
                FormField::DischargeCriteria,
                FormField::DiagnosisCodes,
            ],
            EntryType::HealthCheck => &[
                FormField::Date,
                FormField::Description,
                FormField::Specialist,
                FormField::HealthCheckRating,
                FormField::DiagnosisCodes,
            ],
            EntryType::OccupationalHealthcare => &[
                FormField::Date,
                FormField::Description,
                FormField::Specialist,
                FormField::EmployerName,
                FormField::SickLeaveStartDate,
                FormField::SickLeaveEndDate,
                FormField::DiagnosisCodes,
            ],
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntryType {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryType::parse(s)
    }
}

/// An editable field of the add-entry form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    Date,
    Description,
    Specialist,
    DiagnosisCodes,
    DischargeDate,
    DischargeCriteria,
    HealthCheckRating,
    EmployerName,
    SickLeaveStartDate,
    SickLeaveEndDate,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Date => "Date",
            FormField::Description => "Description",
            FormField::Specialist => "Specialist",
            FormField::DiagnosisCodes => "Diagnosis Codes",
            FormField::DischargeDate => "Discharge date",
            FormField::DischargeCriteria => "Discharge Criteria",
            FormField::HealthCheckRating => "Health Check Rating",
            FormField::EmployerName => "Employer name",
            FormField::SickLeaveStartDate => "Sick leave start date",
            FormField::SickLeaveEndDate => "Sick leave end date",
        }
    }
}

// ============================================================================
// Supporting value types
// ============================================================================

/// Ordered health-check severity scale: `Healthy < LowRisk < HighRisk < CriticalRisk`.
///
/// Used for display and selection only, never for arithmetic.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum HealthCheckRating {
    #[default]
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Critical Risk")]
    CriticalRisk,
}

impl HealthCheckRating {
    /// All ratings in scale order, as offered by the host's selection widget.
    pub const ALL: [HealthCheckRating; 4] = [
        HealthCheckRating::Healthy,
        HealthCheckRating::LowRisk,
        HealthCheckRating::HighRisk,
        HealthCheckRating::CriticalRisk,
    ];

    /// Canonical string value of this rating.
    pub fn as_str(self) -> &'static str {
        match self {
            HealthCheckRating::Healthy => "Healthy",
            HealthCheckRating::LowRisk => "Low Risk",
            HealthCheckRating::HighRisk => "High Risk",
            HealthCheckRating::CriticalRisk => "Critical Risk",
        }
    }

    /// Resolve raw selection text by exact match against the canonical strings.
    ///
    /// Returns `None` for anything else; no trimming or case folding is applied.
    pub fn resolve(raw: &str) -> Option<Self> {
        HealthCheckRating::ALL
            .into_iter()
            .find(|rating| rating.as_str() == raw)
    }
}

impl fmt::Display for HealthCheckRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discharge details of a hospital stay.
///
/// Both halves are independently optional while editing. Whether a submission needs both is
/// the submission collaborator's decision.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discharge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
}

/// Sick-leave interval attached to an occupational healthcare entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl SickLeave {
    /// Returns `true` when neither date is present.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

// ============================================================================
// Entries
// ============================================================================

/// Fields shared by every entry variant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntry {
    pub description: String,

    /// Expected ISO calendar date (`YYYY-MM-DD`); carried as entered.
    pub date: String,

    pub specialist: String,

    /// Ordered, duplicate-free diagnosis references. Always written, possibly empty.
    ///
    /// Repeats in incoming payloads are dropped, keeping the first occurrence.
    #[serde(default, deserialize_with = "deserialize_unique_codes")]
    pub diagnosis_codes: Vec<DiagnosisCode>,
}

/// Variant-specific entry fields, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryDetails {
    Hospital {
        discharge: Discharge,
    },
    HealthCheck {
        #[serde(rename = "healthCheckRating")]
        health_check_rating: HealthCheckRating,
    },
    OccupationalHealthcare {
        #[serde(rename = "employerName")]
        employer_name: String,

        #[serde(rename = "sickLeave", default, skip_serializing_if = "Option::is_none")]
        sick_leave: Option<SickLeave>,
    },
}

impl EntryDetails {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryDetails::Hospital { .. } => EntryType::Hospital,
            EntryDetails::HealthCheck { .. } => EntryType::HealthCheck,
            EntryDetails::OccupationalHealthcare { .. } => EntryType::OccupationalHealthcare,
        }
    }
}

/// An entry payload before the submission collaborator assigns it an identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFormValues {
    #[serde(flatten)]
    pub base: BaseEntry,

    #[serde(flatten)]
    pub details: EntryDetails,
}

impl EntryFormValues {
    pub fn entry_type(&self) -> EntryType {
        self.details.entry_type()
    }

    /// Attach a collaborator-assigned identifier, producing a stored [`Entry`].
    pub fn into_entry(self, id: EntryId) -> Entry {
        Entry { id, values: self }
    }

    /// Parse a payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Translation`] naming the failing field when the JSON does not
    /// match any entry variant.
    pub fn from_json(json_text: &str) -> EntryResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        serde_path_to_error::deserialize::<_, Self>(&mut deserializer).map_err(|err| {
            let path = err.path().to_string();
            EntryError::Translation(format!(
                "Entry schema mismatch at {path}: {}",
                err.into_inner()
            ))
        })
    }

    /// Render the payload as pretty JSON.
    pub fn to_json_pretty(&self) -> EntryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Identifier of a stored entry.
///
/// Always assigned outside this crate; the core only validates that it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(String);

impl EntryId {
    /// # Errors
    ///
    /// Returns [`EntryError::InvalidInput`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> EntryResult<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EntryError::InvalidInput("entry id cannot be empty".into()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EntryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EntryId::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A stored entry: a payload plus its collaborator-assigned identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,

    #[serde(flatten)]
    pub values: EntryFormValues,
}

impl Entry {
    pub fn entry_type(&self) -> EntryType {
        self.values.entry_type()
    }

    /// Drop the identifier, returning the payload.
    pub fn into_form_values(self) -> EntryFormValues {
        self.values
    }
}
