//! Diagnosis reference data.
//!
//! Diagnoses are immutable reference data owned by an external registry. Entries only ever
//! refer to a diagnosis by its code; they never embed the diagnosis itself.
//!
//! Key types:
//! - [`DiagnosisCode`]: validated, trimmed, non-empty code (for example `J10.1`).
//! - [`Diagnosis`]: a registry row (`code`, `name`, optional `latin`).
//! - [`DiagnosisRegistry`]: read-only, insertion-ordered set of diagnoses keyed by code.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{EntryError, EntryResult};

/// A diagnosis code as referenced from an entry.
///
/// The input is trimmed of leading and trailing whitespace during construction and must
/// contain at least one character afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiagnosisCode(String);

impl DiagnosisCode {
    /// Creates a new `DiagnosisCode` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::InvalidInput`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> EntryResult<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EntryError::InvalidInput(
                "diagnosis code cannot be empty".into(),
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagnosisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DiagnosisCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DiagnosisCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DiagnosisCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for DiagnosisCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DiagnosisCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DiagnosisCode::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Append `code` unless it is already present. Returns `true` if it was appended.
pub(crate) fn push_unique_code(codes: &mut Vec<DiagnosisCode>, code: DiagnosisCode) -> bool {
    if codes.contains(&code) {
        return false;
    }
    codes.push(code);
    true
}

/// `deserialize_with` helper for entry code lists: first occurrence wins, order is kept.
pub(crate) fn deserialize_unique_codes<'de, D>(
    deserializer: D,
) -> Result<Vec<DiagnosisCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<DiagnosisCode>::deserialize(deserializer)?;
    let mut codes = Vec::with_capacity(raw.len());
    for code in raw {
        push_unique_code(&mut codes, code);
    }
    Ok(codes)
}

/// A single diagnosis from the reference registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Diagnosis {
    /// Unique code identifying this diagnosis (for example "M24.2").
    pub code: DiagnosisCode,

    /// Human-readable name.
    pub name: String,

    /// Optional Latin name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}

/// Read-only, ordered diagnosis reference data.
///
/// The core only reads codes for selection and display; it never mutates the registry after
/// construction. Order is the order the registry supplied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosisRegistry {
    diagnoses: Vec<Diagnosis>,
}

impl DiagnosisRegistry {
    /// Build a registry from an ordered list of diagnoses.
    ///
    /// Codes are unique within a registry. When a code repeats, the first occurrence wins and
    /// the duplicate is dropped with a warning.
    pub fn new(diagnoses: Vec<Diagnosis>) -> Self {
        let mut seen: HashSet<DiagnosisCode> = HashSet::with_capacity(diagnoses.len());
        let mut unique: Vec<Diagnosis> = Vec::with_capacity(diagnoses.len());
        for diagnosis in diagnoses {
            if !seen.insert(diagnosis.code.clone()) {
                tracing::warn!("duplicate diagnosis code in reference data: {}", diagnosis.code);
                continue;
            }
            unique.push(diagnosis);
        }
        Self { diagnoses: unique }
    }

    /// Parse a registry from a JSON array of diagnoses.
    ///
    /// Uses `serde_path_to_error` so a schema mismatch reports the failing element (e.g.
    /// `[3].code`).
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Translation`] if the text is not an array of diagnoses, any
    /// diagnosis has unknown keys, or any code is empty.
    pub fn from_json(json_text: &str) -> EntryResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        match serde_path_to_error::deserialize::<_, Vec<Diagnosis>>(&mut deserializer) {
            Ok(diagnoses) => Ok(Self::new(diagnoses)),
            Err(err) => Err(schema_mismatch(err.path().to_string(), err.into_inner())),
        }
    }

    /// Parse a registry from a YAML sequence of diagnoses.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::InvalidYaml`] if the text is not well-formed YAML, or
    /// [`EntryError::Translation`] under the same schema conditions as [`Self::from_json`].
    pub fn from_yaml(yaml_text: &str) -> EntryResult<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(yaml_text)?;
        match serde_path_to_error::deserialize::<_, Vec<Diagnosis>>(document) {
            Ok(diagnoses) => Ok(Self::new(diagnoses)),
            Err(err) => Err(schema_mismatch(err.path().to_string(), err.into_inner())),
        }
    }

    /// Load a registry from disk. Files ending in `.yaml` or `.yml` are read as YAML, anything
    /// else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::FileRead`] if the file cannot be read, or a parse error as for
    /// [`Self::from_json`] / [`Self::from_yaml`].
    pub fn load(path: &Path) -> EntryResult<Self> {
        let text = std::fs::read_to_string(path).map_err(EntryError::FileRead)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let registry = if is_yaml {
            Self::from_yaml(&text)?
        } else {
            Self::from_json(&text)?
        };
        tracing::debug!(
            "loaded {} diagnoses from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Look up a diagnosis by exact code.
    pub fn get(&self, code: &str) -> Option<&Diagnosis> {
        self.diagnoses.iter().find(|d| d.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Codes in registry order, as offered by the host's selection widget.
    pub fn codes(&self) -> impl Iterator<Item = &DiagnosisCode> {
        self.diagnoses.iter().map(|d| &d.code)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnosis> {
        self.diagnoses.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnoses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnoses.is_empty()
    }
}

fn schema_mismatch(path: String, source: impl fmt::Display) -> EntryError {
    let path = if path.is_empty() || path == "." {
        "<root>".to_string()
    } else {
        path
    };
    EntryError::Translation(format!(
        "Diagnosis registry schema mismatch at {path}: {source}"
    ))
}
