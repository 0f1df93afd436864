//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the host. Nothing in
//! the core reads environment variables while a form is being edited or built.

use crate::constants::DEFAULT_DIAGNOSES_FILE;
use crate::{EntryError, EntryResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    diagnoses_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(diagnoses_file: PathBuf) -> EntryResult<Self> {
        if diagnoses_file.as_os_str().is_empty() {
            return Err(EntryError::InvalidInput(
                "diagnoses_file cannot be empty".into(),
            ));
        }

        Ok(Self { diagnoses_file })
    }

    pub fn diagnoses_file(&self) -> &Path {
        &self.diagnoses_file
    }
}

/// Resolve the diagnosis reference data file without reading environment variables.
///
/// If `override_file` is provided, it must be an existing file. Otherwise this searches for
/// `data/diagnoses.json` relative to the current working directory and then walks up from
/// `CARGO_MANIFEST_DIR`.
pub fn resolve_diagnoses_file(override_file: Option<PathBuf>) -> EntryResult<PathBuf> {
    if let Some(file) = override_file {
        if file.is_file() {
            return Ok(file);
        }
        return Err(EntryError::InvalidInput(format!(
            "diagnoses file override {} is not a readable file",
            file.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_DIAGNOSES_FILE);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_DIAGNOSES_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(EntryError::InvalidInput(format!(
        "could not locate {DEFAULT_DIAGNOSES_FILE}"
    )))
}

/// Parse the strict-submission flag from an optional string value, such as the
/// `PATIENTOR_STRICT_SUBMISSION` environment variable or an explicit `--strict=<value>`.
///
/// `None` or empty/whitespace means disabled.
pub fn strict_submission_from_env_value(value: Option<String>) -> EntryResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None | Some("0" | "false" | "no" | "off") => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some(other) => Err(EntryError::InvalidInput(format!(
            "strict submission flag must be true or false, got '{other}'"
        ))),
    }
}
