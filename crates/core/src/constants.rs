//! Constants used throughout the Patientor core crate.
//!
//! This module contains the reference-data path and environment variable names so that the
//! host binary and the core resolve configuration the same way.

/// Default location of the diagnosis reference data, relative to the workspace root.
pub const DEFAULT_DIAGNOSES_FILE: &str = "data/diagnoses.json";

/// Environment variable overriding the diagnosis reference data location.
pub const DIAGNOSES_FILE_ENV: &str = "PATIENTOR_DIAGNOSES_FILE";

/// Environment variable enabling submission checks by default.
pub const STRICT_SUBMISSION_ENV: &str = "PATIENTOR_STRICT_SUBMISSION";

/// Calendar date format expected for entry, discharge and sick-leave dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
