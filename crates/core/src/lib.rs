//! # Patientor Core
//!
//! Entry type model and validated entry builder for the Patientor patient-record client.
//!
//! This crate contains the pure, synchronous logic behind the add-entry form:
//! - The closed set of entry variants and their field sets ([`entry`])
//! - The in-progress form and the builder that shapes it into a payload ([`builder`])
//! - Diagnosis reference data ([`diagnosis`]) and the patient container ([`patient`])
//! - Optional checks a submission collaborator can run on a payload ([`submission`])
//!
//! **No host concerns**: rendering, persistence and transport belong to the caller. The core
//! receives raw field values and hands back either a payload or an error.

pub mod builder;
pub mod config;
pub mod constants;
pub mod diagnosis;
pub mod entry;
pub mod error;
pub mod patient;
pub mod submission;

pub use builder::EntryForm;
pub use config::CoreConfig;
pub use diagnosis::{Diagnosis, DiagnosisCode, DiagnosisRegistry};
pub use entry::{
    BaseEntry, Discharge, Entry, EntryDetails, EntryFormValues, EntryId, EntryType, FormField,
    HealthCheckRating, SickLeave,
};
pub use error::{EntryError, EntryResult};
pub use patient::{Gender, Patient, PatientFormValues};
pub use submission::{check_submission, SubmissionError, SubmissionIssue};
