//! Submission checks for built entry payloads.
//!
//! The builder only shapes input; it never rejects a payload for its content. Hosts that act
//! as the submission collaborator can run [`check_submission`] before accepting a payload.
//! Every problem is reported, so a form can highlight all offending fields at once.

use chrono::NaiveDate;

use crate::constants::ISO_DATE_FORMAT;
use crate::diagnosis::DiagnosisRegistry;
use crate::entry::{Discharge, EntryDetails, EntryFormValues, FormField, SickLeave};

/// A single reason a payload cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionIssue {
    #[error("{} is required", .0.label())]
    MissingField(FormField),
    #[error("{} must be a date in YYYY-MM-DD form, got {value:?}", .field.label())]
    InvalidDate { field: FormField, value: String },
    #[error("unknown diagnosis code {0}")]
    UnknownDiagnosisCode(String),
    #[error("sick leave needs both a start date and an end date")]
    IncompleteSickLeave,
    #[error("sick leave ends ({end}) before it starts ({start})")]
    SickLeaveEndsBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// All issues found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("entry cannot be submitted: {}", join_issues(.issues))]
pub struct SubmissionError {
    pub issues: Vec<SubmissionIssue>,
}

fn join_issues(issues: &[SubmissionIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check a built payload against the rules a submission collaborator enforces.
///
/// # Errors
///
/// Returns [`SubmissionError`] listing, in this order:
/// - an empty or non-`YYYY-MM-DD` entry date, empty description, empty specialist,
/// - Hospital: discharge date or criteria missing, or an unparseable discharge date,
/// - OccupationalHealthcare: empty employer name, a sick leave with only one date,
///   unparseable sick-leave dates, or an end date before the start date,
/// - diagnosis codes missing from `registry`.
pub fn check_submission(
    values: &EntryFormValues,
    registry: &DiagnosisRegistry,
) -> Result<(), SubmissionError> {
    let mut issues = Vec::new();
    let base = &values.base;

    if base.date.trim().is_empty() {
        issues.push(SubmissionIssue::MissingField(FormField::Date));
    } else if parse_date(&base.date).is_none() {
        issues.push(SubmissionIssue::InvalidDate {
            field: FormField::Date,
            value: base.date.clone(),
        });
    }
    if base.description.trim().is_empty() {
        issues.push(SubmissionIssue::MissingField(FormField::Description));
    }
    if base.specialist.trim().is_empty() {
        issues.push(SubmissionIssue::MissingField(FormField::Specialist));
    }

    match &values.details {
        EntryDetails::Hospital { discharge } => check_discharge(discharge, &mut issues),
        EntryDetails::HealthCheck { .. } => {}
        EntryDetails::OccupationalHealthcare {
            employer_name,
            sick_leave,
        } => {
            if employer_name.trim().is_empty() {
                issues.push(SubmissionIssue::MissingField(FormField::EmployerName));
            }
            if let Some(sick_leave) = sick_leave {
                check_sick_leave(sick_leave, &mut issues);
            }
        }
    }

    for code in &base.diagnosis_codes {
        if !registry.contains(code.as_str()) {
            issues.push(SubmissionIssue::UnknownDiagnosisCode(code.to_string()));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        tracing::debug!("payload rejected with {} issue(s)", issues.len());
        Err(SubmissionError { issues })
    }
}

fn check_discharge(discharge: &Discharge, issues: &mut Vec<SubmissionIssue>) {
    match &discharge.date {
        None => issues.push(SubmissionIssue::MissingField(FormField::DischargeDate)),
        Some(date) => {
            if parse_date(date).is_none() {
                issues.push(SubmissionIssue::InvalidDate {
                    field: FormField::DischargeDate,
                    value: date.clone(),
                });
            }
        }
    }
    if is_blank(discharge.criteria.as_deref()) {
        issues.push(SubmissionIssue::MissingField(FormField::DischargeCriteria));
    }
}

fn check_sick_leave(sick_leave: &SickLeave, issues: &mut Vec<SubmissionIssue>) {
    if sick_leave.is_empty() {
        return;
    }
    let (start, end) = match (&sick_leave.start_date, &sick_leave.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            issues.push(SubmissionIssue::IncompleteSickLeave);
            return;
        }
    };

    let parsed_start = parse_date(start);
    let parsed_end = parse_date(end);
    if parsed_start.is_none() {
        issues.push(SubmissionIssue::InvalidDate {
            field: FormField::SickLeaveStartDate,
            value: start.clone(),
        });
    }
    if parsed_end.is_none() {
        issues.push(SubmissionIssue::InvalidDate {
            field: FormField::SickLeaveEndDate,
            value: end.clone(),
        });
    }
    if let (Some(start), Some(end)) = (parsed_start, parsed_end) {
        if end < start {
            issues.push(SubmissionIssue::SickLeaveEndsBeforeStart { start, end });
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT).ok()
}
