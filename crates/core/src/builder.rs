//! In-progress add-entry form and the entry builder.
//!
//! [`EntryForm`] holds the raw field values of one editing session. The host calls one setter
//! per edit event; setters are total and never fail. When the host submits, [`EntryForm::build`]
//! shapes the held values into the [`EntryFormValues`] of the selected variant.
//!
//! Resolution rules applied by setters:
//! - Optional text (discharge date/criteria, sick-leave dates) is held exactly as typed; only
//!   an empty string is held as absent.
//! - Rating text that does not exactly match a canonical rating leaves the held rating as it
//!   was.
//! - Diagnosis codes are an ordered, duplicate-free sequence.

use crate::diagnosis::{push_unique_code, DiagnosisCode};
use crate::entry::{
    BaseEntry, Discharge, EntryDetails, EntryFormValues, EntryType, HealthCheckRating, SickLeave,
};
use crate::EntryResult;

/// Raw field state of one add-entry form.
///
/// A fresh form starts empty: blank text fields, no diagnosis codes, `Healthy` rating and
/// absent discharge and sick-leave dates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryForm {
    description: String,
    date: String,
    specialist: String,
    diagnosis_codes: Vec<DiagnosisCode>,
    health_check_rating: HealthCheckRating,
    discharge: Discharge,
    sick_leave: SickLeave,
    employer_name: String,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    pub fn set_date(&mut self, value: impl Into<String>) {
        self.date = value.into();
    }

    pub fn set_specialist(&mut self, value: impl Into<String>) {
        self.specialist = value.into();
    }

    pub fn set_employer_name(&mut self, value: impl Into<String>) {
        self.employer_name = value.into();
    }

    pub fn set_discharge_date(&mut self, value: &str) {
        self.discharge.date = optional_text(value);
    }

    pub fn set_discharge_criteria(&mut self, value: &str) {
        self.discharge.criteria = optional_text(value);
    }

    pub fn set_sick_leave_start_date(&mut self, value: &str) {
        self.sick_leave.start_date = optional_text(value);
    }

    pub fn set_sick_leave_end_date(&mut self, value: &str) {
        self.sick_leave.end_date = optional_text(value);
    }

    pub fn set_health_check_rating(&mut self, rating: HealthCheckRating) {
        self.health_check_rating = rating;
    }

    /// Select a rating from raw widget text.
    ///
    /// Unrecognised text keeps the last good rating.
    pub fn select_health_check_rating(&mut self, raw: &str) {
        match HealthCheckRating::resolve(raw) {
            Some(rating) => self.health_check_rating = rating,
            None => tracing::debug!("ignoring unrecognised health check rating {raw:?}"),
        }
    }

    /// Single-select diagnosis widget: the chosen code replaces the whole selection.
    ///
    /// Blank input clears the selection.
    pub fn select_diagnosis_code(&mut self, raw: &str) {
        self.diagnosis_codes = DiagnosisCode::new(raw).map(|c| vec![c]).unwrap_or_default();
    }

    /// Append a code to the selection unless it is already selected.
    pub fn add_diagnosis_code(&mut self, code: DiagnosisCode) {
        push_unique_code(&mut self.diagnosis_codes, code);
    }

    pub fn remove_diagnosis_code(&mut self, code: &str) {
        self.diagnosis_codes.retain(|c| c.as_str() != code);
    }

    /// Replace the selection, keeping first-seen order and dropping repeats.
    pub fn set_diagnosis_codes(&mut self, codes: impl IntoIterator<Item = DiagnosisCode>) {
        self.diagnosis_codes.clear();
        for code in codes {
            self.add_diagnosis_code(code);
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn specialist(&self) -> &str {
        &self.specialist
    }

    pub fn diagnosis_codes(&self) -> &[DiagnosisCode] {
        &self.diagnosis_codes
    }

    pub fn health_check_rating(&self) -> HealthCheckRating {
        self.health_check_rating
    }

    pub fn discharge(&self) -> &Discharge {
        &self.discharge
    }

    pub fn sick_leave(&self) -> &SickLeave {
        &self.sick_leave
    }

    pub fn employer_name(&self) -> &str {
        &self.employer_name
    }

    /// Shape the held values into a payload for `entry_type`.
    ///
    /// Base fields are copied verbatim. Only the selected variant's extra fields are read;
    /// everything else in the form is ignored. The form itself is left untouched.
    pub fn build(&self, entry_type: EntryType) -> EntryFormValues {
        let base = BaseEntry {
            description: self.description.clone(),
            date: self.date.clone(),
            specialist: self.specialist.clone(),
            diagnosis_codes: self.diagnosis_codes.clone(),
        };

        let details = match entry_type {
            EntryType::Hospital => EntryDetails::Hospital {
                discharge: self.discharge.clone(),
            },
            EntryType::HealthCheck => EntryDetails::HealthCheck {
                health_check_rating: self.health_check_rating,
            },
            EntryType::OccupationalHealthcare => EntryDetails::OccupationalHealthcare {
                employer_name: self.employer_name.clone(),
                sick_leave: Some(self.sick_leave.clone()),
            },
        };

        tracing::debug!(
            "built {} entry with {} diagnosis code(s)",
            entry_type.discriminant(),
            base.diagnosis_codes.len()
        );

        EntryFormValues { base, details }
    }

    /// Build from a raw variant tag supplied by the host.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EntryError::UnknownEntryType`] if `tag` is outside the closed variant
    /// set. No payload is produced and no default variant is substituted.
    pub fn build_tagged(&self, tag: &str) -> EntryResult<EntryFormValues> {
        match EntryType::parse(tag) {
            Ok(entry_type) => Ok(self.build(entry_type)),
            Err(e) => {
                tracing::error!("refusing to build entry: {e}");
                Err(e)
            }
        }
    }

    /// Host cancelled the form. Nothing is held outside the form, so dropping it is enough.
    pub fn discard(self) {
        tracing::debug!("add-entry form discarded");
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryError;
    use serde_json::{json, Value};

    fn code(raw: &str) -> DiagnosisCode {
        DiagnosisCode::new(raw).expect("valid code")
    }

    /// A form with every field filled, so cross-contamination would show up.
    fn filled_form() -> EntryForm {
        let mut form = EntryForm::new();
        form.set_description("Patient fell down the stairs");
        form.set_date("2024-05-01");
        form.set_specialist("Dr. X");
        form.select_diagnosis_code("S62.5");
        form.select_health_check_rating("High Risk");
        form.set_discharge_date("2024-05-03");
        form.set_discharge_criteria("Thumb has healed.");
        form.set_employer_name("Acme");
        form.set_sick_leave_start_date("2024-05-01");
        form.set_sick_leave_end_date("2024-05-10");
        form
    }

    fn keys(value: &Value) -> Vec<&str> {
        let mut keys: Vec<&str> = value
            .as_object()
            .expect("payload is an object")
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn new_form_starts_empty() {
        let form = EntryForm::new();
        assert_eq!(form.description(), "");
        assert_eq!(form.date(), "");
        assert_eq!(form.specialist(), "");
        assert!(form.diagnosis_codes().is_empty());
        assert_eq!(form.health_check_rating(), HealthCheckRating::Healthy);
        assert_eq!(form.discharge(), &Discharge::default());
        assert_eq!(form.sick_leave(), &SickLeave::default());
        assert_eq!(form.employer_name(), "");
    }

    #[test]
    fn each_variant_carries_only_its_own_fields() {
        let form = filled_form();
        let base_keys = ["date", "description", "diagnosisCodes", "specialist", "type"];

        let hospital = serde_json::to_value(form.build(EntryType::Hospital)).unwrap();
        let mut expected = base_keys.to_vec();
        expected.push("discharge");
        expected.sort_unstable();
        assert_eq!(keys(&hospital), expected);

        let check = serde_json::to_value(form.build(EntryType::HealthCheck)).unwrap();
        let mut expected = base_keys.to_vec();
        expected.push("healthCheckRating");
        expected.sort_unstable();
        assert_eq!(keys(&check), expected);

        let occupational =
            serde_json::to_value(form.build(EntryType::OccupationalHealthcare)).unwrap();
        let mut expected = base_keys.to_vec();
        expected.extend(["employerName", "sickLeave"]);
        expected.sort_unstable();
        assert_eq!(keys(&occupational), expected);
    }

    #[test]
    fn base_fields_are_copied_verbatim_for_every_variant() {
        let mut form = filled_form();
        form.set_description("  padded text  ");

        for entry_type in EntryType::ALL {
            let values = form.build(entry_type);
            assert_eq!(values.entry_type(), entry_type);
            assert_eq!(values.base.description, "  padded text  ");
            assert_eq!(values.base.date, "2024-05-01");
            assert_eq!(values.base.specialist, "Dr. X");
            assert_eq!(values.base.diagnosis_codes, vec!["S62.5"]);
        }
    }

    #[test]
    fn build_tagged_rejects_unknown_tags() {
        let form = filled_form();
        for tag in ["Dental", "", "HEALTHCHECK"] {
            let err = form.build_tagged(tag).expect_err("should not build a payload");
            assert!(err.is_programming_error());
            assert!(matches!(err, EntryError::UnknownEntryType(_)));
        }
    }

    #[test]
    fn build_tagged_accepts_labels() {
        let form = filled_form();
        let values = form.build_tagged("Health Check").expect("known label");
        assert_eq!(values.entry_type(), EntryType::HealthCheck);
        let values = form.build_tagged("OccupationalHealthcare").expect("known discriminant");
        assert_eq!(values.entry_type(), EntryType::OccupationalHealthcare);
    }

    #[test]
    fn build_does_not_reset_the_form() {
        let form = filled_form();
        let before = form.clone();
        let _ = form.build(EntryType::Hospital);
        assert_eq!(form, before);
    }

    #[test]
    fn rating_selection_keeps_last_good_value() {
        let mut form = EntryForm::new();
        form.select_health_check_rating("Low Risk");
        assert_eq!(form.health_check_rating(), HealthCheckRating::LowRisk);

        form.select_health_check_rating("Moderate Risk");
        assert_eq!(form.health_check_rating(), HealthCheckRating::LowRisk);

        form.select_health_check_rating("");
        assert_eq!(form.health_check_rating(), HealthCheckRating::LowRisk);
    }

    #[test]
    fn rating_selection_is_idempotent() {
        let mut form = EntryForm::new();
        for rating in HealthCheckRating::ALL {
            form.set_health_check_rating(rating);
            form.select_health_check_rating(form.health_check_rating().as_str());
            assert_eq!(form.health_check_rating(), rating);
        }
    }

    #[test]
    fn single_select_replaces_the_selection() {
        let mut form = EntryForm::new();
        form.select_diagnosis_code("J10.1");
        form.select_diagnosis_code("M24.2");
        assert_eq!(form.diagnosis_codes(), &[code("M24.2")]);

        form.select_diagnosis_code("");
        assert!(form.diagnosis_codes().is_empty());
    }

    #[test]
    fn multi_select_keeps_order_without_duplicates() {
        let mut form = EntryForm::new();
        form.set_diagnosis_codes([code("Z57.1"), code("Z74.3"), code("Z57.1"), code("M51.2")]);
        assert_eq!(form.diagnosis_codes(), &[code("Z57.1"), code("Z74.3"), code("M51.2")]);

        form.add_diagnosis_code(code("Z74.3"));
        form.add_diagnosis_code(code("L20"));
        form.remove_diagnosis_code("Z57.1");
        assert_eq!(form.diagnosis_codes(), &[code("Z74.3"), code("M51.2"), code("L20")]);

        let values = form.build(EntryType::Hospital);
        assert_eq!(values.base.diagnosis_codes, vec!["Z74.3", "M51.2", "L20"]);
    }

    #[test]
    fn empty_optional_text_is_absent() {
        let mut form = EntryForm::new();
        form.set_sick_leave_start_date("2024-01-01");
        form.set_sick_leave_start_date("");
        form.set_discharge_criteria("");
        assert_eq!(form.sick_leave().start_date, None);
        assert_eq!(form.discharge().criteria, None);
    }

    #[test]
    fn whitespace_optional_text_is_kept_as_typed() {
        let mut form = EntryForm::new();
        form.set_discharge_criteria("   ");
        form.set_sick_leave_end_date(" 2024-01-02");
        assert_eq!(form.discharge().criteria.as_deref(), Some("   "));
        assert_eq!(form.sick_leave().end_date.as_deref(), Some(" 2024-01-02"));
    }

    #[test]
    fn hospital_discharge_round_trips() {
        let discharge = Discharge {
            date: Some("2024-01-02".into()),
            criteria: Some("recovered".into()),
        };

        let mut form = EntryForm::new();
        form.set_discharge_date(discharge.date.as_deref().unwrap());
        form.set_discharge_criteria(discharge.criteria.as_deref().unwrap());

        match form.build(EntryType::Hospital).details {
            EntryDetails::Hospital { discharge: built } => assert_eq!(built, discharge),
            other => panic!("expected hospital entry, got {other:?}"),
        }
    }

    #[test]
    fn health_check_scenario() {
        let mut form = EntryForm::new();
        form.set_description("checkup");
        form.set_date("2024-05-01");
        form.set_specialist("Dr. X");
        form.select_diagnosis_code("J10");
        form.select_health_check_rating("Low Risk");

        let values = form.build_tagged("HealthCheck").expect("known tag");
        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!({
                "type": "HealthCheck",
                "description": "checkup",
                "date": "2024-05-01",
                "specialist": "Dr. X",
                "diagnosisCodes": ["J10"],
                "healthCheckRating": "Low Risk"
            })
        );
        assert_eq!(
            values.details,
            EntryDetails::HealthCheck {
                health_check_rating: HealthCheckRating::LowRisk
            }
        );
    }

    #[test]
    fn occupational_scenario_keeps_absent_sick_leave() {
        let mut form = EntryForm::new();
        form.set_employer_name("Acme");

        let values = form.build(EntryType::OccupationalHealthcare);
        assert_eq!(
            values.details,
            EntryDetails::OccupationalHealthcare {
                employer_name: "Acme".into(),
                sick_leave: Some(SickLeave {
                    start_date: None,
                    end_date: None,
                }),
            }
        );
    }

    #[test]
    fn hospital_scenario_writes_empty_codes() {
        let form = EntryForm::new();
        let values = form.build(EntryType::Hospital);
        assert!(values.base.diagnosis_codes.is_empty());

        let value = serde_json::to_value(&values).unwrap();
        assert_eq!(value["diagnosisCodes"], json!([]));
    }
}
