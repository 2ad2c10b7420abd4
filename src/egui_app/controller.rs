//! Maintains app state and bridges the prediction workflow to the egui UI.

mod background_jobs;
pub(crate) mod jobs;

use crate::config;
use crate::egui_app::state::*;
use crate::egui_app::ui::style::StatusTone;
use crate::predict::{FeatureField, FieldSet};
use self::jobs::{ControllerJobs, PredictJob};

/// Owns UI state and the background job channel for one prediction workflow.
pub struct PredictController {
    pub ui: UiState,
    endpoint: String,
    jobs: ControllerJobs,
}

impl Default for PredictController {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictController {
    pub fn new() -> Self {
        Self {
            ui: UiState::default(),
            endpoint: config::DEFAULT_ENDPOINT.to_string(),
            jobs: ControllerJobs::new(),
        }
    }

    /// Load persisted config and populate initial UI state.
    pub fn load_configuration(&mut self) -> Result<(), config::ConfigError> {
        let cfg = config::load_or_default()?;
        self.endpoint = cfg.endpoint;
        self.ui.settings.endpoint_input = self.endpoint.clone();
        Ok(())
    }

    /// Base URL the next submission will target.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Replace the stored value for one field. No validation, no coercion.
    pub fn set_field(&mut self, field: FeatureField, value: impl Into<String>) {
        self.ui.form.fields.set(field, value);
    }

    /// Direct text-edit binding for the form renderer.
    pub fn field_value_mut(&mut self, field: FeatureField) -> &mut String {
        self.ui.form.fields.value_mut(field)
    }

    /// Restore every field to its default value.
    pub fn reset_form(&mut self) {
        self.ui.form.fields.reset();
        self.set_status("Form reset to defaults", StatusTone::Info);
    }

    /// Submit the current field values to the prediction endpoint.
    ///
    /// The loading flag is raised before the job thread is spawned.
    /// Re-triggering while a request is in flight issues a fresh request;
    /// the sequence fence in [`ControllerJobs`] ensures only the newest
    /// response is ever applied.
    pub fn submit(&mut self) {
        self.ui.form.submitting = true;
        let request_id = self.jobs.next_request_id();
        tracing::info!(request_id, endpoint = %self.endpoint, "Submitting prediction request");
        self.set_status("Requesting prediction…", StatusTone::Busy);
        self.jobs.begin_predict(PredictJob {
            request_id,
            endpoint: self.endpoint.clone(),
            fields: self.ui.form.fields.clone(),
        });
    }

    /// Clear the prediction outcome and return to the editable form.
    ///
    /// Field values are kept as entered.
    pub fn back_to_form(&mut self) {
        self.ui.form.outcome = PredictionOutcome::Empty;
        self.set_status(
            "Enter session features and predict intent",
            StatusTone::Idle,
        );
    }

    /// Open the endpoint settings window seeded with the active value.
    pub fn open_settings(&mut self) {
        self.ui.settings.open = true;
        self.ui.settings.endpoint_input = self.endpoint.clone();
        self.ui.settings.last_error = None;
    }

    /// Apply the edited endpoint and persist it.
    pub fn apply_endpoint(&mut self) {
        let input = self.ui.settings.endpoint_input.trim();
        if input.is_empty() {
            self.ui.settings.last_error = Some("Endpoint must not be empty".to_string());
            return;
        }
        self.endpoint = input.trim_end_matches('/').to_string();
        self.ui.settings.endpoint_input = self.endpoint.clone();
        if let Err(err) = config::save(&config::AppConfig {
            endpoint: self.endpoint.clone(),
        }) {
            self.ui.settings.last_error = Some(err.to_string());
            return;
        }
        self.ui.settings.open = false;
        self.ui.settings.last_error = None;
        self.set_status(format!("Endpoint set to {}", self.endpoint), StatusTone::Info);
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.text = text.into();
        self.ui.status.badge_label = tone.label().to_string();
        self.ui.status.badge_color = crate::egui_app::ui::style::status_badge_color(tone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_field_is_last_write_wins() {
        let mut controller = PredictController::new();
        controller.set_field(FeatureField::Region, "2");
        controller.set_field(FeatureField::Region, "9");
        assert_eq!(controller.ui.form.fields.get(FeatureField::Region), "9");
    }

    #[test]
    fn back_to_form_clears_outcome_and_keeps_values() {
        let mut controller = PredictController::new();
        controller.set_field(FeatureField::PageValues, "12.5");
        controller.ui.form.outcome = PredictionOutcome::Success {
            label: "Purchase".into(),
        };

        controller.back_to_form();

        assert_eq!(controller.ui.form.outcome, PredictionOutcome::Empty);
        assert_eq!(
            controller.ui.form.fields.get(FeatureField::PageValues),
            "12.5"
        );
    }

    #[test]
    fn reset_form_restores_defaults() {
        let mut controller = PredictController::new();
        controller.set_field(FeatureField::Month, "11");
        controller.reset_form();
        assert_eq!(controller.ui.form.fields, FieldSet::default());
    }

    #[test]
    fn apply_endpoint_rejects_empty_input() {
        let mut controller = PredictController::new();
        controller.ui.settings.endpoint_input = "  ".into();
        controller.apply_endpoint();
        assert!(controller.ui.settings.last_error.is_some());
        assert_eq!(controller.endpoint(), config::DEFAULT_ENDPOINT);
    }
}
