//! Shared state types for the egui UI.

use crate::egui_app::ui::style;
use crate::predict::FieldSet;
use egui::Color32;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    pub form: PredictFormState,
    /// Endpoint settings window state.
    pub settings: SettingsState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            form: PredictFormState::default(),
            settings: SettingsState::default(),
        }
    }
}

/// Form values, submission flag, and the last prediction outcome.
#[derive(Clone, Debug, Default)]
pub struct PredictFormState {
    pub fields: FieldSet,
    pub outcome: PredictionOutcome,
    /// True from the moment submit is triggered until the response settles.
    pub submitting: bool,
}

impl PredictFormState {
    /// Resolve which view the renderer should draw.
    ///
    /// Precedence: a successful prediction always wins, then the loading
    /// indicator, then the editable form with an optional error banner.
    pub fn phase(&self) -> RenderPhase<'_> {
        if let PredictionOutcome::Success { label } = &self.outcome {
            if !label.is_empty() {
                return RenderPhase::Success { label };
            }
        }
        if self.submitting {
            return RenderPhase::Loading;
        }
        RenderPhase::Editing {
            error: self.outcome.failure_message(),
        }
    }
}

/// Result of the most recent submission, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PredictionOutcome {
    /// No response yet, or reset via "back to prediction".
    #[default]
    Empty,
    /// The model returned a classification.
    Success { label: String },
    /// The request failed; message shown in the form banner.
    Failure { message: String },
}

impl PredictionOutcome {
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            PredictionOutcome::Failure { message } => Some(message),
            _ => None,
        }
    }
}

/// The view the renderer draws for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPhase<'a> {
    Success { label: &'a str },
    Loading,
    Editing { error: Option<&'a str> },
}

/// Endpoint settings window state.
#[derive(Clone, Debug, Default)]
pub struct SettingsState {
    pub open: bool,
    /// Edited endpoint value, applied back to config on save.
    pub endpoint_input: String,
    pub last_error: Option<String>,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Enter session features and predict intent".into(),
            badge_label: "Idle".into(),
            badge_color: style::status_badge_color(style::StatusTone::Idle),
        }
    }
}
