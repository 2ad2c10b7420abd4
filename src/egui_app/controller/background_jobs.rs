//! Applies settled background job results back onto UI state.

use super::PredictController;
use super::jobs::{JobMessage, PredictResult};
use crate::egui_app::state::PredictionOutcome;
use crate::egui_app::ui::style::StatusTone;
use crate::predict::api::PredictError;
use std::sync::mpsc::TryRecvError;

impl PredictController {
    /// Drain settled job messages; called once per frame by the renderer.
    ///
    /// Outcome and loading flag are updated together here, so the UI never
    /// observes a settled response with the loading flag still raised.
    pub fn poll_background_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            match message {
                JobMessage::PredictSettled(result) => self.apply_predict_settled(result),
            }
        }
    }

    fn apply_predict_settled(&mut self, message: PredictResult) {
        if !self.jobs.is_current(message.request_id) {
            tracing::debug!(
                request_id = message.request_id,
                "Dropping stale prediction response"
            );
            return;
        }
        self.jobs.clear_in_flight();
        self.ui.form.submitting = false;

        match message.result {
            Ok(reply) => {
                tracing::info!(
                    request_id = message.request_id,
                    label = %reply.label,
                    elapsed_ms = message.elapsed.as_millis() as u64,
                    "Prediction received"
                );
                self.ui.form.outcome = PredictionOutcome::Success { label: reply.label };
                self.set_status(
                    format!("Prediction received in {:.1}s", message.elapsed.as_secs_f32()),
                    StatusTone::Info,
                );
            }
            Err(err) => {
                tracing::warn!(
                    request_id = message.request_id,
                    error = %err,
                    "Prediction request failed"
                );
                let message_text = match &err {
                    // Server-supplied validation message, verbatim.
                    PredictError::Rejected(message) => message.clone(),
                    other => other.to_string(),
                };
                self.ui.form.outcome = PredictionOutcome::Failure {
                    message: message_text,
                };
                self.set_status("Prediction failed", StatusTone::Error);
            }
        }
    }
}
