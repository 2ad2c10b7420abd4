//! egui renderer for the application UI.

pub mod style;

use crate::egui_app::controller::PredictController;
use crate::egui_app::state::RenderPhase;
use crate::egui_app::view_model;
use eframe::egui::{self, Align2, Color32, Frame, RichText, Ui, Vec2};

/// Smallest window that still fits the full form.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(560.0, 680.0);

/// Owned snapshot of the render phase, detached from controller borrows.
enum PhaseSnapshot {
    Success { label: String },
    Loading,
    Editing { error: Option<String> },
}

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: PredictController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create a new egui app, loading persisted configuration.
    pub fn new() -> Result<Self, String> {
        let mut controller = PredictController::new();
        controller
            .load_configuration()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self {
            controller,
            visuals_set: false,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(Frame::new().fill(palette.bg_tertiary))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Customer Purchase Intent Prediction")
                            .color(Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                        if ui.button("Endpoint…").clicked() {
                            self.controller.open_settings();
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::new().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(9.0, 11.0),
                        9.0,
                        status.badge_color,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(&status.badge_label).color(Color32::WHITE));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }

    fn render_central(&mut self, ctx: &egui::Context) {
        let phase = match self.controller.ui.form.phase() {
            RenderPhase::Success { label } => PhaseSnapshot::Success {
                label: label.to_string(),
            },
            RenderPhase::Loading => PhaseSnapshot::Loading,
            RenderPhase::Editing { error } => PhaseSnapshot::Editing {
                error: error.map(str::to_string),
            },
        };
        egui::CentralPanel::default().show(ctx, |ui| match &phase {
            PhaseSnapshot::Success { label } => self.render_success(ui, label),
            PhaseSnapshot::Loading => render_loading(ui),
            PhaseSnapshot::Editing { error } => self.render_form(ui, error.as_deref()),
        });
    }

    fn render_success(&mut self, ui: &mut Ui, label: &str) {
        let palette = style::palette();
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.heading(RichText::new("Prediction").color(palette.text_primary));
            ui.add_space(16.0);
            egui::Grid::new("prediction_table")
                .striped(true)
                .spacing(egui::vec2(24.0, 8.0))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new("RandomForest Model Prediction")
                            .strong()
                            .color(palette.text_primary),
                    );
                    ui.end_row();
                    ui.label(RichText::new(label).color(palette.success));
                    ui.end_row();
                });
            ui.add_space(16.0);
            if ui.button("Back to prediction").clicked() {
                self.controller.back_to_form();
            }
        });
    }

    fn render_form(&mut self, ui: &mut Ui, error: Option<&str>) {
        let palette = style::palette();
        if let Some(message) = error {
            Frame::new()
                .fill(Color32::from_rgb(64, 24, 24))
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.label(RichText::new(message).color(palette.warning));
                });
            ui.add_space(8.0);
        }

        egui::ScrollArea::vertical()
            .id_salt("predict_form_scroll")
            .show(ui, |ui| {
                egui::Grid::new("predict_form_grid")
                    .num_columns(2)
                    .spacing(egui::vec2(16.0, 6.0))
                    .show(ui, |ui| {
                        for row in view_model::field_rows() {
                            ui.label(RichText::new(row.label).color(palette.text_muted));
                            ui.add(
                                egui::TextEdit::singleline(
                                    self.controller.field_value_mut(row.field),
                                )
                                .desired_width(220.0),
                            );
                            ui.end_row();
                        }
                    });

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("Predict intent").clicked() {
                        self.controller.submit();
                    }
                    if ui.button("Reset").clicked() {
                        self.controller.reset_form();
                    }
                });
            });
    }

    fn render_settings_window(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.settings.open {
            return;
        }
        let palette = style::palette();
        let mut open = true;
        let mut apply_clicked = false;
        egui::Window::new("Prediction endpoint")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("Base URL of the prediction service")
                        .color(palette.text_primary),
                );
                ui.add_space(6.0);
                ui.add(
                    egui::TextEdit::singleline(&mut self.controller.ui.settings.endpoint_input)
                        .hint_text("http://127.0.0.1:5000")
                        .desired_width(380.0),
                );
                if let Some(err) = self.controller.ui.settings.last_error.as_ref() {
                    ui.add_space(6.0);
                    ui.label(RichText::new(err).color(palette.warning));
                }
                ui.add_space(10.0);
                if ui.button("Apply").clicked() {
                    apply_clicked = true;
                }
            });
        if apply_clicked {
            self.controller.apply_endpoint();
        }
        if !open {
            self.controller.ui.settings.open = false;
        }
    }
}

/// Stateless loading indicator; takes no inputs beyond the frame it draws in.
fn render_loading(ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(64.0);
        ui.add(egui::Spinner::new().size(32.0));
        ui.add_space(12.0);
        ui.label("Waiting for prediction…");
    });
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        if self.controller.ui.form.submitting {
            // Keep frames coming while the job thread works.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
        self.render_top_bar(ctx);
        self.render_status(ctx);
        self.render_central(ctx);
        self.render_settings_window(ctx);
    }
}
