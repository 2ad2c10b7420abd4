//! Library exports for reuse in integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// Persisted settings.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
pub(crate) mod http_client;
/// Logging setup.
pub mod logging;
/// Prediction service client and field model.
pub mod predict;
