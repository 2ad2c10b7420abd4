//! Client for the purchase-intent prediction service.

pub mod api;
mod fields;

pub use fields::{FeatureField, FieldSet};
