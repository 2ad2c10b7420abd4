//! Helpers to convert domain data into egui-facing view structs.

use crate::predict::FeatureField;

/// Render-friendly descriptor for one form row.
#[derive(Clone, Copy, Debug)]
pub struct FieldRow {
    pub field: FeatureField,
    pub label: &'static str,
}

/// Form rows in the order the endpoint reads them.
pub fn field_rows() -> impl Iterator<Item = FieldRow> {
    FeatureField::ALL.iter().map(|field| FieldRow {
        field: *field,
        label: field_label(*field),
    })
}

/// User-facing label for a field, including the input hints the model's
/// deployment documented for ambiguous columns.
pub fn field_label(field: FeatureField) -> &'static str {
    match field {
        FeatureField::Administrative => "Administrative",
        FeatureField::AdministrativeDuration => "Administrative_Duration",
        FeatureField::Informational => "Informational",
        FeatureField::InformationalDuration => "Informational_Duration",
        FeatureField::ProductRelated => "ProductRelated",
        FeatureField::ProductRelatedDuration => "ProductRelated_Duration",
        FeatureField::BounceRates => "BounceRates (float)",
        FeatureField::ExitRates => "ExitRates (float)",
        FeatureField::PageValues => "PageValues (float)",
        FeatureField::SpecialDay => "SpecialDay (float)",
        FeatureField::Month => "Month in numbers starting from 0",
        FeatureField::OperatingSystems => "OperatingSystems",
        FeatureField::Region => "Region",
        FeatureField::TrafficType => "TrafficType",
        FeatureField::VisitorType => "Visitor type; 0, 1, or 2",
    }
}
