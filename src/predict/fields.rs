//! The closed set of session-behavior features sent to the prediction service.

use std::fmt;

/// One of the fifteen features the model was trained on, in wire order.
///
/// The set is closed: unknown field names are unrepresentable, so a typo in
/// the UI layer cannot silently add a part the endpoint ignores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureField {
    Administrative,
    AdministrativeDuration,
    Informational,
    InformationalDuration,
    ProductRelated,
    ProductRelatedDuration,
    BounceRates,
    ExitRates,
    PageValues,
    SpecialDay,
    Month,
    OperatingSystems,
    Region,
    TrafficType,
    VisitorType,
}

impl FeatureField {
    /// All fields in the order the endpoint reads them.
    pub const ALL: [FeatureField; 15] = [
        FeatureField::Administrative,
        FeatureField::AdministrativeDuration,
        FeatureField::Informational,
        FeatureField::InformationalDuration,
        FeatureField::ProductRelated,
        FeatureField::ProductRelatedDuration,
        FeatureField::BounceRates,
        FeatureField::ExitRates,
        FeatureField::PageValues,
        FeatureField::SpecialDay,
        FeatureField::Month,
        FeatureField::OperatingSystems,
        FeatureField::Region,
        FeatureField::TrafficType,
        FeatureField::VisitorType,
    ];

    /// Name used for the multipart form part.
    pub fn wire_name(self) -> &'static str {
        match self {
            FeatureField::Administrative => "Administrative",
            FeatureField::AdministrativeDuration => "Administrative_Duration",
            FeatureField::Informational => "Informational",
            FeatureField::InformationalDuration => "Informational_Duration",
            FeatureField::ProductRelated => "ProductRelated",
            FeatureField::ProductRelatedDuration => "ProductRelated_Duration",
            FeatureField::BounceRates => "BounceRates",
            FeatureField::ExitRates => "ExitRates",
            FeatureField::PageValues => "PageValues",
            FeatureField::SpecialDay => "SpecialDay",
            FeatureField::Month => "Month",
            FeatureField::OperatingSystems => "OperatingSystems",
            FeatureField::Region => "Region",
            FeatureField::TrafficType => "TrafficType",
            FeatureField::VisitorType => "VisitorType",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Default value every field starts from.
const DEFAULT_VALUE: &str = "0";

/// Current value of every input field, keyed by [`FeatureField`].
///
/// Values are kept exactly as typed. No parsing or coercion happens here;
/// the endpoint validates and reports malformed input through its reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSet {
    values: [String; 15],
}

impl Default for FieldSet {
    fn default() -> Self {
        Self {
            values: std::array::from_fn(|_| DEFAULT_VALUE.to_string()),
        }
    }
}

impl FieldSet {
    /// Replace the stored value for `field`. Last write wins.
    pub fn set(&mut self, field: FeatureField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Current raw value for `field`.
    pub fn get(&self, field: FeatureField) -> &str {
        &self.values[field.index()]
    }

    /// Mutable handle for direct text editing in the UI.
    pub fn value_mut(&mut self, field: FeatureField) -> &mut String {
        &mut self.values[field.index()]
    }

    /// Restore every field to its default value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Iterate fields and values in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureField, &str)> {
        FeatureField::ALL
            .iter()
            .map(|field| (*field, self.get(*field)))
    }
}
