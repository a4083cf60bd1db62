//! Input ranges and the advisory messages attached to them.

use serde::Serialize;

/// Form field identifiers, in model order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Nitrogen,
    Phosphorus,
    Potassium,
    Ph,
    Rainfall,
    Temperature,
    Area,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Nitrogen => "nitrogen",
            Field::Phosphorus => "phosphorus",
            Field::Potassium => "potassium",
            Field::Ph => "ph",
            Field::Rainfall => "rainfall",
            Field::Temperature => "temperature",
            Field::Area => "area",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Non-gating hint shown next to a field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Advisory {
    pub field: Field,
    pub severity: Severity,
    pub message: &'static str,
}

/// Widget bounds and recommended band for one field, plus the hint texts
/// for leaving the band on either side.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct FieldRange {
    pub field: Field,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub recommended_low: f64,
    pub recommended_high: f64,
    pub severity: Severity,
    pub below: &'static str,
    pub above: &'static str,
}

pub const FIELD_RANGES: [FieldRange; 7] = [
    FieldRange {
        field: Field::Nitrogen,
        label: "Nitrogen (N)",
        unit: "kg/ha",
        min: 0.0,
        max: 200.0,
        default: 70.0,
        recommended_low: 20.0,
        recommended_high: 150.0,
        severity: Severity::Warning,
        below: "Nitrogen is too low. This may lead to poor plant growth.",
        above: "Excess nitrogen can cause excessive foliage and poor yield.",
    },
    FieldRange {
        field: Field::Phosphorus,
        label: "Phosphorus (P)",
        unit: "kg/ha",
        min: 0.0,
        max: 150.0,
        default: 40.0,
        recommended_low: 15.0,
        recommended_high: 100.0,
        severity: Severity::Warning,
        below: "Low phosphorus may cause stunted root growth.",
        above: "High phosphorus can lead to nutrient imbalance in soil.",
    },
    FieldRange {
        field: Field::Potassium,
        label: "Potassium (K)",
        unit: "kg/ha",
        min: 0.0,
        max: 200.0,
        default: 40.0,
        recommended_low: 20.0,
        recommended_high: 120.0,
        severity: Severity::Warning,
        below: "Potassium deficiency affects water regulation and crop resilience.",
        above: "Too much potassium may block other nutrients like calcium and magnesium.",
    },
    FieldRange {
        field: Field::Ph,
        label: "Soil pH",
        unit: "",
        min: 3.0,
        max: 9.0,
        default: 6.5,
        recommended_low: 5.5,
        recommended_high: 7.5,
        severity: Severity::Warning,
        below: "Soil is too acidic. Consider liming to raise pH.",
        above: "Soil is too alkaline. Apply sulfur or organic matter to lower pH.",
    },
    FieldRange {
        field: Field::Rainfall,
        label: "Rainfall",
        unit: "mm",
        min: 0.0,
        max: 3500.0,
        default: 700.0,
        recommended_low: 300.0,
        recommended_high: 1500.0,
        severity: Severity::Warning,
        below: "Low rainfall may not support healthy crop growth.",
        above: "High rainfall can cause waterlogging or nutrient leaching.",
    },
    FieldRange {
        field: Field::Temperature,
        label: "Temperature",
        unit: "°C",
        min: 0.0,
        max: 50.0,
        default: 26.0,
        recommended_low: 15.0,
        recommended_high: 35.0,
        severity: Severity::Warning,
        below: "Temperature is too low for optimal crop development.",
        above: "High temperature may reduce flowering and grain filling.",
    },
    FieldRange {
        field: Field::Area,
        label: "Area",
        unit: "hectares",
        min: 0.1,
        max: 100_000.0,
        default: 1000.0,
        recommended_low: 1.0,
        recommended_high: 10_000.0,
        severity: Severity::Info,
        below: "Small-scale farming area. Ensure efficient land use.",
        above: "Large-scale operation detected. Consider precision agriculture tools.",
    },
];

/// Hard bounds beyond which an input is treated as physically implausible.
pub mod plausible {
    pub const TEMPERATURE_MIN: f64 = 10.0;
    pub const TEMPERATURE_MAX: f64 = 45.0;
    pub const PH_MIN: f64 = 4.5;
    pub const PH_MAX: f64 = 9.0;
    pub const RAINFALL_MIN: f64 = 50.0;
    pub const RAINFALL_MAX: f64 = 2500.0;
    /// Floor applied to each of N, P and K (kg/ha).
    pub const NUTRIENT_MIN: f64 = 5.0;
    pub const AREA_MIN: f64 = 0.1;
}
