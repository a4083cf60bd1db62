//! Domain definitions for prediction requests and results.

use serde::{Deserialize, Serialize};

use crate::common::error::{YieldError, YieldResult};
use crate::model::NUMERIC_FEATURES;

/// The seven agronomic measurements, in model order.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Measurements {
    /// kg/ha
    pub nitrogen: f64,
    /// kg/ha
    pub phosphorus: f64,
    /// kg/ha
    pub potassium: f64,
    pub ph: f64,
    /// mm
    pub rainfall: f64,
    /// °C
    pub temperature: f64,
    /// hectares
    pub area: f64,
}

impl Measurements {
    /// Values in the fixed order the model consumes.
    pub fn as_array(&self) -> [f64; NUMERIC_FEATURES] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.ph,
            self.rainfall,
            self.temperature,
            self.area,
        ]
    }

    /// Reject NaN and infinities; any finite value is accepted.
    pub fn ensure_finite(&self) -> YieldResult<()> {
        const NAMES: [&str; NUMERIC_FEATURES] = [
            "nitrogen",
            "phosphorus",
            "potassium",
            "ph",
            "rainfall",
            "temperature",
            "area",
        ];
        match self.as_array().iter().position(|v| !v.is_finite()) {
            Some(idx) => Err(YieldError::invalid(format!("{} is not a finite number", NAMES[idx]))),
            None => Ok(()),
        }
    }
}

/// Model input: seven measurements followed by the crop indicators.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn numeric(&self) -> &[f64] {
        &self.0[..NUMERIC_FEATURES.min(self.0.len())]
    }

    pub fn crop_segment(&self) -> &[f64] {
        &self.0[NUMERIC_FEATURES.min(self.0.len())..]
    }
}

/// Result of a single inference call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    /// Estimated production, never negative.
    pub tons: f64,
    /// Whether the crop mapped onto a trained indicator.
    pub crop_known: bool,
    pub latency_ms: u64,
}

impl Prediction {
    pub fn display(&self) -> String {
        format!("{} tons", format_tons(self.tons))
    }
}

/// Two decimals with comma thousands separators: `1234567.891` -> `1,234,567.89`.
pub fn format_tons(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d as char);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}
