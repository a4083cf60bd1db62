//! Inference orchestration: build the vector, call the predictor, package the result.

use std::time::Instant;

use tracing::{debug, warn};

use crate::common::error::YieldResult;
use crate::model::Predictor;

use super::domain::{Measurements, Prediction};
use super::features;

/// Perform a single synchronous prediction.
///
/// `crop_universe` must be the order the predictor was trained on. Width or
/// value problems fail this request only.
pub fn predict<S: AsRef<str>>(
    predictor: &dyn Predictor,
    selected_crop: &str,
    measurements: &Measurements,
    crop_universe: &[S],
) -> YieldResult<Prediction> {
    let start = Instant::now();
    measurements.ensure_finite()?;

    let vector = features::build(selected_crop, measurements, crop_universe);
    let crop_known = vector.crop_segment().iter().any(|v| *v != 0.0);
    if !crop_known {
        warn!(crop = selected_crop, "crop not in trained universe, encoding as unknown");
    }

    let raw = predictor.predict(vector.as_slice())?;
    let latency_ms = start.elapsed().as_millis() as u64;
    debug!(crop = selected_crop, raw, latency_ms, "prediction computed");

    Ok(Prediction {
        tons: raw.max(0.0),
        crop_known,
        latency_ms,
    })
}
