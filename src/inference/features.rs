//! Feature vector construction.

use crate::model::NUMERIC_FEATURES;

use super::domain::{FeatureVector, Measurements};

/// Seven measurements followed by a one-hot crop indicator over `crop_universe`.
///
/// The indicator is aligned to the universe's order as given. A crop that is
/// not in the universe yields an all-zero segment; that is not an error.
/// Measurements pass through unchanged.
pub fn build<S: AsRef<str>>(
    selected_crop: &str,
    measurements: &Measurements,
    crop_universe: &[S],
) -> FeatureVector {
    let mut values = Vec::with_capacity(NUMERIC_FEATURES + crop_universe.len());
    values.extend_from_slice(&measurements.as_array());
    values.extend(
        crop_universe
            .iter()
            .map(|crop| if crop.as_ref() == selected_crop { 1.0 } else { 0.0 }),
    );
    FeatureVector::new(values)
}
