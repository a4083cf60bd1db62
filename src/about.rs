//! Static text for the "About" mode.

pub const ABOUT_TEXT: &str = "\
Crop Production Predictor

Estimates the expected production of a crop, in tons, from soil nutrients \
(nitrogen, phosphorus, potassium), soil pH, rainfall, temperature and the \
cultivated area.

How it works
  1. Pick a crop (optionally narrow the list by crop type first).
  2. Enter the seven soil and climate measurements. Values outside the \
recommended range produce advisory hints; physically implausible values \
are rejected before any prediction is made.
  3. The measurements and a one-hot encoding of the crop are passed to a \
random forest regression model trained on historical production records.

The estimate is a statistical expectation, not a guarantee. Local \
practices, pests, irrigation and market conditions are not modelled.
";
