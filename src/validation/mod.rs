//! Input validation: the plausibility gate and advisory range hints.

pub mod domain;
pub mod service;

pub use domain::{Advisory, Field, FieldRange, Severity, FIELD_RANGES};
pub use service::{advisories, check_plausibility};
