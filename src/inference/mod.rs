//! Inference domain: feature construction and single-sample prediction.

pub mod domain;
pub mod features;
pub mod service;

pub use domain::{format_tons, FeatureVector, Measurements, Prediction};
