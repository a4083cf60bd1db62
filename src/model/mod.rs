//! Model domain: artefact caching, deserialization and the forest predictor.

pub mod domain;
pub mod repo_fs;
pub mod service;

pub use domain::{FeatureSchema, ModelArtifact, Predictor, RandomForest, NUMERIC_FEATURES};
