//! Data domain: the crop reference catalogue.

pub mod domain;
pub mod repo_fs;
pub mod service;

pub use domain::{capitalize, normalize_crop_name, normalize_crop_type, CropRecord, CropTable};
