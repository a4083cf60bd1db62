//! Service layer loading the model artefact.

use std::time::Instant;

use tracing::{info, warn};

use crate::common::config::AppCfg;
use crate::common::error::YieldResult;

use super::domain::{ModelArtifact, Predictor};
use super::repo_fs::{ArtifactFetcher, FsModelRepo};

/// Ensure the configured artefact is cached locally and load it.
pub fn load_model(cfg: &AppCfg) -> YieldResult<ModelArtifact> {
    load_from(&FsModelRepo::new(&cfg.model_path, cfg.model_url.clone()))
}

pub fn load_from<F: ArtifactFetcher>(repo: &FsModelRepo<F>) -> YieldResult<ModelArtifact> {
    let start = Instant::now();
    let artifact = repo.ensure_and_load()?;
    match &artifact.schema {
        Some(schema) => info!(
            path = %repo.path().display(),
            trees = artifact.forest.n_trees(),
            features = artifact.forest.n_features(),
            crop_columns = schema.crop_columns.len(),
            fingerprint = %schema.fingerprint(),
            dur_ms = start.elapsed().as_millis() as u64,
            "model artefact loaded"
        ),
        None => warn!(
            path = %repo.path().display(),
            trees = artifact.forest.n_trees(),
            features = artifact.forest.n_features(),
            "model artefact carries no feature order, crop indicators will follow the catalogue"
        ),
    }
    Ok(artifact)
}
