//! Service layer loading the crop catalogue.

use std::time::Instant;

use tracing::{info, warn};

use crate::common::config::AppCfg;
use crate::common::error::YieldResult;
use crate::common::ids;

use super::domain::CropTable;
use super::repo_fs::{CropRepo, CsvCropRepo};

/// Load the catalogue configured in `cfg`.
pub fn load_table(cfg: &AppCfg) -> YieldResult<CropTable> {
    load_from(&CsvCropRepo::new(&cfg.crops_csv))
}

/// Load the catalogue from an arbitrary repository.
pub fn load_from(repo: &dyn CropRepo) -> YieldResult<CropTable> {
    let start = Instant::now();
    let table = repo.load()?;
    if table.is_empty() {
        warn!("crop catalogue is empty, every selection will encode as unknown");
    }
    info!(
        crops = table.len(),
        types = table.types().len(),
        fingerprint = %ids::fingerprint(&table.names()),
        dur_ms = start.elapsed().as_millis() as u64,
        "crop catalogue loaded"
    );
    Ok(table)
}
