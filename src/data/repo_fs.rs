//! Filesystem-backed crop catalogue reader.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::common::error::{YieldError, YieldResult};

use super::domain::{CropTable, RawCropRow};

pub const CROP_COLUMN: &str = "Crop";
pub const CROP_TYPE_COLUMN: &str = "Crop_Type";

/// Source of catalogue rows.
pub trait CropRepo {
    fn load(&self) -> YieldResult<CropTable>;
}

/// Reads the catalogue from a CSV file with at least `Crop` and `Crop_Type`.
pub struct CsvCropRepo {
    path: PathBuf,
}

impl CsvCropRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CropRepo for CsvCropRepo {
    fn load(&self) -> YieldResult<CropTable> {
        let label = self.path.display().to_string();
        let reader = csv::Reader::from_path(&self.path).map_err(|e| YieldError::Csv {
            path: label.clone(),
            message: format!("failed to open: {e}"),
        })?;
        read_table(reader, &label)
    }
}

/// Parse a catalogue from any reader, `label` names it in errors.
pub fn table_from_reader<R: Read>(input: R, label: &str) -> YieldResult<CropTable> {
    read_table(csv::Reader::from_reader(input), label)
}

fn read_table<R: Read>(mut reader: csv::Reader<R>, label: &str) -> YieldResult<CropTable> {
    let headers = reader
        .headers()
        .map_err(|e| YieldError::Csv {
            path: label.to_string(),
            message: format!("failed to read headers: {e}"),
        })?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| YieldError::MissingColumn {
                path: label.to_string(),
                column: name.to_string(),
            })
    };
    let crop_idx = column(CROP_COLUMN)?;
    let type_idx = column(CROP_TYPE_COLUMN)?;

    let mut rows = Vec::new();
    let mut blank = 0usize;
    for (offset, result) in reader.records().enumerate() {
        let record = result.map_err(|e| YieldError::Csv {
            path: label.to_string(),
            message: format!("row {}: {e}", offset + 2),
        })?;
        let crop = record.get(crop_idx).unwrap_or_default();
        // A blank name is a missing value, not a crop.
        if crop.trim().is_empty() {
            blank += 1;
            continue;
        }
        rows.push(RawCropRow {
            crop: crop.to_string(),
            crop_type: record.get(type_idx).unwrap_or_default().to_string(),
        });
    }
    if blank > 0 {
        warn!(path = label, rows = blank, "skipped catalogue rows without a crop name");
    }

    Ok(CropTable::from_rows(rows))
}
