//! Error handling primitives shared across the core.
//!
//! Every error carries a stable [`YieldCode`] so callers on the far side of the
//! C ABI can branch on a number instead of parsing messages.

use thiserror::Error;

/// Stable error codes that cross the FFI boundary.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum YieldCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// Input failed validation.
    InvalidInput = 1,
    /// Model artefact could not be fetched or read.
    ModelMissing = 2,
    /// Crop catalogue could not be read.
    CatalogueMissing = 3,
    /// Artefact or catalogue content does not match the expected layout.
    Schema = 4,
    /// Feature vector width does not match the predictor.
    Shape = 5,
    /// Remote fetch failed.
    Network = 6,
    /// Catch-all for bugs.
    Internal = 7,
}

/// Canonical error type for the core.
#[derive(Debug, Error)]
pub enum YieldError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("malformed model artefact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("download of {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("column '{column}' missing from {path}")]
    MissingColumn { path: String, column: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("feature vector has {got} values, predictor expects {expected}")]
    Shape { expected: usize, got: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout the crate.
pub type YieldResult<T> = Result<T, YieldError>;

impl YieldError {
    /// IO helper that keeps the offending path in the message.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Validation helper.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Schema helper.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Map the error onto its stable code.
    pub fn code(&self) -> YieldCode {
        match self {
            YieldError::Io { .. } | YieldError::Json(_) => YieldCode::ModelMissing,
            YieldError::Csv { .. } | YieldError::MissingColumn { .. } => {
                YieldCode::CatalogueMissing
            }
            YieldError::Network { .. } => YieldCode::Network,
            YieldError::Schema(_) => YieldCode::Schema,
            YieldError::Shape { .. } => YieldCode::Shape,
            YieldError::InvalidInput(_) => YieldCode::InvalidInput,
            YieldError::Internal(_) => YieldCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(YieldCode::Ok as u32, 0);
        assert_eq!(YieldCode::InvalidInput as u32, 1);
        assert_eq!(YieldCode::ModelMissing as u32, 2);
        assert_eq!(YieldCode::CatalogueMissing as u32, 3);
        assert_eq!(YieldCode::Schema as u32, 4);
        assert_eq!(YieldCode::Shape as u32, 5);
        assert_eq!(YieldCode::Network as u32, 6);
        assert_eq!(YieldCode::Internal as u32, 7);
    }

    #[test]
    fn shape_errors_map_to_shape_code() {
        let err = YieldError::Shape {
            expected: 10,
            got: 9,
        };
        assert_eq!(err.code(), YieldCode::Shape);
        assert!(err.to_string().contains("expects 10"));
    }

    #[test]
    fn missing_column_is_a_catalogue_failure() {
        let err = YieldError::MissingColumn {
            path: "crops.csv".into(),
            column: "Crop_Type".into(),
        };
        assert_eq!(err.code(), YieldCode::CatalogueMissing);
    }
}
