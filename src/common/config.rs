//! Runtime configuration loaded from the environment.
//!
//! Command line flags may override individual values after loading.

use std::env;
use std::path::PathBuf;

/// Remote location of the published forest artefact.
pub const DEFAULT_MODEL_URL: &str =
    "https://drive.google.com/uc?export=download&id=1iE2enOk6xOkXFoFVQSBqR8jU9J_F8EL-";

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug, PartialEq)]
pub struct AppCfg {
    pub model_path: PathBuf,
    pub model_url: String,
    pub crops_csv: PathBuf,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("random_forest_model.json"),
            model_url: DEFAULT_MODEL_URL.to_string(),
            crops_csv: PathBuf::from("Crop_production.csv"),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            model_path: lookup("CROPCAST_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            model_url: lookup("CROPCAST_MODEL_URL").unwrap_or(defaults.model_url),
            crops_csv: lookup("CROPCAST_CROPS_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.crops_csv),
            log_level: lookup("CROPCAST_LOG").unwrap_or(defaults.log_level),
            log_json: lookup("CROPCAST_LOG_JSON")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.log_json),
        }
    }

    /// Apply explicit overrides, typically coming from command line flags.
    pub fn with_overrides(
        mut self,
        model_path: Option<PathBuf>,
        model_url: Option<String>,
        crops_csv: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = model_path {
            self.model_path = path;
        }
        if let Some(url) = model_url {
            self.model_url = url;
        }
        if let Some(path) = crops_csv {
            self.crops_csv = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_environment_yields_defaults() {
        let cfg = AppCfg::from_lookup(|_| None);
        assert_eq!(cfg, AppCfg::default());
    }

    #[test]
    fn environment_values_win_over_defaults() {
        let vars: HashMap<&str, &str> = [
            ("CROPCAST_MODEL_PATH", "/srv/models/forest.json"),
            ("CROPCAST_CROPS_CSV", "/srv/data/crops.csv"),
            ("CROPCAST_LOG_JSON", "TRUE"),
        ]
        .into_iter()
        .collect();
        let cfg = AppCfg::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.model_path, PathBuf::from("/srv/models/forest.json"));
        assert_eq!(cfg.crops_csv, PathBuf::from("/srv/data/crops.csv"));
        assert!(cfg.log_json);
        assert_eq!(cfg.model_url, DEFAULT_MODEL_URL);
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let cfg = AppCfg::default().with_overrides(None, Some("http://mirror/forest".into()), None);
        assert_eq!(cfg.model_url, "http://mirror/forest");
        assert_eq!(cfg.model_path, AppCfg::default().model_path);
    }
}
