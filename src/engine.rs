//! Request orchestration over the two process-wide caches.
//!
//! The crop catalogue and the model artefact are each loaded at most once per
//! [`Engine`] and never mutated afterwards. The crop universe used for one-hot
//! encoding comes from the artefact's recorded training order whenever the
//! artefact carries one; the catalogue order is only a fallback for bare
//! artefacts.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::common::cache::Memo;
use crate::common::config::AppCfg;
use crate::common::error::{YieldError, YieldResult};
use crate::common::{ids, log};
use crate::data::{self, normalize_crop_name, CropTable};
use crate::inference::{self, Measurements, Prediction};
use crate::model::{self, ModelArtifact};
use crate::validation::{self, Advisory};

/// Where the one-hot order came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniverseSource {
    TrainedSchema,
    Catalogue,
}

/// Crop names in the order the predictor expects its indicators.
#[derive(Clone, Debug)]
pub struct CropUniverse {
    pub names: Vec<String>,
    pub source: UniverseSource,
}

/// Outcome of one form submission.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Estimated {
        crop: String,
        crop_type: Option<String>,
        prediction: Prediction,
        display: String,
        advisories: Vec<Advisory>,
    },
    Rejected {
        issues: Vec<String>,
        advisories: Vec<Advisory>,
    },
}

pub struct Engine {
    cfg: AppCfg,
    table: Memo<CropTable>,
    model: Memo<ModelArtifact>,
    universe: Memo<CropUniverse>,
}

impl Engine {
    /// Engine that loads its resources lazily from the locations in `cfg`.
    pub fn new(cfg: AppCfg) -> Self {
        Self {
            cfg,
            table: Memo::new(),
            model: Memo::new(),
            universe: Memo::new(),
        }
    }

    /// Engine over resources that are already in memory.
    pub fn from_parts(table: CropTable, artifact: ModelArtifact) -> Self {
        Self {
            cfg: AppCfg::default(),
            table: Memo::with_value(table),
            model: Memo::with_value(artifact),
            universe: Memo::new(),
        }
    }

    pub fn cfg(&self) -> &AppCfg {
        &self.cfg
    }

    pub fn crop_table(&self) -> YieldResult<&CropTable> {
        self.table
            .get_or_try_init(|| data::service::load_table(&self.cfg))
    }

    pub fn model(&self) -> YieldResult<&ModelArtifact> {
        self.model
            .get_or_try_init(|| model::service::load_model(&self.cfg))
    }

    /// Engine with every resource loaded; the first load failure is returned.
    pub fn start(cfg: AppCfg) -> YieldResult<Self> {
        let engine = Self::new(cfg);
        engine.warm_up()?;
        Ok(engine)
    }

    /// Load both resources up front so failures surface at startup.
    pub fn warm_up(&self) -> YieldResult<()> {
        self.crop_table()?;
        self.model()?;
        self.crop_universe()?;
        Ok(())
    }

    pub fn crop_universe(&self) -> YieldResult<&CropUniverse> {
        self.universe.get_or_try_init(|| -> YieldResult<CropUniverse> {
            let table = self.crop_table()?;
            let artifact = self.model()?;
            Ok(resolve_universe(table, artifact))
        })
    }

    /// Run the plausibility gate and, if it passes, predict. Resources load
    /// before the gate runs, so an engine without a model never answers.
    pub fn submit(&self, crop: &str, measurements: &Measurements) -> YieldResult<Outcome> {
        let table = self.crop_table()?;
        let artifact = self.model()?;
        let universe = self.crop_universe()?;

        measurements.ensure_finite()?;
        let advisories = validation::advisories(measurements);
        let issues = validation::check_plausibility(measurements);
        if !issues.is_empty() {
            info!(crop, issues = issues.len(), "submission rejected by plausibility gate");
            return Ok(Outcome::Rejected { issues, advisories });
        }

        let canonical = normalize_crop_name(crop);
        let prediction =
            inference::service::predict(&artifact.forest, &canonical, measurements, &universe.names)?;
        info!(
            crop = %canonical,
            tons = prediction.tons,
            crop_known = prediction.crop_known,
            latency_ms = prediction.latency_ms,
            "estimate produced"
        );

        Ok(Outcome::Estimated {
            crop_type: table.crop_type(&canonical).map(str::to_string),
            display: prediction.display(),
            crop: canonical,
            prediction,
            advisories,
        })
    }
}

fn resolve_universe(table: &CropTable, artifact: &ModelArtifact) -> CropUniverse {
    let catalogue = table.names();
    let Some(schema) = &artifact.schema else {
        warn!(
            crops = catalogue.len(),
            fingerprint = %ids::fingerprint(&catalogue),
            "no trained feature order recorded, falling back to catalogue order"
        );
        return CropUniverse {
            names: catalogue,
            source: UniverseSource::Catalogue,
        };
    };

    let trained: HashSet<&str> = schema.crop_columns.iter().map(String::as_str).collect();
    let listed: HashSet<&str> = catalogue.iter().map(String::as_str).collect();
    let untrained = listed.difference(&trained).count();
    let unlisted = trained.difference(&listed).count();
    if untrained > 0 || unlisted > 0 {
        warn!(
            untrained,
            unlisted,
            trained_fingerprint = %schema.fingerprint(),
            catalogue_fingerprint = %ids::fingerprint(&catalogue),
            "catalogue and trained crop columns disagree, encoding follows the trained order"
        );
    }

    CropUniverse {
        names: schema.crop_columns.clone(),
        source: UniverseSource::TrainedSchema,
    }
}

static GLOBAL: OnceLock<YieldResult<Engine>> = OnceLock::new();

/// Process-wide engine configured from the environment, with logging installed.
///
/// Startup runs once. A failed startup is kept and returned to every later
/// caller; the process has to be restarted to try again.
pub fn global() -> Result<&'static Engine, &'static YieldError> {
    start_once(&GLOBAL, || {
        let cfg = AppCfg::load();
        log::init(&cfg);
        Engine::start(cfg)
    })
}

fn start_once<'a, F>(
    slot: &'a OnceLock<YieldResult<Engine>>,
    start: F,
) -> Result<&'a Engine, &'a YieldError>
where
    F: FnOnce() -> YieldResult<Engine>,
{
    slot.get_or_init(|| {
        let started = start();
        if let Err(err) = &started {
            error!(code = err.code() as u32, error = %err, "engine startup failed");
        }
        started
    })
    .as_ref()
}
