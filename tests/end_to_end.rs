use std::fs;
use std::path::{Path, PathBuf};

use cropcast::common::config::AppCfg;
use cropcast::engine::UniverseSource;
use cropcast::inference::Measurements;
use cropcast::{Engine, Outcome, YieldCode, YieldError};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn nominal() -> Measurements {
    Measurements {
        nitrogen: 70.0,
        phosphorus: 40.0,
        potassium: 40.0,
        ph: 6.5,
        rainfall: 700.0,
        temperature: 26.0,
        area: 1000.0,
    }
}

/// Engine over a copy of the fixtures; the artefact is pre-cached so no
/// download is attempted.
fn engine_with(model_fixture: &str, dir: &Path) -> Engine {
    let model_path = dir.join("forest.json");
    fs::copy(fixture(model_fixture), &model_path).unwrap();
    Engine::new(AppCfg {
        model_path,
        model_url: "http://127.0.0.1:9/forest.json".to_string(),
        crops_csv: fixture("Crop_production.csv"),
        ..AppCfg::default()
    })
}

fn estimated(outcome: Outcome) -> (String, Option<String>, cropcast::inference::Prediction) {
    match outcome {
        Outcome::Estimated {
            crop,
            crop_type,
            prediction,
            ..
        } => (crop, crop_type, prediction),
        Outcome::Rejected { issues, .. } => panic!("unexpected rejection: {issues:?}"),
    }
}

#[test]
fn catalogue_is_unique_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with("forest_bundle.json", dir.path());
    let table = engine.crop_table().unwrap();

    let names = table.names();
    assert_eq!(
        names,
        vec!["Arhar/Tur", "Coconut", "Maize", "Moong(Green Gram)", "Rice", "Wheat"]
    );
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, names);
    assert_eq!(table.crop_type("Rice"), Some("kharif"));
    assert_eq!(table.crop_type("Coconut"), Some("whole year"));
}

#[test]
fn known_crop_produces_estimate() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with("forest_bundle.json", dir.path());
    engine.warm_up().unwrap();
    assert_eq!(
        engine.crop_universe().unwrap().source,
        UniverseSource::TrainedSchema
    );

    let (crop, crop_type, prediction) = estimated(engine.submit("Rice", &nominal()).unwrap());
    assert_eq!(crop, "Rice");
    assert_eq!(crop_type.as_deref(), Some("kharif"));
    assert!(prediction.crop_known);
    assert_eq!(prediction.tons, 2350.0);
    assert!(prediction.tons >= 0.0);
}

#[test]
fn unknown_crop_still_predicts() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with("forest_bundle.json", dir.path());

    let (_, crop_type, prediction) = estimated(engine.submit("Quinoa", &nominal()).unwrap());
    assert!(crop_type.is_none());
    assert!(!prediction.crop_known);
    assert_eq!(prediction.tons, 1950.0);
}

#[test]
fn predictions_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with("forest_bundle.json", dir.path());
    let first = estimated(engine.submit("Wheat", &nominal()).unwrap()).2;
    for _ in 0..5 {
        let again = estimated(engine.submit("Wheat", &nominal()).unwrap()).2;
        assert_eq!(again.tons, first.tons);
    }
}

#[test]
fn bare_artifact_aligns_to_catalogue() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with("forest_bare.json", dir.path());
    assert_eq!(
        engine.crop_universe().unwrap().source,
        UniverseSource::Catalogue
    );
    let (_, _, prediction) = estimated(engine.submit(" rice ", &nominal()).unwrap());
    assert_eq!(prediction.tons, 3000.0);
}

#[test]
fn implausible_temperature_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with("forest_bundle.json", dir.path());
    let cold = Measurements {
        temperature: 5.0,
        ..nominal()
    };
    match engine.submit("Rice", &cold).unwrap() {
        Outcome::Rejected { issues, .. } => {
            assert_eq!(issues.len(), 1);
            assert!(issues[0].contains("Temperature"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn cached_artifact_survives_file_removal() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with("forest_bundle.json", dir.path());
    engine.warm_up().unwrap();
    fs::remove_file(dir.path().join("forest.json")).unwrap();
    assert!(engine.submit("Rice", &nominal()).is_ok());
}

#[test]
fn missing_catalogue_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = AppCfg::default();
    cfg.crops_csv = dir.path().join("absent.csv");
    let err = Engine::new(cfg).crop_table().unwrap_err();
    assert_eq!(err.code(), YieldCode::CatalogueMissing);
}

#[test]
fn unreachable_download_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("forest.json");
    let engine = Engine::new(AppCfg {
        model_path: model_path.clone(),
        model_url: "http://127.0.0.1:9/forest.json".to_string(),
        crops_csv: fixture("Crop_production.csv"),
        ..AppCfg::default()
    });
    assert!(matches!(engine.model(), Err(YieldError::Network { .. })));
    assert!(!model_path.exists());
}
