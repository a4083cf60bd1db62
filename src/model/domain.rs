//! Model artefact types: a regression forest plus its trained feature order.
//!
//! Trees are stored in the parallel-array layout scikit-learn exposes on
//! `tree_` (children, split feature, threshold, leaf value), so exporting a
//! fitted `RandomForestRegressor` is a straight dump of those arrays.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::common::error::{YieldError, YieldResult};
use crate::common::ids;
use crate::data::normalize_crop_name;

/// Number of numeric measurements leading every feature vector.
pub const NUMERIC_FEATURES: usize = 7;

/// Prefix `pandas.get_dummies(.., prefix="Crop")` puts on indicator columns.
pub const CROP_COLUMN_PREFIX: &str = "Crop_";

const LEAF: i64 = -1;

/// Anything that turns one feature vector into one scalar.
pub trait Predictor: Send + Sync {
    /// Width of the vector the predictor was trained on.
    fn n_features(&self) -> usize;

    /// Predict a single sample. Width mismatches and non-finite values fail.
    fn predict(&self, features: &[f64]) -> YieldResult<f64>;
}

/// Serialized form of one tree.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

/// Serialized form of the forest.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ForestFile {
    pub n_features: usize,
    pub trees: Vec<TreeArrays>,
}

/// On-disk artefact. The bundle records the column order used at training
/// time; the bare form carries only the predictor.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArtifactFile {
    Bundle {
        feature_columns: Vec<String>,
        model: ForestFile,
    },
    Bare(ForestFile),
}

#[derive(Clone, Debug)]
struct Node {
    left: usize,
    right: usize,
    feature: usize,
    threshold: f64,
    value: f64,
    leaf: bool,
}

/// Validated regression tree.
#[derive(Clone, Debug)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Validate the arrays and build a tree.
    ///
    /// Children must point strictly forward (pre-order layout), which rules out
    /// cycles and guarantees traversal ends at a leaf.
    pub fn from_arrays(arrays: &TreeArrays, n_features: usize) -> YieldResult<Self> {
        let n = arrays.children_left.len();
        if n == 0 {
            return Err(YieldError::schema("tree has no nodes"));
        }
        if arrays.children_right.len() != n
            || arrays.feature.len() != n
            || arrays.threshold.len() != n
            || arrays.value.len() != n
        {
            return Err(YieldError::schema("inconsistent tree array lengths"));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (arrays.children_left[i], arrays.children_right[i]);
            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(YieldError::schema(format!("node {i} has a single child")));
                }
                nodes.push(Node {
                    left: 0,
                    right: 0,
                    feature: 0,
                    threshold: 0.0,
                    value: arrays.value[i],
                    leaf: true,
                });
                continue;
            }

            let forward = |child: i64| child > i as i64 && (child as usize) < n;
            if !forward(left) || !forward(right) {
                return Err(YieldError::schema(format!(
                    "node {i} has out-of-order children ({left}, {right})"
                )));
            }
            let feature = arrays.feature[i];
            if feature < 0 || feature as usize >= n_features {
                return Err(YieldError::schema(format!(
                    "node {i} splits on feature {feature}, forest has {n_features}"
                )));
            }
            nodes.push(Node {
                left: left as usize,
                right: right as usize,
                feature: feature as usize,
                threshold: arrays.threshold[i],
                value: arrays.value[i],
                leaf: false,
            });
        }
        Ok(Self { nodes })
    }

    /// Walk from the root; `x[feature] <= threshold` goes left.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            if node.leaf {
                return node.value;
            }
            idx = if features[node.feature] <= node.threshold {
                node.left
            } else {
                node.right
            };
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.leaf).count()
    }
}

/// Mean of its trees' predictions.
#[derive(Clone, Debug)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn from_file(file: &ForestFile) -> YieldResult<Self> {
        if file.trees.is_empty() {
            return Err(YieldError::schema("forest has no trees"));
        }
        if file.n_features < NUMERIC_FEATURES {
            return Err(YieldError::schema(format!(
                "forest expects {} features, need at least {NUMERIC_FEATURES}",
                file.n_features
            )));
        }
        let trees = file
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| {
                RegressionTree::from_arrays(t, file.n_features)
                    .map_err(|e| YieldError::schema(format!("tree {i}: {e}")))
            })
            .collect::<YieldResult<Vec<_>>>()?;
        Ok(Self {
            trees,
            n_features: file.n_features,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Predictor for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> YieldResult<f64> {
        if features.len() != self.n_features {
            return Err(YieldError::Shape {
                expected: self.n_features,
                got: features.len(),
            });
        }
        if let Some(pos) = features.iter().position(|v| !v.is_finite()) {
            return Err(YieldError::invalid(format!("feature {pos} is not finite")));
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }
}

/// Column order the forest was trained on.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSchema {
    pub numeric_columns: Vec<String>,
    /// Crop names with the indicator prefix removed and catalogue
    /// normalization applied, in training order. Unique.
    pub crop_columns: Vec<String>,
}

impl FeatureSchema {
    pub fn from_columns(columns: &[String]) -> YieldResult<Self> {
        if columns.len() < NUMERIC_FEATURES {
            return Err(YieldError::schema(format!(
                "{} feature columns recorded, need at least {NUMERIC_FEATURES}",
                columns.len()
            )));
        }
        let (numeric, crops) = columns.split_at(NUMERIC_FEATURES);
        if let Some(col) = numeric.iter().find(|c| c.starts_with(CROP_COLUMN_PREFIX)) {
            return Err(YieldError::schema(format!(
                "indicator column '{col}' found among the numeric features"
            )));
        }
        let mut seen = HashSet::new();
        let mut crop_columns = Vec::with_capacity(crops.len());
        for column in crops {
            let raw = column
                .strip_prefix(CROP_COLUMN_PREFIX)
                .ok_or_else(|| YieldError::schema(format!("column '{column}' is not a crop indicator")))?;
            let name = normalize_crop_name(raw);
            if !seen.insert(name.clone()) {
                return Err(YieldError::schema(format!(
                    "indicator column '{column}' repeats crop '{name}'"
                )));
            }
            crop_columns.push(name);
        }
        Ok(Self {
            numeric_columns: numeric.to_vec(),
            crop_columns,
        })
    }

    pub fn width(&self) -> usize {
        self.numeric_columns.len() + self.crop_columns.len()
    }

    pub fn fingerprint(&self) -> String {
        ids::fingerprint(&self.crop_columns)
    }
}

/// Loaded artefact: predictor plus, when recorded, its trained schema.
#[derive(Clone, Debug)]
pub struct ModelArtifact {
    pub forest: RandomForest,
    pub schema: Option<FeatureSchema>,
}

impl ModelArtifact {
    /// Deserialize and validate artefact bytes.
    pub fn from_slice(bytes: &[u8]) -> YieldResult<Self> {
        check_container(bytes)?;
        let file: ArtifactFile = serde_json::from_slice(bytes)?;
        Self::from_file(file)
    }

    pub fn from_file(file: ArtifactFile) -> YieldResult<Self> {
        match file {
            ArtifactFile::Bundle {
                feature_columns,
                model,
            } => {
                let forest = RandomForest::from_file(&model)?;
                let schema = FeatureSchema::from_columns(&feature_columns)?;
                if schema.width() != forest.n_features() {
                    return Err(YieldError::schema(format!(
                        "{} feature columns recorded for a forest of width {}",
                        schema.width(),
                        forest.n_features()
                    )));
                }
                Ok(Self {
                    forest,
                    schema: Some(schema),
                })
            }
            ArtifactFile::Bare(model) => Ok(Self {
                forest: RandomForest::from_file(&model)?,
                schema: None,
            }),
        }
    }
}

/// Protocol 2+ pickles open with the PROTO opcode.
const PICKLE_PROTO: u8 = 0x80;

/// Reject bodies that are clearly not a JSON artefact with a readable message.
fn check_container(bytes: &[u8]) -> YieldResult<()> {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        None => Err(YieldError::schema("model artefact is empty")),
        Some(&PICKLE_PROTO) => Err(YieldError::schema(
            "model artefact is a Python pickle; export the forest to the JSON tree format",
        )),
        Some(b'<') => Err(YieldError::schema(
            "model artefact is an HTML page, the download URL does not serve the file directly",
        )),
        Some(b'{') => Ok(()),
        Some(_) => Err(YieldError::schema("model artefact is not a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// f[0] <= 50 -> 10.0, else f[6] <= 100 -> 20.0, else 30.0
    fn stump() -> TreeArrays {
        TreeArrays {
            children_left: vec![1, -1, 3, -1, -1],
            children_right: vec![2, -1, 4, -1, -1],
            feature: vec![0, -2, 6, -2, -2],
            threshold: vec![50.0, -2.0, 100.0, -2.0, -2.0],
            value: vec![20.0, 10.0, 25.0, 20.0, 30.0],
        }
    }

    fn forest_file(n_features: usize) -> ForestFile {
        ForestFile {
            n_features,
            trees: vec![stump(), stump()],
        }
    }

    #[test]
    fn tree_traversal_follows_thresholds() {
        let tree = RegressionTree::from_arrays(&stump(), 8).unwrap();
        let mut x = [0.0; 8];
        x[0] = 50.0;
        assert_eq!(tree.predict(&x), 10.0); // <= goes left
        x[0] = 51.0;
        x[6] = 10.0;
        assert_eq!(tree.predict(&x), 20.0);
        x[6] = 1000.0;
        assert_eq!(tree.predict(&x), 30.0);
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
    }

    #[test]
    fn backward_children_are_rejected() {
        let mut arrays = stump();
        arrays.children_right[2] = 0;
        assert!(matches!(
            RegressionTree::from_arrays(&arrays, 8),
            Err(YieldError::Schema(_))
        ));
    }

    #[test]
    fn split_feature_must_exist() {
        assert!(RegressionTree::from_arrays(&stump(), 6).is_err());
    }

    #[test]
    fn forest_averages_and_checks_width() {
        let mut file = forest_file(8);
        file.trees[1].value[1] = 30.0;
        let forest = RandomForest::from_file(&file).unwrap();
        assert_eq!(forest.predict(&[0.0; 8]).unwrap(), 20.0);

        match forest.predict(&[0.0; 9]) {
            Err(YieldError::Shape { expected, got }) => assert_eq!((expected, got), (8, 9)),
            other => panic!("expected shape error, got {other:?}"),
        }
        assert!(matches!(
            forest.predict(&[f64::NAN; 8]),
            Err(YieldError::InvalidInput(_))
        ));
    }

    #[test]
    fn bundle_schema_strips_prefix() {
        let json = serde_json::json!({
            "feature_columns": ["N", "P", "K", "pH", "rainfall", "temperature", "Area", "Crop_Rice"],
            "model": forest_file(8),
        });
        let artifact = ModelArtifact::from_slice(json.to_string().as_bytes()).unwrap();
        let schema = artifact.schema.unwrap();
        assert_eq!(schema.crop_columns, vec!["Rice"]);
        assert_eq!(schema.numeric_columns[3], "pH");
    }

    #[test]
    fn bare_forest_has_no_schema() {
        let json = serde_json::to_vec(&forest_file(8)).unwrap();
        let artifact = ModelArtifact::from_slice(&json).unwrap();
        assert!(artifact.schema.is_none());
        assert_eq!(artifact.forest.n_trees(), 2);
    }

    #[test]
    fn bundle_width_must_match_forest() {
        let json = serde_json::json!({
            "feature_columns": ["N", "P", "K", "pH", "rainfall", "temperature", "Area"],
            "model": forest_file(8),
        });
        assert!(ModelArtifact::from_slice(json.to_string().as_bytes()).is_err());
    }

    #[test]
    fn foreign_containers_are_named() {
        let pickle = ModelArtifact::from_slice(b"\x80\x04\x95pickle").unwrap_err();
        assert!(pickle.to_string().contains("pickle"));
        let html = ModelArtifact::from_slice(b"  <!DOCTYPE html><html>").unwrap_err();
        assert!(matches!(html, YieldError::Schema(_)));
        assert!(matches!(ModelArtifact::from_slice(b""), Err(YieldError::Schema(_))));
        assert!(matches!(
            ModelArtifact::from_slice(b"{\"trees\": 3"),
            Err(YieldError::Json(_))
        ));
    }

    fn columns(crops: &[&str]) -> Vec<String> {
        ["N", "P", "K", "pH", "rainfall", "temperature", "Area"]
            .iter()
            .chain(crops)
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn crop_columns_use_catalogue_spelling() {
        let schema =
            FeatureSchema::from_columns(&columns(&["Crop_rice", "Crop_ moong(green gram)"])).unwrap();
        assert_eq!(schema.crop_columns, vec!["Rice", "Moong(Green Gram)"]);
    }

    #[test]
    fn duplicate_crop_columns_are_rejected() {
        let exact = FeatureSchema::from_columns(&columns(&["Crop_Rice", "Crop_Rice"]));
        assert!(matches!(exact, Err(YieldError::Schema(_))));
        // Distinct raw labels that collapse to the same crop.
        let folded = FeatureSchema::from_columns(&columns(&["Crop_Rice", "Crop_RICE "]));
        assert!(matches!(folded, Err(YieldError::Schema(_))));
    }
}
