//! Persisted Model Artifacts
//!
//! Serde-backed types for the artifacts the training collaborator writes:
//! regressors (one per target/algorithm pair), feature scalers, and the
//! metadata record. All are JSON documents loaded with anyhow context so a
//! failed read carries the offending path into the registry's warn log.
//!
//! Artifacts are read-only at inference time and never written back.

use crate::features::FEATURE_WIDTH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One node of a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree, stored as a flat node arena rooted at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Walk the tree for one feature row.
    ///
    /// Assumes `validate` has passed, so node and feature indices are in
    /// range and the walk terminates.
    fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Check node references: children strictly forward (guarantees
    /// termination) and feature indices within the vector width.
    fn validate(&self, width: usize) -> Result<()> {
        if self.nodes.is_empty() {
            anyhow::bail!("tree has no nodes");
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= width {
                    anyhow::bail!("node {} splits on feature {} (width {})", idx, feature, width);
                }
                if *left <= idx || *right <= idx || *left >= self.nodes.len() || *right >= self.nodes.len() {
                    anyhow::bail!("node {} has out-of-order child indices", idx);
                }
            }
        }
        Ok(())
    }
}

/// A persisted trained regressor for one (target, algorithm) pair.
///
/// Two families cover the exported production models: linear models and
/// additive tree ensembles (random forest and gradient boosting exports both
/// serialize to the ensemble form, differing only in how the trees were
/// fitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    TreeEnsemble {
        base_prediction: f64,
        trees: Vec<RegressionTree>,
    },
}

impl Regressor {
    /// Load and structurally validate a regressor from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read regressor file: {:?}", path))?;

        let regressor: Regressor = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse regressor JSON: {:?}", path))?;

        regressor
            .validate(FEATURE_WIDTH)
            .with_context(|| format!("Invalid regressor structure: {:?}", path))?;

        Ok(regressor)
    }

    /// Structural validation against the expected feature width.
    ///
    /// Runs once at load so `predict` cannot index out of bounds.
    pub fn validate(&self, width: usize) -> Result<()> {
        match self {
            Regressor::Linear { coefficients, .. } => {
                if coefficients.len() != width {
                    anyhow::bail!(
                        "linear model has {} coefficients, expected {}",
                        coefficients.len(),
                        width
                    );
                }
                Ok(())
            }
            Regressor::TreeEnsemble { trees, .. } => {
                if trees.is_empty() {
                    anyhow::bail!("tree ensemble has no trees");
                }
                for tree in trees {
                    tree.validate(width)?;
                }
                Ok(())
            }
        }
    }

    /// Predict a single scalar for one feature row.
    ///
    /// `features` must have the validated width; the registry only hands out
    /// validated regressors and the builder only produces full-width vectors.
    pub fn predict(&self, features: &[f64]) -> f64 {
        match self {
            Regressor::Linear {
                intercept,
                coefficients,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(features)
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
            Regressor::TreeEnsemble {
                base_prediction,
                trees,
            } => {
                base_prediction
                    + trees.iter().map(|t| t.predict(features)).sum::<f64>()
            }
        }
    }
}

/// Standard feature scaler (per-column mean and scale), paired with a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler {
    /// Load and validate a scaler from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler file: {:?}", path))?;

        let scaler: FeatureScaler = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scaler JSON: {:?}", path))?;

        if scaler.mean.len() != FEATURE_WIDTH || scaler.scale.len() != FEATURE_WIDTH {
            anyhow::bail!(
                "scaler width {}x{} does not match feature width {}: {:?}",
                scaler.mean.len(),
                scaler.scale.len(),
                FEATURE_WIDTH,
                path
            );
        }

        Ok(scaler)
    }

    /// Produce the scaled copy of one feature row.
    ///
    /// Zero scale entries pass the centered value through unscaled rather
    /// than dividing by zero (constant training columns).
    pub fn transform(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                if *scale != 0.0 {
                    (x - mean) / scale
                } else {
                    x - mean
                }
            })
            .collect()
    }
}

/// Ordered label-encoder categories persisted at training time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoders {
    #[serde(default)]
    pub crop_type: Vec<String>,
}

/// Training-run metadata record.
///
/// `feature_columns` is the authoritative training column order; the
/// registry refuses to trust artifacts whose order disagrees with
/// `features::FEATURE_COLUMNS`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub feature_columns: Vec<String>,

    #[serde(default)]
    pub label_encoders: LabelEncoders,

    /// Per-target, per-algorithm evaluation metrics (R², MAE, ...)
    #[serde(default)]
    pub evaluation_results: HashMap<String, serde_json::Value>,

    /// Target name → best-performing algorithm name
    #[serde(default)]
    pub best_models: HashMap<String, String>,
}

impl ModelMetadata {
    /// Load metadata from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse metadata JSON: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_features() -> Vec<f64> {
        vec![1.0; FEATURE_WIDTH]
    }

    #[test]
    fn test_linear_predict() {
        let model = Regressor::Linear {
            intercept: 10.0,
            coefficients: vec![2.0; FEATURE_WIDTH],
        };
        model.validate(FEATURE_WIDTH).unwrap();

        // 10 + 17 * 2 * 1
        assert_relative_eq!(model.predict(&unit_features()), 44.0);
    }

    #[test]
    fn test_linear_width_mismatch_rejected() {
        let model = Regressor::Linear {
            intercept: 0.0,
            coefficients: vec![1.0; 5],
        };
        assert!(model.validate(FEATURE_WIDTH).is_err());
    }

    #[test]
    fn test_tree_ensemble_predict() {
        // Single stump: features[0] <= 5 -> 100, else 200
        let model = Regressor::TreeEnsemble {
            base_prediction: 50.0,
            trees: vec![RegressionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 0,
                        threshold: 5.0,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { value: 100.0 },
                    TreeNode::Leaf { value: 200.0 },
                ],
            }],
        };
        model.validate(FEATURE_WIDTH).unwrap();

        let mut low = unit_features();
        low[0] = 3.0;
        let mut high = unit_features();
        high[0] = 8.0;

        assert_relative_eq!(model.predict(&low), 150.0);
        assert_relative_eq!(model.predict(&high), 250.0);
    }

    #[test]
    fn test_cyclic_tree_rejected() {
        // Child pointing back at the root would loop forever
        let tree = RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 0,
                    right: 1,
                },
                TreeNode::Leaf { value: 1.0 },
            ],
        };
        assert!(tree.validate(FEATURE_WIDTH).is_err());
    }

    #[test]
    fn test_scaler_transform() {
        let scaler = FeatureScaler {
            mean: vec![1.0; FEATURE_WIDTH],
            scale: vec![2.0; FEATURE_WIDTH],
        };

        let scaled = scaler.transform(&vec![5.0; FEATURE_WIDTH]);
        assert_eq!(scaled.len(), FEATURE_WIDTH);
        for v in scaled {
            assert_relative_eq!(v, 2.0);
        }
    }

    #[test]
    fn test_zero_scale_passes_centered_value() {
        let mut scale = vec![2.0; FEATURE_WIDTH];
        scale[3] = 0.0;
        let scaler = FeatureScaler {
            mean: vec![1.0; FEATURE_WIDTH],
            scale,
        };

        let scaled = scaler.transform(&vec![5.0; FEATURE_WIDTH]);
        assert_relative_eq!(scaled[3], 4.0);
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata: ModelMetadata = serde_json::from_str("{}").unwrap();
        assert!(metadata.feature_columns.is_empty());
        assert!(metadata.label_encoders.crop_type.is_empty());
        assert!(metadata.best_models.is_empty());
    }

    #[test]
    fn test_regressor_json_shape() {
        let json = r#"{
            "kind": "linear",
            "intercept": 1.5,
            "coefficients": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]
        }"#;
        let model: Regressor = serde_json::from_str(json).unwrap();
        model.validate(FEATURE_WIDTH).unwrap();
        assert_relative_eq!(model.predict(&unit_features()), 1.5);
    }
}
