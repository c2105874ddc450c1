//! Model Registry
//!
//! Resolves regressor and scaler artifacts for named targets, lazily and
//! failure-tolerantly: the first request for an artifact reads it from the
//! configured directory, successes are cached for the process lifetime, and
//! any read failure surfaces as `Unavailable` rather than an error. Nothing
//! past this boundary ever sees an I/O or parse failure.
//!
//! Caches are behind RwLocks so a warm registry is freely shareable across
//! request threads; racing loads are idempotent (worst case a redundant
//! read, first insert wins).

use crate::artifacts::{FeatureScaler, ModelMetadata, Regressor};
use crate::features::FEATURE_COLUMNS;
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Algorithm used when metadata names no best model for a target
pub const DEFAULT_ALGORITHM: &str = "rf";

/// Crop list used when no trained label encoder is available.
///
/// Order matters: crop encoding is positional, and unknown crops alias to
/// index 0 ("rice").
pub fn default_crops() -> Vec<String> {
    [
        "rice", "wheat", "maize", "cotton", "sugarcane", "tomato", "potato", "soybean",
        "barley", "sorghum", "groundnut", "mustard",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// One predicted quantity with its own persisted regressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Irrigation,
    NitrogenFertilizer,
    PhosphorusFertilizer,
    PotassiumFertilizer,
    Yield,
    YieldIncrease,
}

impl Target {
    /// Name used in artifact filenames and metadata keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Irrigation => "irrigation",
            Target::NitrogenFertilizer => "nitrogen_fertilizer",
            Target::PhosphorusFertilizer => "phosphorus_fertilizer",
            Target::PotassiumFertilizer => "potassium_fertilizer",
            Target::Yield => "yield",
            Target::YieldIncrease => "yield_increase",
        }
    }

    pub fn all() -> &'static [Target] {
        &[
            Target::Irrigation,
            Target::NitrogenFertilizer,
            Target::PhosphorusFertilizer,
            Target::PotassiumFertilizer,
            Target::Yield,
            Target::YieldIncrease,
        ]
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a regressor lookup.
///
/// `Unavailable` covers every failure class (missing file, corrupt JSON,
/// structural mismatch); the distinction lives in the warn log, not the type,
/// because callers react identically.
#[derive(Debug, Clone)]
pub enum ArtifactStatus {
    Ready(Arc<Regressor>),
    Unavailable,
}

/// Lazy, cached artifact resolution for one models directory.
pub struct ModelRegistry {
    models_dir: PathBuf,

    regressors: RwLock<FxHashMap<(Target, String), Arc<Regressor>>>,
    scalers: RwLock<FxHashMap<Target, Arc<FeatureScaler>>>,

    /// Known-crop list in training encoder order
    known_crops: Vec<String>,

    /// Target name → best algorithm, from metadata
    best_models: FxHashMap<String, String>,

    /// True when metadata was missing or its column order disagrees with
    /// the canonical feature order
    fallback_mode: bool,
}

impl ModelRegistry {
    /// Open a registry over a models directory.
    ///
    /// Probes metadata eagerly (it is one small file and decides the crop
    /// list); regressors and scalers stay lazy. Never fails: a missing or
    /// unusable metadata record enables fallback mode with the default crop
    /// list.
    pub fn open(models_dir: impl AsRef<Path>) -> Self {
        let models_dir = models_dir.as_ref().to_path_buf();
        let metadata_path = models_dir.join("model_metadata.json");

        let mut fallback_mode = false;
        let metadata = match ModelMetadata::load(&metadata_path) {
            Ok(metadata) => metadata,
            Err(error) => {
                warn!(path = ?metadata_path, %error, "metadata unavailable - entering fallback mode");
                fallback_mode = true;
                ModelMetadata::default()
            }
        };

        // The order contract: metadata trained on a different column order
        // would make every prediction meaningless, so treat it like missing
        // metadata. An empty list (fallback metadata) is left alone.
        if !metadata.feature_columns.is_empty()
            && metadata
                .feature_columns
                .iter()
                .map(String::as_str)
                .ne(FEATURE_COLUMNS.iter().copied())
        {
            warn!(
                path = ?metadata_path,
                "metadata feature_columns disagree with canonical order - entering fallback mode"
            );
            fallback_mode = true;
        }

        let known_crops = if metadata.label_encoders.crop_type.is_empty() {
            default_crops()
        } else {
            metadata.label_encoders.crop_type.clone()
        };

        let best_models = metadata
            .best_models
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        debug!(dir = ?models_dir, fallback_mode, crops = known_crops.len(), "model registry opened");

        Self {
            models_dir,
            regressors: RwLock::new(FxHashMap::default()),
            scalers: RwLock::new(FxHashMap::default()),
            known_crops,
            best_models,
            fallback_mode,
        }
    }

    /// Crop types in training encoder order
    pub fn known_crops(&self) -> &[String] {
        &self.known_crops
    }

    /// True when persisted metadata could not be trusted
    pub fn fallback_mode(&self) -> bool {
        self.fallback_mode
    }

    /// Best algorithm recorded for a target, defaulting to `"rf"`
    pub fn best_algorithm(&self, target: Target) -> &str {
        self.best_models
            .get(target.as_str())
            .map(String::as_str)
            .unwrap_or(DEFAULT_ALGORITHM)
    }

    /// Resolve the regressor for a (target, algorithm) pair.
    ///
    /// Successes are cached; failures are logged and re-probed on the next
    /// call (an operator can drop artifacts in without restarting).
    pub fn regressor(&self, target: Target, algorithm: &str) -> ArtifactStatus {
        let key = (target, algorithm.to_string());

        if let Some(model) = self
            .regressors
            .read()
            .ok()
            .and_then(|cache| cache.get(&key).cloned())
        {
            return ArtifactStatus::Ready(model);
        }

        let path = self
            .models_dir
            .join(format!("{}_{}_model.json", algorithm, target.as_str()));

        match Regressor::load(&path) {
            Ok(model) => {
                let model = Arc::new(model);
                if let Ok(mut cache) = self.regressors.write() {
                    // First insert wins on a racing load
                    let entry = cache.entry(key).or_insert_with(|| model.clone());
                    return ArtifactStatus::Ready(entry.clone());
                }
                ArtifactStatus::Ready(model)
            }
            Err(error) => {
                warn!(target = %target, algorithm, %error, "regressor unavailable");
                ArtifactStatus::Unavailable
            }
        }
    }

    /// Resolve the feature scaler for a target.
    ///
    /// `None` means the degraded pass-through path: features go to the
    /// regressor unscaled.
    pub fn scaler(&self, target: Target) -> Option<Arc<FeatureScaler>> {
        if let Some(scaler) = self
            .scalers
            .read()
            .ok()
            .and_then(|cache| cache.get(&target).cloned())
        {
            return Some(scaler);
        }

        let path = self
            .models_dir
            .join(format!("scaler_{}.json", target.as_str()));

        match FeatureScaler::load(&path) {
            Ok(scaler) => {
                let scaler = Arc::new(scaler);
                if let Ok(mut cache) = self.scalers.write() {
                    let entry = cache.entry(target).or_insert_with(|| scaler.clone());
                    return Some(entry.clone());
                }
                Some(scaler)
            }
            Err(error) => {
                debug!(target = %target, %error, "scaler unavailable - features pass through unscaled");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_WIDTH;
    use std::fs;

    fn write_json(dir: &Path, name: &str, value: &serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_string(value).unwrap()).unwrap();
    }

    fn linear_model_json(intercept: f64) -> serde_json::Value {
        serde_json::json!({
            "kind": "linear",
            "intercept": intercept,
            "coefficients": vec![0.0; FEATURE_WIDTH],
        })
    }

    #[test]
    fn test_empty_dir_is_fallback_mode() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModelRegistry::open(dir.path());

        assert!(registry.fallback_mode());
        assert_eq!(registry.known_crops(), default_crops().as_slice());
        assert_eq!(registry.known_crops()[0], "rice");
        assert_eq!(registry.known_crops().len(), 12);

        assert!(matches!(
            registry.regressor(Target::Irrigation, "rf"),
            ArtifactStatus::Unavailable
        ));
        assert!(registry.scaler(Target::Irrigation).is_none());
    }

    #[test]
    fn test_metadata_crops_and_best_models() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "model_metadata.json",
            &serde_json::json!({
                "feature_columns": FEATURE_COLUMNS,
                "label_encoders": {"crop_type": ["cassava", "yam"]},
                "best_models": {"irrigation": "gb"},
            }),
        );

        let registry = ModelRegistry::open(dir.path());
        assert!(!registry.fallback_mode());
        assert_eq!(registry.known_crops(), ["cassava", "yam"]);
        assert_eq!(registry.best_algorithm(Target::Irrigation), "gb");
        assert_eq!(registry.best_algorithm(Target::Yield), DEFAULT_ALGORITHM);
    }

    #[test]
    fn test_column_order_mismatch_enables_fallback_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut columns: Vec<&str> = FEATURE_COLUMNS.to_vec();
        columns.swap(0, 1);
        write_json(
            dir.path(),
            "model_metadata.json",
            &serde_json::json!({
                "feature_columns": columns,
                "label_encoders": {"crop_type": ["rice"]},
            }),
        );

        let registry = ModelRegistry::open(dir.path());
        assert!(registry.fallback_mode());
        // Output shape concerns are downstream; the encoder list still loads
        assert_eq!(registry.known_crops(), ["rice"]);
    }

    #[test]
    fn test_regressor_loads_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "rf_irrigation_model.json", &linear_model_json(1500.0));

        let registry = ModelRegistry::open(dir.path());

        let first = registry.regressor(Target::Irrigation, "rf");
        let ArtifactStatus::Ready(model) = first else {
            panic!("expected Ready");
        };
        assert_eq!(model.predict(&vec![0.0; FEATURE_WIDTH]), 1500.0);

        // Delete the file; the cached artifact must still resolve
        fs::remove_file(dir.path().join("rf_irrigation_model.json")).unwrap();
        assert!(matches!(
            registry.regressor(Target::Irrigation, "rf"),
            ArtifactStatus::Ready(_)
        ));
        // A different algorithm misses the cache and probes the directory
        assert!(matches!(
            registry.regressor(Target::Irrigation, "gb"),
            ArtifactStatus::Unavailable
        ));
    }

    #[test]
    fn test_corrupt_regressor_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rf_yield_model.json"), "not json").unwrap();

        let registry = ModelRegistry::open(dir.path());
        assert!(matches!(
            registry.regressor(Target::Yield, "rf"),
            ArtifactStatus::Unavailable
        ));
    }

    #[test]
    fn test_failures_are_reprobed() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModelRegistry::open(dir.path());

        assert!(matches!(
            registry.regressor(Target::Irrigation, "rf"),
            ArtifactStatus::Unavailable
        ));

        // Drop the artifact in afterwards; the next request finds it
        write_json(dir.path(), "rf_irrigation_model.json", &linear_model_json(900.0));
        assert!(matches!(
            registry.regressor(Target::Irrigation, "rf"),
            ArtifactStatus::Ready(_)
        ));
    }

    #[test]
    fn test_scaler_loads() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "scaler_yield.json",
            &serde_json::json!({
                "mean": vec![0.0; FEATURE_WIDTH],
                "scale": vec![1.0; FEATURE_WIDTH],
            }),
        );

        let registry = ModelRegistry::open(dir.path());
        let scaler = registry.scaler(Target::Yield).expect("scaler present");
        assert_eq!(scaler.transform(&vec![3.0; FEATURE_WIDTH])[0], 3.0);
        assert!(registry.scaler(Target::Irrigation).is_none());
    }
}
