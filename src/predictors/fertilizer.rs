//! Fertilizer Predictor
//!
//! Multi-output target: three independently trained regressors (N, P, K)
//! are invoked with the same scaled vector. All three share the nitrogen
//! scaler, matching how the models were exported; see DESIGN.md.

use super::{predict_scalar, scale_features, PredictError};
use crate::features::FeatureVector;
use crate::registry::{ModelRegistry, Target};
use serde::{Deserialize, Serialize};

const STANDARD_EFFICIENCY_PCT: u8 = 85;
const FALLBACK_EFFICIENCY_PCT: u8 = 80;

/// Complete fertilizer recommendation in kg per acre, always fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerPlan {
    pub nitrogen: u32,
    pub phosphorus: u32,
    pub potassium: u32,
    pub application_schedule: Vec<String>,
    pub efficiency: u8,
}

impl FertilizerPlan {
    /// Combined N+P+K load (kg), used by risk and economics scoring
    pub fn total_npk(&self) -> u32 {
        self.nitrogen + self.phosphorus + self.potassium
    }
}

/// Fixed record used when the real prediction is unavailable.
pub fn fallback() -> FertilizerPlan {
    FertilizerPlan {
        nitrogen: 100,
        phosphorus: 50,
        potassium: 60,
        application_schedule: vec!["Split application recommended".to_string()],
        efficiency: FALLBACK_EFFICIENCY_PCT,
    }
}

/// Floor at zero and round to whole kilograms
fn to_kilograms(raw: f64) -> u32 {
    raw.max(0.0).round() as u32
}

/// Predict N/P/K requirements from a built feature vector.
///
/// Fails as a unit: if any of the three regressors is unavailable the whole
/// plan falls back, rather than mixing real and default nutrient figures.
pub fn predict(
    registry: &ModelRegistry,
    features: &FeatureVector,
) -> Result<FertilizerPlan, PredictError> {
    let scaled = scale_features(registry, Target::NitrogenFertilizer, features);

    let nitrogen = predict_scalar(registry, Target::NitrogenFertilizer, &scaled)?;
    let phosphorus = predict_scalar(registry, Target::PhosphorusFertilizer, &scaled)?;
    let potassium = predict_scalar(registry, Target::PotassiumFertilizer, &scaled)?;

    Ok(FertilizerPlan {
        nitrogen: to_kilograms(nitrogen),
        phosphorus: to_kilograms(phosphorus),
        potassium: to_kilograms(potassium),
        application_schedule: vec![
            "25% at planting".to_string(),
            "50% at vegetative stage".to_string(),
            "25% at flowering".to_string(),
        ],
        efficiency: STANDARD_EFFICIENCY_PCT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::Regressor;
    use crate::features::FEATURE_WIDTH;
    use std::fs;
    use std::path::Path;

    fn write_linear(dir: &Path, name: &str, intercept: f64) {
        let model = Regressor::Linear {
            intercept,
            coefficients: vec![0.0; FEATURE_WIDTH],
        };
        fs::write(dir.join(name), serde_json::to_string(&model).unwrap()).unwrap();
    }

    fn zero_features() -> FeatureVector {
        FeatureVector::from_values([0.0; FEATURE_WIDTH])
    }

    #[test]
    fn test_three_regressors_one_plan() {
        let dir = tempfile::tempdir().unwrap();
        write_linear(dir.path(), "rf_nitrogen_fertilizer_model.json", 120.6);
        write_linear(dir.path(), "rf_phosphorus_fertilizer_model.json", 45.2);
        write_linear(dir.path(), "rf_potassium_fertilizer_model.json", -3.0);

        let registry = ModelRegistry::open(dir.path());
        let plan = predict(&registry, &zero_features()).unwrap();

        assert_eq!(plan.nitrogen, 121);
        assert_eq!(plan.phosphorus, 45);
        assert_eq!(plan.potassium, 0); // floored at zero
        assert_eq!(plan.total_npk(), 166);
        assert_eq!(plan.application_schedule.len(), 3);
        assert_eq!(plan.efficiency, 85);
    }

    #[test]
    fn test_partial_artifacts_fail_as_a_unit() {
        let dir = tempfile::tempdir().unwrap();
        write_linear(dir.path(), "rf_nitrogen_fertilizer_model.json", 100.0);
        // phosphorus and potassium models missing

        let registry = ModelRegistry::open(dir.path());
        let err = predict(&registry, &zero_features()).unwrap_err();
        assert!(matches!(
            err,
            PredictError::ArtifactUnavailable {
                target: Target::PhosphorusFertilizer,
                ..
            }
        ));
    }

    #[test]
    fn test_fallback_record() {
        let plan = fallback();
        assert_eq!((plan.nitrogen, plan.phosphorus, plan.potassium), (100, 50, 60));
        assert_eq!(plan.efficiency, 80);
        assert_eq!(plan.application_schedule, ["Split application recommended"]);
    }

    #[test]
    fn test_serialization_names() {
        let json = serde_json::to_value(fallback()).unwrap();
        assert_eq!(json["applicationSchedule"][0], "Split application recommended");
        assert_eq!(json["nitrogen"], 100);
    }
}
