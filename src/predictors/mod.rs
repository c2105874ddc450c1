//! Per-Target Predictors
//!
//! One module per target group, all following the same template: resolve the
//! target's scaler (pass through unscaled if absent), invoke the
//! regressor(s), clamp and round the raw output into domain-valid ranges,
//! and derive categorical fields from named thresholds.
//!
//! Predictors return `Result<Plan, PredictError>` rather than swallowing
//! failures internally; the engine collapses errors to each predictor's
//! fixed fallback record at the outermost boundary, so partial degradation
//! never cascades and diagnostics survive to the warn log.

pub mod fertilizer;
pub mod harvest;
pub mod irrigation;

use crate::features::FeatureVector;
use crate::registry::{ArtifactStatus, ModelRegistry, Target};
use std::sync::Arc;
use thiserror::Error;

pub use fertilizer::FertilizerPlan;
pub use harvest::YieldOutlook;
pub use irrigation::IrrigationPlan;

/// Why a predictor could not produce a real prediction.
///
/// Never escapes the engine; collapsed there to the predictor's fallback
/// record with a warn naming the cause.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("artifact unavailable for target '{target}' (algorithm '{algorithm}')")]
    ArtifactUnavailable { target: Target, algorithm: String },

    #[error("regressor for target '{target}' produced a non-finite output")]
    NonFiniteOutput { target: Target },
}

/// Resolve a target's regressor under the registry's best algorithm.
fn resolve_regressor(
    registry: &ModelRegistry,
    target: Target,
) -> Result<Arc<crate::artifacts::Regressor>, PredictError> {
    let algorithm = registry.best_algorithm(target);
    match registry.regressor(target, algorithm) {
        ArtifactStatus::Ready(model) => Ok(model),
        ArtifactStatus::Unavailable => Err(PredictError::ArtifactUnavailable {
            target,
            algorithm: algorithm.to_string(),
        }),
    }
}

/// Scale features with the target's scaler, or pass them through unscaled.
///
/// The unscaled path is the documented degraded-accuracy mode, not an error.
fn scale_features(
    registry: &ModelRegistry,
    scaler_target: Target,
    features: &FeatureVector,
) -> Vec<f64> {
    match registry.scaler(scaler_target) {
        Some(scaler) => scaler.transform(features.as_slice()),
        None => features.as_slice().to_vec(),
    }
}

/// Run one regressor over pre-scaled features, rejecting non-finite output.
fn predict_scalar(
    registry: &ModelRegistry,
    target: Target,
    scaled: &[f64],
) -> Result<f64, PredictError> {
    let model = resolve_regressor(registry, target)?;
    let raw = model.predict(scaled);
    if raw.is_finite() {
        Ok(raw)
    } else {
        Err(PredictError::NonFiniteOutput { target })
    }
}
