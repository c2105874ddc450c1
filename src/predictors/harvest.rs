//! Yield Predictor
//!
//! Two regressors share the yield scaler: expected yield (t/ha) and the
//! yield-increase potential (%). Confidence and limiting factors are not
//! model outputs; they are derived from input quality against fixed
//! agronomic thresholds.

use super::{predict_scalar, scale_features, PredictError};
use crate::features::FeatureVector;
use crate::input::AgronomicInput;
use crate::registry::{ModelRegistry, Target};
use serde::{Deserialize, Serialize};

// ============================================================================
// Confidence Scoring
// ============================================================================

const BASE_CONFIDENCE: u8 = 85;
const MAX_CONFIDENCE: u8 = 98;
const FALLBACK_CONFIDENCE: u8 = 70;

const NEUTRAL_PH_BONUS: u8 = 5; // |pH - 6.5| < 0.5
const ORGANIC_MATTER_BONUS: u8 = 3; // OM > 3%
const RAINFALL_BONUS: u8 = 4; // rainfall in [50, 200] mm

// ============================================================================
// Limiting-Factor Thresholds
// ============================================================================

const PH_RANGE: (f64, f64) = (5.5, 8.0);
const MIN_ORGANIC_MATTER_PCT: f64 = 2.0;
const TEMPERATURE_RANGE_C: (f64, f64) = (10.0, 35.0);
const MIN_RAINFALL_MM: f64 = 50.0;

/// Yield-increase potential is clamped to this range (%)
pub const YIELD_INCREASE_RANGE_PCT: (f64, f64) = (0.0, 50.0);

/// Complete yield outlook, always fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldOutlook {
    /// Expected yield (t/ha), one decimal place
    pub expected_yield: f64,

    /// Achievable increase with recommended practices (%)
    pub yield_increase: u32,

    /// Conditions holding yield back; never empty (a sentinel entry reports
    /// the all-clear)
    pub limiting_factors: Vec<String>,

    /// Prediction confidence (%), always within [70, 98]
    pub confidence: u8,
}

/// Fixed record used when the real prediction is unavailable.
pub fn fallback() -> YieldOutlook {
    YieldOutlook {
        expected_yield: 3.5,
        yield_increase: 15,
        limiting_factors: vec!["Model prediction unavailable".to_string()],
        confidence: FALLBACK_CONFIDENCE,
    }
}

/// Score confidence from input quality, capped at `MAX_CONFIDENCE`.
fn confidence_for(input: &AgronomicInput) -> u8 {
    let mut confidence = BASE_CONFIDENCE;
    if (input.soil.ph - 6.5).abs() < 0.5 {
        confidence += NEUTRAL_PH_BONUS;
    }
    if input.soil.organic_matter > 3.0 {
        confidence += ORGANIC_MATTER_BONUS;
    }
    if (MIN_RAINFALL_MM..=200.0).contains(&input.weather.rainfall) {
        confidence += RAINFALL_BONUS;
    }
    confidence.min(MAX_CONFIDENCE)
}

/// Identify conditions outside the productive ranges.
fn limiting_factors_for(input: &AgronomicInput) -> Vec<String> {
    let mut factors = Vec::new();

    if input.soil.ph < PH_RANGE.0 || input.soil.ph > PH_RANGE.1 {
        factors.push("Soil pH imbalance".to_string());
    }
    if input.soil.organic_matter < MIN_ORGANIC_MATTER_PCT {
        factors.push("Low organic matter".to_string());
    }
    if input.weather.temperature < TEMPERATURE_RANGE_C.0
        || input.weather.temperature > TEMPERATURE_RANGE_C.1
    {
        factors.push("Temperature stress".to_string());
    }
    if input.weather.rainfall < MIN_RAINFALL_MM {
        factors.push("Water stress".to_string());
    }

    if factors.is_empty() {
        factors.push("No major limiting factors detected".to_string());
    }
    factors
}

/// Round to one decimal place (t/ha display precision)
fn to_tons_per_hectare(raw: f64) -> f64 {
    (raw.max(0.0) * 10.0).round() / 10.0
}

/// Predict yield and increase potential from a built feature vector.
pub fn predict(
    registry: &ModelRegistry,
    features: &FeatureVector,
    input: &AgronomicInput,
) -> Result<YieldOutlook, PredictError> {
    let scaled = scale_features(registry, Target::Yield, features);

    let expected_yield = predict_scalar(registry, Target::Yield, &scaled)?;
    let yield_increase = predict_scalar(registry, Target::YieldIncrease, &scaled)?;

    let (min_increase, max_increase) = YIELD_INCREASE_RANGE_PCT;

    Ok(YieldOutlook {
        expected_yield: to_tons_per_hectare(expected_yield),
        yield_increase: yield_increase.clamp(min_increase, max_increase).round() as u32,
        limiting_factors: limiting_factors_for(input),
        confidence: confidence_for(input),
    })
}
