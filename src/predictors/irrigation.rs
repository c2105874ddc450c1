//! Irrigation Predictor
//!
//! Converts the raw liters-per-acre regression output into an irrigation
//! plan: delivery method, frequency and efficiency follow fixed demand
//! bands, kept as named constants so the decision table stays auditable.

use super::{predict_scalar, scale_features, PredictError};
use crate::features::FeatureVector;
use crate::registry::{ModelRegistry, Target};
use serde::{Deserialize, Serialize};

// ============================================================================
// Decision Thresholds
// ============================================================================

/// Demand above which sprinklers replace drip lines (L/acre)
pub const SPRINKLER_THRESHOLD_LITERS: f64 = 2000.0;

/// Demand above which drip irrigation runs every 2-3 days (L/acre)
pub const FREQUENT_DRIP_THRESHOLD_LITERS: f64 = 1000.0;

/// Minimum plausible recommendation (L/acre)
pub const MIN_LITERS_PER_ACRE: f64 = 100.0;

const DRIP_EFFICIENCY_PCT: u8 = 90;
const SPRINKLER_EFFICIENCY_PCT: u8 = 75;
const FALLBACK_EFFICIENCY_PCT: u8 = 85;

/// Water delivery method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrrigationMethod {
    #[serde(rename = "Drip Irrigation")]
    Drip,
    #[serde(rename = "Sprinkler System")]
    Sprinkler,
}

impl IrrigationMethod {
    pub fn display_text(&self) -> &'static str {
        match self {
            IrrigationMethod::Drip => "Drip Irrigation",
            IrrigationMethod::Sprinkler => "Sprinkler System",
        }
    }
}

/// Watering cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrrigationFrequency {
    #[serde(rename = "Daily")]
    Daily,
    #[serde(rename = "Every 2-3 days")]
    EveryTwoToThreeDays,
    #[serde(rename = "Weekly")]
    Weekly,
}

impl IrrigationFrequency {
    pub fn display_text(&self) -> &'static str {
        match self {
            IrrigationFrequency::Daily => "Daily",
            IrrigationFrequency::EveryTwoToThreeDays => "Every 2-3 days",
            IrrigationFrequency::Weekly => "Weekly",
        }
    }
}

/// Complete irrigation recommendation, always fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrigationPlan {
    pub liters_per_acre: u32,
    pub frequency: IrrigationFrequency,
    pub method: IrrigationMethod,
    pub efficiency: u8,
    pub critical_periods: Vec<String>,
}

/// Fixed record used when the real prediction is unavailable.
pub fn fallback() -> IrrigationPlan {
    IrrigationPlan {
        liters_per_acre: 1000,
        frequency: IrrigationFrequency::EveryTwoToThreeDays,
        method: IrrigationMethod::Drip,
        efficiency: FALLBACK_EFFICIENCY_PCT,
        critical_periods: vec!["Flowering stage".to_string()],
    }
}

/// Predict irrigation requirements from a built feature vector.
pub fn predict(
    registry: &ModelRegistry,
    features: &FeatureVector,
) -> Result<IrrigationPlan, PredictError> {
    let scaled = scale_features(registry, Target::Irrigation, features);
    let raw_liters = predict_scalar(registry, Target::Irrigation, &scaled)?;

    let (method, frequency) = if raw_liters > SPRINKLER_THRESHOLD_LITERS {
        (IrrigationMethod::Sprinkler, IrrigationFrequency::Daily)
    } else if raw_liters > FREQUENT_DRIP_THRESHOLD_LITERS {
        (IrrigationMethod::Drip, IrrigationFrequency::EveryTwoToThreeDays)
    } else {
        (IrrigationMethod::Drip, IrrigationFrequency::Weekly)
    };

    let efficiency = match method {
        IrrigationMethod::Drip => DRIP_EFFICIENCY_PCT,
        IrrigationMethod::Sprinkler => SPRINKLER_EFFICIENCY_PCT,
    };

    Ok(IrrigationPlan {
        liters_per_acre: raw_liters.max(MIN_LITERS_PER_ACRE).round() as u32,
        frequency,
        method,
        efficiency,
        critical_periods: vec![
            "Flowering stage".to_string(),
            "Early grain filling".to_string(),
        ],
    })
}
