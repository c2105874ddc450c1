//! Risk Assessment
//!
//! Cross-target risk scores derived from the per-target plans, plus the
//! trigger-counted overall risk level. Trigger thresholds are named
//! constants so the decision table can be audited and tested in isolation.

use crate::predictors::{FertilizerPlan, IrrigationPlan, YieldOutlook};
use serde::{Deserialize, Serialize};

// ============================================================================
// Risk Triggers
// ============================================================================

/// Irrigation demand counted as a risk factor (L/acre)
pub const HIGH_WATER_TRIGGER_LITERS: u32 = 2000;

/// Nitrogen requirement counted as a risk factor (kg)
pub const HIGH_NITROGEN_TRIGGER_KG: u32 = 150;

/// Yield confidence below which the prediction itself is a risk factor (%)
pub const LOW_CONFIDENCE_TRIGGER_PCT: u8 = 80;

/// Overall risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "High")]
    High,
}

impl RiskLevel {
    pub fn display_text(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Classify a trigger count: 0 → Low, 1-2 → Medium, >2 → High
    pub fn from_trigger_count(count: usize) -> Self {
        match count {
            0 => RiskLevel::Low,
            1 | 2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

/// Cross-target risk summary, all scores in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub water_stress: f64,
    pub nutrient_deficiency: f64,
    pub climate_risk: f64,
    pub overall_risk: RiskLevel,
}

/// Water stress from irrigation demand above the 1000 L/acre baseline
pub fn water_stress(liters_per_acre: u32) -> f64 {
    ((liters_per_acre as f64 - 1000.0) / 20.0).clamp(0.0, 100.0)
}

/// Nutrient deficiency from combined NPK demand above the 200 kg baseline
pub fn nutrient_deficiency(total_npk_kg: u32) -> f64 {
    ((total_npk_kg as f64 - 200.0) / 5.0).clamp(0.0, 100.0)
}

/// Climate risk from deviation off the 25 °C optimum
pub fn climate_risk(temperature_c: f64) -> f64 {
    ((temperature_c - 25.0).abs() * 2.0).clamp(0.0, 100.0)
}

/// Assemble the full risk assessment from per-target plans and temperature.
pub fn assess(
    irrigation: &IrrigationPlan,
    fertilizer: &FertilizerPlan,
    outlook: &YieldOutlook,
    temperature_c: f64,
) -> RiskAssessment {
    let mut triggers = 0usize;
    if irrigation.liters_per_acre > HIGH_WATER_TRIGGER_LITERS {
        triggers += 1;
    }
    if fertilizer.nitrogen > HIGH_NITROGEN_TRIGGER_KG {
        triggers += 1;
    }
    if outlook.confidence < LOW_CONFIDENCE_TRIGGER_PCT {
        triggers += 1;
    }

    RiskAssessment {
        water_stress: water_stress(irrigation.liters_per_acre),
        nutrient_deficiency: nutrient_deficiency(fertilizer.total_npk()),
        climate_risk: climate_risk(temperature_c),
        overall_risk: RiskLevel::from_trigger_count(triggers),
    }
}
