//! Economic Impact
//!
//! Simple savings model over the recommended plans: method and nutrient-load
//! bands map to fixed cost-reduction percentages, and profit follows the
//! yield-increase potential.

use crate::predictors::irrigation::IrrigationMethod;
use crate::predictors::{FertilizerPlan, IrrigationPlan, YieldOutlook};
use serde::{Deserialize, Serialize};

const DRIP_WATER_SAVING_PCT: u32 = 20;
const BASELINE_WATER_SAVING_PCT: u32 = 5;

/// Combined NPK below this earns the larger fertilizer saving (kg)
pub const LEAN_NPK_THRESHOLD_KG: u32 = 200;
const LEAN_FERTILIZER_SAVING_PCT: u32 = 15;
const BASELINE_FERTILIZER_SAVING_PCT: u32 = 5;

/// Fraction of the yield increase expected to convert into profit
const PROFIT_CONVERSION: f64 = 0.8;

/// Expected economic impact of following the recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicImpact {
    /// Input-cost reduction (%)
    pub cost_reduction: u32,

    /// Profit increase (%)
    pub profit_increase: f64,
}

/// Summarize the economic impact of the three plans.
pub fn summarize(
    irrigation: &IrrigationPlan,
    fertilizer: &FertilizerPlan,
    outlook: &YieldOutlook,
) -> EconomicImpact {
    let water_saving = match irrigation.method {
        IrrigationMethod::Drip => DRIP_WATER_SAVING_PCT,
        IrrigationMethod::Sprinkler => BASELINE_WATER_SAVING_PCT,
    };

    let fertilizer_saving = if fertilizer.total_npk() < LEAN_NPK_THRESHOLD_KG {
        LEAN_FERTILIZER_SAVING_PCT
    } else {
        BASELINE_FERTILIZER_SAVING_PCT
    };

    EconomicImpact {
        cost_reduction: water_saving + fertilizer_saving,
        profit_increase: (outlook.yield_increase as f64 * PROFIT_CONVERSION).max(0.0),
    }
}
