//! Feature Vector Builder
//!
//! Maps an AgronomicInput into the fixed-length, fixed-order numeric vector
//! the regressors were trained on. Vector length and column order must match
//! training exactly or predictions are meaningless; `FEATURE_COLUMNS` is the
//! authoritative order and the registry verifies persisted metadata against
//! it.
//!
//! Wind speed, pressure and planting month were available at training time
//! but not at inference time, so they are synthesized from the training
//! distributions on every call. Identical inputs can therefore produce
//! different vectors across calls; callers needing determinism inject an RNG
//! via `build_with_rng`.

use crate::input::AgronomicInput;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Number of features every regressor consumes
pub const FEATURE_WIDTH: usize = 17;

/// Canonical feature order, matching the training dataset column order
pub const FEATURE_COLUMNS: [&str; FEATURE_WIDTH] = [
    "soil_ph",
    "nitrogen_ppm",
    "phosphorus_ppm",
    "potassium_ppm",
    "organic_matter_pct",
    "temperature_c",
    "rainfall_mm",
    "humidity_pct",
    "sunlight_hours",
    "wind_speed_kmh",
    "pressure_hpa",
    "growing_days",
    "planting_month",
    "crop_type_encoded",
    "ph_stress",
    "nutrient_balance",
    "weather_stress",
];

// ============================================================================
// Synthesis Parameters
// ============================================================================
//
// Distribution parameters of the simulated training features.

const WIND_SPEED_MEAN_KMH: f64 = 15.0;
const WIND_SPEED_STDDEV_KMH: f64 = 5.0;
const PRESSURE_MEAN_HPA: f64 = 1013.0;
const PRESSURE_STDDEV_HPA: f64 = 20.0;

/// Average growing period assumed for all crops (days)
pub const DEFAULT_GROWING_DAYS: f64 = 120.0;

/// Agronomic pH optimum used by the stress index
pub const OPTIMAL_PH: f64 = 6.5;

/// Agronomic temperature optimum (°C) used by the stress index
pub const OPTIMAL_TEMPERATURE_C: f64 = 25.0;

/// Fixed-order numeric vector fed to the regressors.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_WIDTH],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_WIDTH]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        FEATURE_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// Derived Stress/Balance Indices
// ============================================================================

/// Relative deviation of soil pH from the agronomic optimum
pub fn ph_stress(ph: f64) -> f64 {
    (ph - OPTIMAL_PH).abs() / OPTIMAL_PH
}

/// Mean of N/P/K concentrations, each normalized to its reference level
pub fn nutrient_balance(nitrogen: f64, phosphorus: f64, potassium: f64) -> f64 {
    (nitrogen / 25.0 + phosphorus / 18.0 + potassium / 30.0) / 3.0
}

/// Relative deviation of temperature from the agronomic optimum
pub fn weather_stress(temperature: f64) -> f64 {
    (temperature - OPTIMAL_TEMPERATURE_C).abs() / OPTIMAL_TEMPERATURE_C
}

/// Encode a crop type as its position in the known-crop list.
///
/// Unknown crops alias to index 0 (the first known crop) rather than failing.
/// This mirrors the training-side label encoder's inference behavior and is
/// documented, possibly-unintended upstream behavior; do not "fix" without
/// retraining.
pub fn encode_crop(crop_type: &str, known_crops: &[String]) -> f64 {
    known_crops
        .iter()
        .position(|c| c == crop_type)
        .unwrap_or(0) as f64
}

/// Build the feature vector for one input using thread-local randomness.
///
/// Never fails: missing upstream fields (wind, pressure, planting month) are
/// synthesized, and unknown crops encode to 0.
pub fn build(input: &AgronomicInput, known_crops: &[String]) -> FeatureVector {
    build_with_rng(input, known_crops, &mut rand::thread_rng())
}

/// Build the feature vector with a caller-supplied RNG.
///
/// Tests use a seeded RNG here to hold the synthesized components constant.
pub fn build_with_rng<R: Rng + ?Sized>(
    input: &AgronomicInput,
    known_crops: &[String],
    rng: &mut R,
) -> FeatureVector {
    // Parameters are compile-time valid, so construction cannot fail.
    let wind = Normal::new(WIND_SPEED_MEAN_KMH, WIND_SPEED_STDDEV_KMH)
        .map(|d| d.sample(rng))
        .unwrap_or(WIND_SPEED_MEAN_KMH);
    let pressure = Normal::new(PRESSURE_MEAN_HPA, PRESSURE_STDDEV_HPA)
        .map(|d| d.sample(rng))
        .unwrap_or(PRESSURE_MEAN_HPA);
    let planting_month = rng.gen_range(1..=12) as f64;

    FeatureVector::from_values([
        input.soil.ph,
        input.soil.nitrogen,
        input.soil.phosphorus,
        input.soil.potassium,
        input.soil.organic_matter,
        input.weather.temperature,
        input.weather.rainfall,
        input.weather.humidity,
        input.weather.sunlight_hours,
        wind,
        pressure,
        DEFAULT_GROWING_DAYS,
        planting_month,
        encode_crop(&input.crop_type, known_crops),
        ph_stress(input.soil.ph),
        nutrient_balance(input.soil.nitrogen, input.soil.phosphorus, input.soil.potassium),
        weather_stress(input.weather.temperature),
    ])
}
