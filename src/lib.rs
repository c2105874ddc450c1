//! Crop Advisor Rust Implementation
//!
//! Inference aggregation engine for agricultural recommendations: builds the
//! fixed-order feature vector from soil and weather measurements, combines
//! the independently trained per-target regressors, applies domain
//! post-processing, and degrades to fallback records when trained artifacts
//! are missing.
//!
//! - `input` / `features`: domain input and the feature-order contract
//! - `artifacts` / `registry`: persisted model loading with lazy caching
//! - `predictors/`: irrigation, fertilizer and yield predictors
//! - `risk` / `advice` / `economics`: cross-target derivations
//! - `engine`: the `predict_all` entry point

pub mod advice;
pub mod artifacts;
pub mod economics;
pub mod engine;
pub mod features;
pub mod input;
pub mod predictors;
pub mod registry;
pub mod risk;

// Re-export commonly used types
pub use engine::{AdvisorEngine, AggregateResult};
pub use features::{FeatureVector, FEATURE_COLUMNS, FEATURE_WIDTH};
pub use input::{AgronomicInput, SoilMeasurements, WeatherMeasurements};
pub use predictors::{FertilizerPlan, IrrigationPlan, YieldOutlook};
pub use registry::{ModelRegistry, Target};
pub use risk::{RiskAssessment, RiskLevel};
