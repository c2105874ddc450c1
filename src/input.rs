//! Agronomic Input definition and reference scenarios
//!
//! Defines the AgronomicInput struct describing the field conditions a
//! prediction is made for, plus hardcoded reference scenarios used by tests
//! and demos. Field presence validation belongs to the HTTP caller; this
//! crate assumes a well-formed input.

use serde::{Deserialize, Serialize};

/// Soil measurements for one field.
///
/// Nutrient concentrations are topsoil lab values in ppm; organic matter is
/// a mass percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilMeasurements {
    /// Soil pH (H2O)
    pub ph: f64,

    /// Available nitrogen (ppm)
    pub nitrogen: f64,

    /// Available phosphorus (ppm)
    pub phosphorus: f64,

    /// Available potassium (ppm)
    pub potassium: f64,

    /// Organic matter content (%)
    pub organic_matter: f64,
}

/// Weather measurements for the current season.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherMeasurements {
    /// Mean temperature (°C)
    pub temperature: f64,

    /// Seasonal rainfall (mm)
    pub rainfall: f64,

    /// Relative humidity (%)
    pub humidity: f64,

    /// Daily sunlight (hours)
    pub sunlight_hours: f64,
}

/// Complete input for one prediction request.
///
/// `crop_type` is a free string; crops outside the registry's known list are
/// encoded as index 0 rather than rejected (see `features::encode_crop`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgronomicInput {
    pub soil: SoilMeasurements,
    pub weather: WeatherMeasurements,
    pub crop_type: String,
}

// ============================================================================
// Hardcoded Reference Scenarios
// ============================================================================

/// Paddy rice under benign conditions.
///
/// Matches the upstream worked example: neutral pH, moderate nutrients,
/// temperate weather. With no artifacts present this input must produce the
/// irrigation fallback record.
pub fn reference_rice() -> AgronomicInput {
    AgronomicInput {
        soil: SoilMeasurements {
            ph: 6.5,
            nitrogen: 20.0,
            phosphorus: 15.0,
            potassium: 25.0,
            organic_matter: 3.0,
        },
        weather: WeatherMeasurements {
            temperature: 25.0,
            rainfall: 100.0,
            humidity: 65.0,
            sunlight_hours: 8.0,
        },
        crop_type: "rice".to_string(),
    }
}

/// Cotton on hot, dry, alkaline ground.
///
/// Trips several limiting factors (rainfall < 50 mm, pH > 8.0, T > 35 °C)
/// and a high climate-risk score.
pub fn arid_cotton() -> AgronomicInput {
    AgronomicInput {
        soil: SoilMeasurements {
            ph: 8.3,
            nitrogen: 12.0,
            phosphorus: 8.0,
            potassium: 18.0,
            organic_matter: 1.2,
        },
        weather: WeatherMeasurements {
            temperature: 38.0,
            rainfall: 30.0,
            humidity: 25.0,
            sunlight_hours: 11.0,
        },
        crop_type: "cotton".to_string(),
    }
}

/// Potato in a cool, wet, acidic highland plot.
pub fn highland_potato() -> AgronomicInput {
    AgronomicInput {
        soil: SoilMeasurements {
            ph: 5.2,
            nitrogen: 30.0,
            phosphorus: 22.0,
            potassium: 40.0,
            organic_matter: 4.5,
        },
        weather: WeatherMeasurements {
            temperature: 12.0,
            rainfall: 220.0,
            humidity: 85.0,
            sunlight_hours: 5.0,
        },
        crop_type: "potato".to_string(),
    }
}

/// Get all reference scenarios
pub fn reference_scenarios() -> Vec<AgronomicInput> {
    vec![reference_rice(), arid_cotton(), highland_potato()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names_match_upstream() {
        let json = serde_json::to_value(reference_rice()).unwrap();
        assert!(json["soil"]["organicMatter"].is_number());
        assert!(json["weather"]["sunlightHours"].is_number());
        assert_eq!(json["cropType"], "rice");
    }

    #[test]
    fn test_upstream_payload_roundtrip() {
        let payload = r#"{
            "soil": {"ph": 6.5, "nitrogen": 20, "phosphorus": 15,
                     "potassium": 25, "organicMatter": 3.0},
            "weather": {"temperature": 25, "rainfall": 100,
                        "humidity": 65, "sunlightHours": 8},
            "cropType": "rice"
        }"#;

        let input: AgronomicInput = serde_json::from_str(payload).unwrap();
        assert_eq!(input.crop_type, "rice");
        assert_eq!(input.soil.organic_matter, 3.0);
        assert_eq!(input.weather.sunlight_hours, 8.0);
    }
}
