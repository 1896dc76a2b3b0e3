//! Configuration presets for common reporting needs.
//!
//! Provides pre-built configurations for:
//! - Default: the documented thresholds
//! - Sensitive: lower thresholds, surfaces smaller movements
//! - Conservative: higher thresholds, only large and material movements

use crate::analysis::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    /// The documented default thresholds
    Default,
    /// Lower anomaly and correlation thresholds, tighter benchmark band
    Sensitive,
    /// Higher thresholds, wider benchmark band, wider forecast band
    Conservative,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[
        PresetName::Default,
        PresetName::Sensitive,
        PresetName::Conservative,
    ];

    /// Get preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Default => "default",
            PresetName::Sensitive => "sensitive",
            PresetName::Conservative => "conservative",
        }
    }

    /// Parse preset name from string.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "default" | "standard" => Some(PresetName::Default),
            "sensitive" | "aggressive" => Some(PresetName::Sensitive),
            "conservative" | "strict" => Some(PresetName::Conservative),
            _ => None,
        }
    }

    /// Get a description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Default => "Documented thresholds: z >= 2.0, 15% materiality, ±10% band",
            PresetName::Sensitive => {
                "Surfaces smaller movements: z >= 1.5, 10% materiality, ±5% band"
            }
            PresetName::Conservative => {
                "Only large, material movements: z >= 3.0, 25% materiality, ±15% band"
            }
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

/// Errors related to preset operations.
#[derive(Debug, Clone)]
pub enum PresetError {
    /// Unknown preset name.
    UnknownPreset(String),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::UnknownPreset(name) => {
                write!(
                    f,
                    "Unknown preset '{}'. Available: {}",
                    name,
                    PresetName::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PresetError {}

/// Get the configuration for a preset.
pub fn get_preset(name: PresetName) -> AnalysisConfig {
    match name {
        PresetName::Default => AnalysisConfig::default(),
        PresetName::Sensitive => sensitive_preset(),
        PresetName::Conservative => conservative_preset(),
    }
}

fn sensitive_preset() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.anomaly.z_threshold = 1.5;
    config.anomaly.materiality_pct = 10.0;
    config.weather.strong_threshold = 0.5;
    config.weather.moderate_threshold = 0.25;
    config.benchmark.at_band_pct = 5.0;
    config.forecast.growth_threshold = 1.02;
    config.forecast.decline_threshold = 0.98;
    config
}

fn conservative_preset() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.anomaly.z_threshold = 3.0;
    config.anomaly.materiality_pct = 25.0;
    config.weather.strong_threshold = 0.7;
    config.weather.moderate_threshold = 0.4;
    config.benchmark.at_band_pct = 15.0;
    config.forecast.confidence_level = 0.80;
    config.forecast.growth_threshold = 1.05;
    config.forecast.decline_threshold = 0.95;
    config
}

/// Information about a preset for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    pub description: String,
    pub z_threshold: f64,
    pub materiality_pct: f64,
    pub at_band_pct: f64,
    pub confidence_level: f64,
}

impl PresetInfo {
    /// Create info from a preset.
    pub fn from_preset(name: PresetName) -> Self {
        let config = get_preset(name);
        Self {
            name: name.as_str().to_string(),
            description: name.description().to_string(),
            z_threshold: config.anomaly.z_threshold,
            materiality_pct: config.anomaly.materiality_pct,
            at_band_pct: config.benchmark.at_band_pct,
            confidence_level: config.forecast.confidence_level,
        }
    }
}

/// List all available presets with summary information.
pub fn list_presets() -> Vec<PresetInfo> {
    PresetName::ALL
        .iter()
        .map(|&name| PresetInfo::from_preset(name))
        .collect()
}
