//! Analysis configuration types.
//!
//! Every section and field has a default, so `{}` is a valid configuration
//! file and partial files only override what they name.

use ig_common::{Dimension, Metric};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::validate::{ValidationError, ValidationResult};

/// Complete analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub anomaly: AnomalyConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub grouping: GroupingConfig,

    #[serde(default)]
    pub analyses: AnalysisToggles,

    /// Run the independent analysis branches on separate threads.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

/// Rolling z-score anomaly detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnomalyConfig {
    /// |z| at or above which a point is anomalous.
    pub z_threshold: f64,
    /// Maximum trailing observations in the baseline.
    pub window: usize,
    /// Prior observations required before a point is evaluated.
    pub warmup_periods: usize,
    /// Minimum swing (percent of baseline mean) for Warning or Critical.
    pub materiality_pct: f64,
    pub metrics: Vec<Metric>,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            z_threshold: 2.0,
            window: 14,
            warmup_periods: 7,
            materiality_pct: 15.0,
            metrics: vec![
                Metric::Conversions,
                Metric::Revenue,
                Metric::Clicks,
                Metric::Ctr,
                Metric::Cpc,
                Metric::Roas,
            ],
        }
    }
}

/// Weather correlation and segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WeatherConfig {
    pub strong_threshold: f64,
    pub moderate_threshold: f64,
    pub min_pairs: usize,
    pub performance_metrics: Vec<Metric>,
    pub weather_metrics: Vec<Metric>,
    /// Rainfall (mm) above which a day counts as rainy.
    pub rainy_day_mm: f64,
    /// Also correlate within each channel.
    pub per_channel: bool,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            strong_threshold: 0.6,
            moderate_threshold: 0.3,
            min_pairs: 3,
            performance_metrics: vec![
                Metric::Conversions,
                Metric::Revenue,
                Metric::Visits,
                Metric::Clicks,
            ],
            weather_metrics: vec![Metric::Temperature, Metric::Rainfall],
            rainy_day_mm: 1.0,
            per_channel: true,
        }
    }
}

/// Industry benchmark comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub industry: String,
    /// Half-width (percent) of the AtBenchmark band.
    pub at_band_pct: f64,
    /// Fall back to the `overall` channel when a channel entry is missing.
    pub channel_fallback: bool,
    pub metrics: Vec<Metric>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            industry: "general".to_string(),
            at_band_pct: 10.0,
            channel_fallback: false,
            metrics: Metric::RATIOS.to_vec(),
        }
    }
}

/// Next-period forecasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ForecastConfig {
    pub confidence_level: f64,
    pub min_history: usize,
    /// Trailing points used for the estimate.
    pub window: usize,
    pub growth_threshold: f64,
    pub decline_threshold: f64,
    pub metrics: Vec<Metric>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.70,
            min_history: 7,
            window: 14,
            growth_threshold: 1.03,
            decline_threshold: 0.97,
            metrics: vec![Metric::Conversions, Metric::Revenue, Metric::Roas],
        }
    }
}

/// Which groupings the metric calculator emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GroupingConfig {
    /// Period aggregates: one KPI record per group for each entry.
    pub breakdowns: Vec<Vec<Dimension>>,
    /// Dimensions whose groups also get daily series (overall always does).
    pub series: Vec<Dimension>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            breakdowns: vec![
                vec![Dimension::Channel],
                vec![Dimension::Campaign],
                vec![Dimension::Location],
                vec![Dimension::DayOfWeek],
            ],
            series: vec![Dimension::Channel],
        }
    }
}

/// Independently switchable analysis branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisToggles {
    pub weather: bool,
    pub anomalies: bool,
    pub benchmarks: bool,
    pub forecast: bool,
}

impl Default for AnalysisToggles {
    fn default() -> Self {
        Self {
            weather: true,
            anomalies: true,
            benchmarks: true,
            forecast: true,
        }
    }
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            anomaly: AnomalyConfig::default(),
            weather: WeatherConfig::default(),
            benchmark: BenchmarkConfig::default(),
            forecast: ForecastConfig::default(),
            grouping: GroupingConfig::default(),
            analyses: AnalysisToggles::default(),
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn parse_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// SHA-256 of the canonical JSON encoding of every setting that can
    /// change a result.
    ///
    /// `parallel` only picks the execution strategy and is left out, so a
    /// threaded and a sequential run fingerprint identically. Keys are
    /// sorted by `serde_json::Map`.
    pub fn fingerprint(&self) -> String {
        let canonical = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut fields)) => {
                fields.remove("parallel");
                serde_json::to_vec(&fields).unwrap_or_default()
            }
            _ => Vec::new(),
        };
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hex::encode(hasher.finalize())
    }

    /// JSON Schema for configuration files.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(AnalysisConfig)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_all_defaults() {
        let config = AnalysisConfig::parse_json("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.anomaly.z_threshold, 2.0);
        assert_eq!(config.anomaly.window, 14);
        assert_eq!(config.forecast.confidence_level, 0.70);
        assert_eq!(config.anomaly.materiality_pct, 15.0);
        assert!(config.analyses.weather && config.analyses.forecast);
    }

    #[test]
    fn test_partial_section_keeps_other_fields() {
        let json = r#"{"anomaly": {"z_threshold": 3.0}, "analyses": {"forecast": false}}"#;
        let config = AnalysisConfig::parse_json(json).unwrap();
        assert_eq!(config.anomaly.z_threshold, 3.0);
        assert_eq!(config.anomaly.window, 14);
        assert!(!config.analyses.forecast);
        assert!(config.analyses.anomalies);
    }

    #[test]
    fn test_dimensions_and_metrics_parse_by_name() {
        let json = r#"{
            "grouping": {"breakdowns": [["channel", "location"]], "series": []},
            "forecast": {"metrics": ["cpa"]}
        }"#;
        let config = AnalysisConfig::parse_json(json).unwrap();
        assert_eq!(
            config.grouping.breakdowns,
            vec![vec![Dimension::Channel, Dimension::Location]]
        );
        assert!(config.grouping.series.is_empty());
        assert_eq!(config.forecast.metrics, vec![Metric::Cpa]);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = AnalysisConfig::default();
        let b = AnalysisConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let mut c = AnalysisConfig::default();
        c.anomaly.z_threshold = 2.5;
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_execution_strategy() {
        let threaded = AnalysisConfig::default();
        let sequential = AnalysisConfig {
            parallel: false,
            ..AnalysisConfig::default()
        };
        assert_eq!(threaded.fingerprint(), sequential.fingerprint());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = AnalysisConfig::parse_json("{not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_json_schema_names_sections() {
        let schema = AnalysisConfig::json_schema().to_string();
        assert!(schema.contains("anomaly"));
        assert!(schema.contains("confidence_level"));
    }
}
