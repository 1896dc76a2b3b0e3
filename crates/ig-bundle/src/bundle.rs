//! The immutable insight bundle.

use ig_common::{
    Anomaly, BenchmarkResult, CorrelationResult, ForecastOutcome, KpiRecord, Period,
    WeatherSegments,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{BundleError, Result};
use crate::summary::AnomalySummary;

/// Current bundle schema version.
pub const BUNDLE_SCHEMA_VERSION: &str = ig_common::SCHEMA_VERSION;

/// Everything one analytical pass produced.
///
/// Fields are private: a bundle is only created by [`crate::assemble`] and
/// only read afterwards. A disabled branch is `None`; an enabled branch
/// with no findings is `Some` of an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InsightBundle {
    pub(crate) schema_version: String,
    pub(crate) period: Period,
    pub(crate) row_count: usize,
    pub(crate) config_fingerprint: String,
    pub(crate) kpis: Vec<KpiRecord>,
    #[serde(default)]
    pub(crate) weather: Option<WeatherSegments>,
    #[serde(default)]
    pub(crate) anomalies: Option<Vec<Anomaly>>,
    #[serde(default)]
    pub(crate) benchmarks: Option<Vec<BenchmarkResult>>,
    #[serde(default)]
    pub(crate) forecasts: Option<Vec<ForecastOutcome>>,
}

impl InsightBundle {
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// First and last calendar day in the input.
    pub fn period(&self) -> Period {
        self.period
    }

    /// Input rows analysed.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Fingerprint of the configuration the bundle was produced with.
    pub fn config_fingerprint(&self) -> &str {
        &self.config_fingerprint
    }

    /// KPI records; the overall record is always first.
    pub fn kpis(&self) -> &[KpiRecord] {
        &self.kpis
    }

    pub fn overall(&self) -> Option<&KpiRecord> {
        self.kpis.first().filter(|k| k.key.is_overall())
    }

    pub fn weather(&self) -> Option<&WeatherSegments> {
        self.weather.as_ref()
    }

    pub fn correlations(&self) -> Option<&[CorrelationResult]> {
        self.weather.as_ref().map(|w| w.correlations.as_slice())
    }

    pub fn anomalies(&self) -> Option<&[Anomaly]> {
        self.anomalies.as_deref()
    }

    pub fn benchmarks(&self) -> Option<&[BenchmarkResult]> {
        self.benchmarks.as_deref()
    }

    pub fn forecasts(&self) -> Option<&[ForecastOutcome]> {
        self.forecasts.as_deref()
    }

    /// Severity counts and the `top_n` largest anomalies by |z|.
    ///
    /// `None` when anomaly detection was disabled.
    pub fn anomaly_summary(&self, top_n: usize) -> Option<AnomalySummary> {
        self.anomalies
            .as_deref()
            .map(|a| AnomalySummary::from_anomalies(a, top_n))
    }

    /// SHA-256 of the canonical JSON encoding.
    pub fn digest(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hex::encode(hasher.finalize())
    }

    /// Serialize to JSON with consistent formatting.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON, rejecting other schema versions.
    pub fn from_json(json: &str) -> Result<Self> {
        let bundle: InsightBundle = serde_json::from_str(json)?;
        if bundle.schema_version != BUNDLE_SCHEMA_VERSION {
            return Err(BundleError::SchemaMismatch {
                expected: BUNDLE_SCHEMA_VERSION.to_string(),
                actual: bundle.schema_version,
            });
        }
        Ok(bundle)
    }

    /// JSON Schema describing the serialized bundle.
    pub fn schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(InsightBundle)).unwrap_or_default()
    }
}
