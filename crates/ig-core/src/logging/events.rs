//! Stages and stable event names for structured logging.
//!
//! Every engine event carries the run id and the stage that emitted it.

use serde::{Deserialize, Serialize};

/// Processing stages of one analytical pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Configuration validation and input checks.
    Init,
    /// KPI aggregation and daily series.
    Metrics,
    /// Weather correlation and segmentation.
    Weather,
    /// Rolling z-score anomaly detection.
    Anomalies,
    /// Industry benchmark comparison.
    Benchmarks,
    /// Next-period forecasting.
    Forecast,
    /// Bundle assembly and consistency check.
    Assemble,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Metrics => "metrics",
            Stage::Weather => "weather",
            Stage::Anomalies => "anomalies",
            Stage::Benchmarks => "benchmarks",
            Stage::Forecast => "forecast",
            Stage::Assemble => "assemble",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";
    pub const RUN_FAILED: &str = "run.failed";

    // Config/init events
    pub const CONFIG_VALIDATED: &str = "config.validated";
    pub const CONFIG_ERROR: &str = "config.error";

    // Metrics stage
    pub const METRICS_FINISHED: &str = "metrics.finished";

    // Analysis branches
    pub const BRANCH_SKIPPED: &str = "branch.skipped";
    pub const WEATHER_FINISHED: &str = "weather.finished";
    pub const CORRELATION_UNDEFINED: &str = "weather.correlation_undefined";
    pub const ANOMALY_DETECTED: &str = "anomaly.detected";
    pub const ANOMALIES_FINISHED: &str = "anomalies.finished";
    pub const BENCHMARK_MISSING: &str = "benchmark.missing";
    pub const BENCHMARKS_FINISHED: &str = "benchmarks.finished";
    pub const FORECAST_INSUFFICIENT: &str = "forecast.insufficient_history";
    pub const FORECAST_FINISHED: &str = "forecast.finished";

    // Assembly
    pub const BUNDLE_ASSEMBLED: &str = "bundle.assembled";

    // Error events
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Correlation context shared by every event of one run.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Unique ID for this run. Never written into the bundle.
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }

    /// Context with a freshly generated run id.
    pub fn generate() -> Self {
        Self::new(super::generate_run_id())
    }
}
