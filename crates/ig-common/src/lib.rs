//! InsightGen common types and errors.
//!
//! This crate provides the value types shared by every stage of the
//! analytics engine:
//! - Merged input rows and grouping keys
//! - Metric identities and their polarity
//! - KPI records with explicit undefined ratios
//! - Typed insight records (correlations, anomalies, benchmarks, forecasts)
//! - The engine-wide error taxonomy

pub mod error;
pub mod group;
pub mod insight;
pub mod kpi;
pub mod metric;
pub mod record;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use group::{Dimension, GroupKey, KeyPart};
pub use insight::{
    Anomaly, BenchmarkResult, BenchmarkStatus, CorrelationResult, CorrelationStrength, Direction,
    Forecast, ForecastOutcome, PercentileBucket, RainImpact, Severity, TemperatureBand,
    TemperatureBandSummary, TrendDirection, WeatherSegments,
};
pub use kpi::{KpiRecord, Period, Ratio, Totals};
pub use metric::{Metric, Polarity};
pub use record::MergedRecord;

/// Schema version for serialized engine outputs.
pub const SCHEMA_VERSION: &str = "1.0.0";
