//! Configuration validation errors and semantic validation.

use ig_common::Dimension;
use thiserror::Error;

use crate::analysis::AnalysisConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("Invalid benchmark table: {0}")]
    BenchmarkError(String),
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
            ValidationError::BenchmarkError(_) => 67,
        }
    }
}

impl From<ValidationError> for ig_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidValue { field, message } => {
                ig_common::Error::InvalidValue { field, message }
            }
            ValidationError::BenchmarkError(msg) => ig_common::Error::InvalidBenchmarks(msg),
            other => ig_common::Error::Config(other.to_string()),
        }
    }
}

fn invalid(field: &str, message: String) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message,
    }
}

/// Validate an analysis configuration semantically.
///
/// Runs before any computation; the first violation is returned.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_anomaly(config)?;
    validate_weather(config)?;
    validate_benchmark(config)?;
    validate_forecast(config)?;
    validate_grouping(config)?;

    Ok(())
}

fn validate_anomaly(config: &AnalysisConfig) -> ValidationResult<()> {
    let a = &config.anomaly;

    if !a.z_threshold.is_finite() || a.z_threshold <= 0.0 {
        return Err(invalid(
            "anomaly.z_threshold",
            format!("Must be positive and finite, got {}", a.z_threshold),
        ));
    }

    if a.window < 2 {
        return Err(invalid(
            "anomaly.window",
            format!("Must be at least 2, got {}", a.window),
        ));
    }

    if a.warmup_periods < 2 || a.warmup_periods > a.window {
        return Err(invalid(
            "anomaly.warmup_periods",
            format!(
                "Must be in [2, window={}], got {}",
                a.window, a.warmup_periods
            ),
        ));
    }

    if !a.materiality_pct.is_finite() || a.materiality_pct < 0.0 {
        return Err(invalid(
            "anomaly.materiality_pct",
            format!("Must be non-negative, got {}", a.materiality_pct),
        ));
    }

    if let Some(m) = a.metrics.iter().find(|m| m.is_weather()) {
        return Err(invalid(
            "anomaly.metrics",
            format!("Weather metric {} cannot be monitored for anomalies", m),
        ));
    }

    Ok(())
}

fn validate_weather(config: &AnalysisConfig) -> ValidationResult<()> {
    let w = &config.weather;

    for (field, value) in [
        ("weather.strong_threshold", w.strong_threshold),
        ("weather.moderate_threshold", w.moderate_threshold),
    ] {
        if !(value > 0.0 && value <= 1.0) {
            return Err(invalid(field, format!("Must be in (0, 1], got {}", value)));
        }
    }

    if w.moderate_threshold >= w.strong_threshold {
        return Err(ValidationError::SemanticError(format!(
            "weather.moderate_threshold ({}) must be below weather.strong_threshold ({})",
            w.moderate_threshold, w.strong_threshold
        )));
    }

    if w.min_pairs < ig_math::MIN_PAIRS {
        return Err(invalid(
            "weather.min_pairs",
            format!("Must be at least {}, got {}", ig_math::MIN_PAIRS, w.min_pairs),
        ));
    }

    if !w.rainy_day_mm.is_finite() || w.rainy_day_mm < 0.0 {
        return Err(invalid(
            "weather.rainy_day_mm",
            format!("Must be non-negative, got {}", w.rainy_day_mm),
        ));
    }

    if let Some(m) = w.weather_metrics.iter().find(|m| !m.is_weather()) {
        return Err(invalid(
            "weather.weather_metrics",
            format!("{} is not a weather metric", m),
        ));
    }

    if let Some(m) = w.performance_metrics.iter().find(|m| m.is_weather()) {
        return Err(invalid(
            "weather.performance_metrics",
            format!("{} is a weather metric", m),
        ));
    }

    Ok(())
}

fn validate_benchmark(config: &AnalysisConfig) -> ValidationResult<()> {
    let b = &config.benchmark;

    if b.industry.trim().is_empty() {
        return Err(invalid("benchmark.industry", "Must not be empty".to_string()));
    }

    if !b.at_band_pct.is_finite() || b.at_band_pct < 0.0 {
        return Err(invalid(
            "benchmark.at_band_pct",
            format!("Must be non-negative, got {}", b.at_band_pct),
        ));
    }

    if let Some(m) = b.metrics.iter().find(|m| !m.is_ratio()) {
        return Err(invalid(
            "benchmark.metrics",
            format!("Only ratio KPIs have benchmarks, got {}", m),
        ));
    }

    Ok(())
}

fn validate_forecast(config: &AnalysisConfig) -> ValidationResult<()> {
    let f = &config.forecast;

    if !(f.confidence_level > 0.0 && f.confidence_level < 1.0) {
        return Err(invalid(
            "forecast.confidence_level",
            format!("Must be in (0, 1), got {}", f.confidence_level),
        ));
    }

    if f.min_history < 3 {
        return Err(invalid(
            "forecast.min_history",
            format!("Must be at least 3, got {}", f.min_history),
        ));
    }

    if f.window < f.min_history {
        return Err(invalid(
            "forecast.window",
            format!(
                "Must be at least min_history={}, got {}",
                f.min_history, f.window
            ),
        ));
    }

    if !f.growth_threshold.is_finite() || f.growth_threshold <= 1.0 {
        return Err(invalid(
            "forecast.growth_threshold",
            format!("Must be above 1.0, got {}", f.growth_threshold),
        ));
    }

    if !(f.decline_threshold > 0.0 && f.decline_threshold < 1.0) {
        return Err(invalid(
            "forecast.decline_threshold",
            format!("Must be in (0, 1), got {}", f.decline_threshold),
        ));
    }

    if let Some(m) = f.metrics.iter().find(|m| m.is_weather()) {
        return Err(invalid(
            "forecast.metrics",
            format!("Weather metric {} cannot be forecast", m),
        ));
    }

    Ok(())
}

fn validate_grouping(config: &AnalysisConfig) -> ValidationResult<()> {
    for (idx, breakdown) in config.grouping.breakdowns.iter().enumerate() {
        if breakdown.is_empty() {
            return Err(invalid(
                &format!("grouping.breakdowns[{}]", idx),
                "Must name at least one dimension".to_string(),
            ));
        }
        if has_duplicate(breakdown) {
            return Err(invalid(
                &format!("grouping.breakdowns[{}]", idx),
                "Dimensions must be distinct".to_string(),
            ));
        }
    }

    if has_duplicate(&config.grouping.series) {
        return Err(invalid(
            "grouping.series",
            "Dimensions must be distinct".to_string(),
        ));
    }

    Ok(())
}

fn has_duplicate(dims: &[Dimension]) -> bool {
    dims.iter()
        .enumerate()
        .any(|(i, d)| dims[..i].contains(d))
}
