//! InsightGen configuration loading and validation.
//!
//! This crate provides:
//! - Typed analysis configuration with every threshold lifted out of code
//! - Named presets
//! - Semantic validation
//! - The read-only industry benchmark table

use std::path::Path;

pub mod analysis;
pub mod benchmarks;
pub mod preset;
pub mod validate;

pub use analysis::{
    AnalysisConfig, AnalysisToggles, AnomalyConfig, BenchmarkConfig, ForecastConfig,
    GroupingConfig, WeatherConfig,
};
pub use benchmarks::BenchmarkTable;
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Read and validate the configuration at `path`, or the built-in
/// defaults when the caller has none.
pub fn load_config(path: Option<&Path>) -> ValidationResult<AnalysisConfig> {
    let config = match path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    validate_config(&config)?;
    Ok(config)
}
