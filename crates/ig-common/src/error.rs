//! Error types for InsightGen.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - A fatal/non-fatal split that drives partial-result policy
//!
//! # Partial Results
//!
//! Only configuration errors and internal consistency errors abort an
//! analytical pass. Insufficient data is local: the affected metric or
//! group is omitted and the rest of the bundle still assembles.
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 11,
//!   "category": "config",
//!   "message": "invalid value for forecast.confidence_level: must be in (0, 1), got 1.2",
//!   "fatal": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for InsightGen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration and reference-table errors.
    Config,
    /// Input data too thin for an analysis.
    Data,
    /// Internal wiring defects.
    Consistency,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Consistency => write!(f, "consistency"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for InsightGen.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("invalid benchmark table: {0}")]
    InvalidBenchmarks(String),

    // Data errors (20-29)
    #[error("insufficient data for {analysis} on {subject}: need {required}, have {available}")]
    InsufficientData {
        analysis: String,
        subject: String,
        required: usize,
        available: usize,
    },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("invalid record at row {row}: {field} is {value}")]
    InvalidRecord {
        row: usize,
        field: String,
        value: f64,
    },

    // Consistency errors (30-39)
    #[error("internal consistency violation: {0}")]
    Consistency(String),

    #[error("analysis task failed: {0}")]
    TaskFailed(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Data errors
    /// - 30-39: Consistency errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidValue { .. } => 11,
            Error::InvalidBenchmarks(_) => 12,
            Error::InsufficientData { .. } => 20,
            Error::EmptyDataset => 21,
            Error::InvalidRecord { .. } => 22,
            Error::Consistency(_) => 30,
            Error::TaskFailed(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidValue { .. } | Error::InvalidBenchmarks(_) => {
                ErrorCategory::Config
            }
            Error::InsufficientData { .. } | Error::EmptyDataset | Error::InvalidRecord { .. } => {
                ErrorCategory::Data
            }
            Error::Consistency(_) | Error::TaskFailed(_) => ErrorCategory::Consistency,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether this error aborts the whole analytical pass.
    ///
    /// Insufficient data only removes the affected metric or group. An empty
    /// or malformed dataset leaves nothing to analyse and is fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::InsufficientData { .. })
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidValue { .. } => "Invalid Configuration Value",
            Error::InvalidBenchmarks(_) => "Invalid Benchmark Table",
            Error::InsufficientData { .. } => "Insufficient Data",
            Error::EmptyDataset => "Empty Dataset",
            Error::InvalidRecord { .. } => "Invalid Record",
            Error::Consistency(_) => "Internal Consistency Error",
            Error::TaskFailed(_) => "Analysis Task Failed",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Shorthand for an [`Error::InsufficientData`].
    pub fn insufficient(
        analysis: impl Into<String>,
        subject: impl Into<String>,
        required: usize,
        available: usize,
    ) -> Self {
        Error::InsufficientData {
            analysis: analysis.into(),
            subject: subject.into(),
            required,
            available,
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error aborted the run.
    pub fatal: bool,

    /// Additional structured context (field names, counts).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = BTreeMap::new();

        match err {
            Error::InvalidValue { field, .. } => {
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::InvalidRecord { row, field, .. } => {
                context.insert("row".to_string(), serde_json::json!(row));
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::InsufficientData {
                analysis,
                subject,
                required,
                available,
            } => {
                context.insert("analysis".to_string(), serde_json::json!(analysis));
                context.insert("subject".to_string(), serde_json::json!(subject));
                context.insert("required".to_string(), serde_json::json!(required));
                context.insert("available".to_string(), serde_json::json!(available));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            fatal: err.is_fatal(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
