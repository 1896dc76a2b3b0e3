//! Error types for bundle operations.

use thiserror::Error;

/// Errors that can occur while assembling or reading a bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    /// A non-KPI record names a group with no KPI record
    #[error("{component} references group '{key}' which has no KPI record")]
    UnknownGroupKey { component: String, key: String },

    /// The KPI set lists the same group twice
    #[error("duplicate KPI record for group '{0}'")]
    DuplicateKpi(String),

    /// The overall KPI record is missing or not first
    #[error("overall KPI record must be present and first")]
    MissingOverall,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema version mismatch
    #[error("schema version mismatch: expected {expected}, got {actual}")]
    SchemaMismatch { expected: String, actual: String },
}

/// Result type alias for bundle operations.
pub type Result<T> = std::result::Result<T, BundleError>;

impl From<BundleError> for ig_common::Error {
    fn from(err: BundleError) -> Self {
        match err {
            BundleError::Json(e) => ig_common::Error::Json(e),
            other => ig_common::Error::Consistency(other.to_string()),
        }
    }
}
