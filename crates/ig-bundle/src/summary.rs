//! Anomaly roll-up derived from a bundle.

use ig_common::{Anomaly, Severity};
use serde::{Deserialize, Serialize};

/// Severity counts plus the most extreme anomalies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalySummary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    /// Largest |z| first; ties keep detection order.
    pub top: Vec<Anomaly>,
}

impl AnomalySummary {
    pub fn from_anomalies(anomalies: &[Anomaly], top_n: usize) -> Self {
        let count = |s: Severity| anomalies.iter().filter(|a| a.severity == s).count();

        let mut top: Vec<Anomaly> = anomalies.to_vec();
        top.sort_by(|a, b| b.deviation.abs().total_cmp(&a.deviation.abs()));
        top.truncate(top_n);

        Self {
            total: anomalies.len(),
            critical: count(Severity::Critical),
            warning: count(Severity::Warning),
            info: count(Severity::Info),
            top,
        }
    }
}
