//! Industry benchmark reference table.
//!
//! The table maps (industry, channel, metric) to a reference value. It is
//! loaded once, never mutated afterwards, and shared read-only across every
//! comparator invocation.
//!
//! Two JSON layouts are accepted:
//!
//! ```json
//! { "industries": { "retail": { "email": { "ctr": 0.035, "cpa": 38.0 } } } }
//! ```
//!
//! and the older flat per-channel layout, where CTR and conversion rate are
//! given in percent:
//!
//! ```json
//! { "email": { "avg_ctr": 3.5, "avg_cpc": 1.2, "avg_conversion_rate": 2.1 } }
//! ```

use ig_common::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::validate::{ValidationError, ValidationResult};

/// Channel name used for whole-account reference values.
pub const OVERALL_CHANNEL: &str = "overall";

type ChannelTable = BTreeMap<String, BTreeMap<Metric, f64>>;

/// Read-only benchmark lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTable {
    industries: BTreeMap<String, ChannelTable>,
}

#[derive(Debug, Deserialize)]
struct LegacyEntry {
    avg_ctr: Option<f64>,
    avg_cpc: Option<f64>,
    avg_conversion_rate: Option<f64>,
    avg_cpa: Option<f64>,
    avg_roas: Option<f64>,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl BenchmarkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one reference value.
    pub fn insert(&mut self, industry: &str, channel: &str, metric: Metric, value: f64) {
        self.industries
            .entry(normalize(industry))
            .or_default()
            .entry(normalize(channel))
            .or_default()
            .insert(metric, value);
    }

    /// Reference value for a (metric, channel, industry) triple.
    ///
    /// Channel and industry names match case-insensitively.
    pub fn get(&self, metric: Metric, channel: &str, industry: &str) -> Option<f64> {
        self.industries
            .get(&normalize(industry))?
            .get(&normalize(channel))?
            .get(&metric)
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.industries.values().all(|c| c.values().all(BTreeMap::is_empty))
    }

    pub fn industries(&self) -> impl Iterator<Item = &str> {
        self.industries.keys().map(String::as_str)
    }

    /// Load a table from a JSON file, detecting the layout.
    pub fn from_file(path: &std::path::Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse either layout. A top-level `industries` key selects the
    /// nested layout; anything else is read as the legacy layout under the
    /// `general` industry.
    pub fn parse_json(json: &str) -> ValidationResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))?;

        if value.get("industries").is_some() {
            let table: BenchmarkTable = serde_json::from_value(value).map_err(|e| {
                ValidationError::BenchmarkError(format!("Unreadable table: {}", e))
            })?;
            let table = table.normalized();
            table.check_values()?;
            Ok(table)
        } else {
            Self::from_legacy_value(value, "general")
        }
    }

    /// Parse the legacy flat layout, filing every entry under `industry`.
    pub fn parse_legacy(json: &str, industry: &str) -> ValidationResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))?;
        Self::from_legacy_value(value, industry)
    }

    fn from_legacy_value(value: serde_json::Value, industry: &str) -> ValidationResult<Self> {
        let entries: BTreeMap<String, LegacyEntry> = serde_json::from_value(value)
            .map_err(|e| ValidationError::BenchmarkError(format!("Unreadable table: {}", e)))?;

        let mut table = Self::new();
        for (channel, entry) in entries {
            let values = [
                (Metric::Ctr, entry.avg_ctr.map(|v| v / 100.0)),
                (Metric::Cpc, entry.avg_cpc),
                (Metric::Cvr, entry.avg_conversion_rate.map(|v| v / 100.0)),
                (Metric::Cpa, entry.avg_cpa),
                (Metric::Roas, entry.avg_roas),
            ];
            for (metric, v) in values {
                if let Some(v) = v {
                    table.insert(industry, &channel, metric, v);
                }
            }
        }
        table.check_values()?;
        Ok(table)
    }

    fn normalized(self) -> Self {
        let mut out = Self::new();
        for (industry, channels) in self.industries {
            for (channel, metrics) in channels {
                for (metric, v) in metrics {
                    out.insert(&industry, &channel, metric, v);
                }
            }
        }
        out
    }

    /// Every value must be finite and strictly positive so relative gaps
    /// are defined.
    fn check_values(&self) -> ValidationResult<()> {
        for (industry, channels) in &self.industries {
            for (channel, metrics) in channels {
                for (metric, v) in metrics {
                    if !v.is_finite() || *v <= 0.0 {
                        return Err(ValidationError::InvalidValue {
                            field: format!("industries.{}.{}.{}", industry, channel, metric),
                            message: format!("Must be positive and finite, got {}", v),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
