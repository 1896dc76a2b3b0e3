//! The merged input row.

use crate::metric::Metric;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One joined row of performance, foot-traffic and weather data.
///
/// Dimension keys are optional; missing counts deserialize as zero and
/// missing weather readings stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MergedRecord {
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,

    #[serde(default)]
    pub impressions: f64,
    #[serde(default)]
    pub clicks: f64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub conversions: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub visits: f64,

    /// Degrees Celsius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<f64>,
}

impl MergedRecord {
    /// A row with every count zero and no dimension keys.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            campaign_id: None,
            channel: None,
            location: None,
            segment: None,
            impressions: 0.0,
            clicks: 0.0,
            spend: 0.0,
            conversions: 0.0,
            revenue: 0.0,
            visits: 0.0,
            temperature: None,
            rainfall: None,
        }
    }

    /// Raw value of a count or weather metric. Ratio metrics return `None`.
    pub fn raw(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Impressions => Some(self.impressions),
            Metric::Clicks => Some(self.clicks),
            Metric::Spend => Some(self.spend),
            Metric::Conversions => Some(self.conversions),
            Metric::Revenue => Some(self.revenue),
            Metric::Visits => Some(self.visits),
            Metric::Temperature => self.temperature,
            Metric::Rainfall => self.rainfall,
            Metric::Ctr | Metric::Cpc | Metric::Cvr | Metric::Cpa | Metric::Roas => None,
        }
    }

    /// Fields violating the row invariants: non-finite values or negative
    /// counts (temperature may be negative).
    pub fn invalid_fields(&self) -> Vec<Metric> {
        Metric::ALL
            .iter()
            .copied()
            .filter(|m| !m.is_ratio())
            .filter(|m| match self.raw(*m) {
                Some(v) => !v.is_finite() || (m.is_non_negative() && v < 0.0),
                None => false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_counts_default_to_zero() {
        let json = r#"{"date":"2024-03-01","channel":"email","clicks":12}"#;
        let row: MergedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(row.clicks, 12.0);
        assert_eq!(row.impressions, 0.0);
        assert_eq!(row.rainfall, None);
        assert_eq!(row.channel.as_deref(), Some("email"));
    }

    #[test]
    fn raw_skips_ratio_metrics() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let row = MergedRecord {
            spend: 40.0,
            ..MergedRecord::empty(date)
        };
        assert_eq!(row.raw(Metric::Spend), Some(40.0));
        assert_eq!(row.raw(Metric::Roas), None);
        assert_eq!(row.raw(Metric::Temperature), None);
    }

    #[test]
    fn negative_temperature_is_valid() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let row = MergedRecord {
            temperature: Some(-4.0),
            clicks: -1.0,
            ..MergedRecord::empty(date)
        };
        assert_eq!(row.invalid_fields(), vec![Metric::Clicks]);
    }
}
