//! Metric identifiers and their polarity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named numeric quantity: either a raw count from a merged record or a
/// ratio KPI derived from two counts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Impressions,
    Clicks,
    Spend,
    Conversions,
    Revenue,
    Visits,
    Temperature,
    Rainfall,
    /// clicks / impressions, as a fraction.
    Ctr,
    /// spend / clicks.
    Cpc,
    /// conversions / clicks, as a fraction.
    Cvr,
    /// spend / conversions.
    Cpa,
    /// revenue / spend.
    Roas,
}

/// Which direction of change counts as an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
    Neutral,
}

impl Polarity {
    /// Sign that turns a raw gap into a favorable gap.
    pub fn sign(self) -> f64 {
        match self {
            Polarity::LowerIsBetter => -1.0,
            Polarity::HigherIsBetter | Polarity::Neutral => 1.0,
        }
    }
}

impl Metric {
    pub const ALL: &'static [Metric] = &[
        Metric::Impressions,
        Metric::Clicks,
        Metric::Spend,
        Metric::Conversions,
        Metric::Revenue,
        Metric::Visits,
        Metric::Temperature,
        Metric::Rainfall,
        Metric::Ctr,
        Metric::Cpc,
        Metric::Cvr,
        Metric::Cpa,
        Metric::Roas,
    ];

    /// The five ratio KPIs, in reporting order.
    pub const RATIOS: &'static [Metric] = &[
        Metric::Ctr,
        Metric::Cpc,
        Metric::Cvr,
        Metric::Cpa,
        Metric::Roas,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Impressions => "impressions",
            Metric::Clicks => "clicks",
            Metric::Spend => "spend",
            Metric::Conversions => "conversions",
            Metric::Revenue => "revenue",
            Metric::Visits => "visits",
            Metric::Temperature => "temperature",
            Metric::Rainfall => "rainfall",
            Metric::Ctr => "ctr",
            Metric::Cpc => "cpc",
            Metric::Cvr => "cvr",
            Metric::Cpa => "cpa",
            Metric::Roas => "roas",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_ascii_lowercase();
        let needle = match needle.as_str() {
            "conversion_rate" => "cvr",
            "cost_per_click" => "cpc",
            "cost_per_acquisition" => "cpa",
            other => other,
        };
        Self::ALL.iter().copied().find(|m| m.as_str() == needle)
    }

    pub fn is_ratio(self) -> bool {
        Self::RATIOS.contains(&self)
    }

    /// True for the weather covariates.
    pub fn is_weather(self) -> bool {
        matches!(self, Metric::Temperature | Metric::Rainfall)
    }

    pub fn polarity(self) -> Polarity {
        match self {
            Metric::Cpc | Metric::Cpa | Metric::Spend => Polarity::LowerIsBetter,
            Metric::Temperature | Metric::Rainfall => Polarity::Neutral,
            _ => Polarity::HigherIsBetter,
        }
    }

    /// Whether valid values of this metric are never negative.
    pub fn is_non_negative(self) -> bool {
        self != Metric::Temperature
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::parse(s).ok_or_else(|| format!("unknown metric: {s}"))
    }
}
