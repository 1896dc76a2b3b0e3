//! Typed insight records produced by the analytical branches.
//!
//! Every record names the [`GroupKey`] it was computed for so the bundle
//! assembler can check it against the KPI set.

use crate::error::Error;
use crate::group::GroupKey;
use crate::metric::Metric;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Correlation
// ============================================================================

/// Qualitative label for |r|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Weak,
    Moderate,
    Strong,
}

impl CorrelationStrength {
    /// Label `r` against the strong/moderate cut-offs (inclusive lower bounds).
    pub fn classify(r: f64, strong: f64, moderate: f64) -> Self {
        let a = r.abs();
        if a >= strong {
            CorrelationStrength::Strong
        } else if a >= moderate {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
        }
    }
}

/// Pearson association between a performance metric and a weather metric.
///
/// `coefficient` is `None` when the pair is not computable (fewer than the
/// minimum aligned pairs, or a constant side). That is distinct from a
/// computed coefficient near zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CorrelationResult {
    pub key: GroupKey,
    pub performance: Metric,
    pub weather: Metric,
    pub coefficient: Option<f64>,
    pub p_value: Option<f64>,
    pub sample_size: usize,
    pub strength: Option<CorrelationStrength>,
}

impl CorrelationResult {
    /// Strong and moderate correlations are worth narrating.
    pub fn is_notable(&self) -> bool {
        matches!(
            self.strength,
            Some(CorrelationStrength::Strong | CorrelationStrength::Moderate)
        )
    }

    /// The non-fatal error behind a missing coefficient, when the cause was
    /// too few aligned pairs. A constant series is not a shortfall.
    pub fn shortfall(&self, min_pairs: usize) -> Option<Error> {
        (self.coefficient.is_none() && self.sample_size < min_pairs).then(|| {
            Error::insufficient(
                "correlation",
                format!("{} vs {} for {}", self.performance, self.weather, self.key),
                min_pairs,
                self.sample_size,
            )
        })
    }
}

/// Performance on rainy versus dry days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RainImpact {
    pub key: GroupKey,
    pub metric: Metric,
    pub rainy_days: usize,
    pub dry_days: usize,
    pub rainy_mean: f64,
    pub dry_mean: f64,
    /// Rainy mean relative to dry mean; `None` when the dry mean is zero.
    pub pct_change: Option<f64>,
}

/// Coarse temperature bands in degrees Celsius.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    Cold,
    Cool,
    Mild,
    Warm,
    Hot,
}

impl TemperatureBand {
    pub const ALL: &'static [TemperatureBand] = &[
        TemperatureBand::Cold,
        TemperatureBand::Cool,
        TemperatureBand::Mild,
        TemperatureBand::Warm,
        TemperatureBand::Hot,
    ];

    pub fn classify(celsius: f64) -> Self {
        if celsius < 10.0 {
            TemperatureBand::Cold
        } else if celsius < 15.0 {
            TemperatureBand::Cool
        } else if celsius < 20.0 {
            TemperatureBand::Mild
        } else if celsius < 25.0 {
            TemperatureBand::Warm
        } else {
            TemperatureBand::Hot
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemperatureBand::Cold => "cold (<10°C)",
            TemperatureBand::Cool => "cool (10-15°C)",
            TemperatureBand::Mild => "mild (15-20°C)",
            TemperatureBand::Warm => "warm (20-25°C)",
            TemperatureBand::Hot => "hot (>=25°C)",
        }
    }
}

/// Mean performance over the days falling in one temperature band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemperatureBandSummary {
    pub key: GroupKey,
    pub band: TemperatureBand,
    pub days: usize,
    pub means: BTreeMap<Metric, f64>,
}

/// Everything the weather branch produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherSegments {
    pub correlations: Vec<CorrelationResult>,
    pub rain_impact: Vec<RainImpact>,
    pub temperature_bands: Vec<TemperatureBandSummary>,
}

// ============================================================================
// Anomalies
// ============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Spike,
    Drop,
}

/// A point that deviates from its trailing baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Anomaly {
    pub metric: Metric,
    pub key: GroupKey,
    pub date: NaiveDate,
    pub observed: f64,
    /// Trailing baseline mean.
    pub expected: f64,
    pub std_dev: f64,
    /// z-score against the baseline.
    pub deviation: f64,
    /// Swing versus the baseline mean; `None` when that mean is zero.
    pub pct_change: Option<f64>,
    pub severity: Severity,
    pub direction: Direction,
}

// ============================================================================
// Benchmarks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BenchmarkStatus {
    AboveBenchmark,
    AtBenchmark,
    BelowBenchmark,
}

/// Linear approximation of standing from the favorable gap. Not a true
/// percentile: no benchmark distribution exists to rank against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PercentileBucket {
    Top5,
    Top10,
    Top25,
    Top50,
    Bottom50,
    Bottom25,
    Bottom10,
    Bottom5,
}

impl PercentileBucket {
    /// Bucket the polarity-adjusted gap, not the raw relative gap: a cost
    /// metric 25% under its benchmark lands in `Top10`, not `Bottom10`.
    pub fn from_favorable_gap(gap_pct: f64) -> Self {
        if gap_pct > 30.0 {
            PercentileBucket::Top5
        } else if gap_pct > 20.0 {
            PercentileBucket::Top10
        } else if gap_pct > 10.0 {
            PercentileBucket::Top25
        } else if gap_pct > 0.0 {
            PercentileBucket::Top50
        } else if gap_pct > -10.0 {
            PercentileBucket::Bottom50
        } else if gap_pct > -20.0 {
            PercentileBucket::Bottom25
        } else if gap_pct > -30.0 {
            PercentileBucket::Bottom10
        } else {
            PercentileBucket::Bottom5
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PercentileBucket::Top5 => "top 5%",
            PercentileBucket::Top10 => "top 10%",
            PercentileBucket::Top25 => "top 25%",
            PercentileBucket::Top50 => "top 50%",
            PercentileBucket::Bottom50 => "bottom 50%",
            PercentileBucket::Bottom25 => "bottom 25%",
            PercentileBucket::Bottom10 => "bottom 10%",
            PercentileBucket::Bottom5 => "bottom 5%",
        }
    }
}

/// Client KPI against the industry reference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BenchmarkResult {
    pub key: GroupKey,
    /// Benchmark channel the value was looked up under.
    pub channel: String,
    pub metric: Metric,
    pub client_value: f64,
    pub industry_value: f64,
    /// `(client - industry) / industry * 100`, signed.
    pub relative_gap_pct: f64,
    /// Gap with polarity applied: positive is always better.
    pub favorable_gap_pct: f64,
    pub status: BenchmarkStatus,
    pub percentile_bucket: PercentileBucket,
}

// ============================================================================
// Forecasts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Growth,
    Decline,
    Flat,
}

/// Next-period projection for one metric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Forecast {
    pub metric: Metric,
    pub key: GroupKey,
    pub target_date: NaiveDate,
    pub point_estimate: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence_level: f64,
    pub trend: TrendDirection,
    pub trend_factor: f64,
    /// Points in the trailing window the forecast was fitted on.
    pub history_len: usize,
}

/// Result of forecasting one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Forecast(Forecast),
    InsufficientHistory {
        metric: Metric,
        key: GroupKey,
        available: usize,
        required: usize,
    },
}

impl ForecastOutcome {
    pub fn key(&self) -> &GroupKey {
        match self {
            ForecastOutcome::Forecast(f) => &f.key,
            ForecastOutcome::InsufficientHistory { key, .. } => key,
        }
    }

    pub fn metric(&self) -> Metric {
        match self {
            ForecastOutcome::Forecast(f) => f.metric,
            ForecastOutcome::InsufficientHistory { metric, .. } => *metric,
        }
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            ForecastOutcome::Forecast(f) => Some(f),
            ForecastOutcome::InsufficientHistory { .. } => None,
        }
    }

    /// The non-fatal error an omitted forecast stands for.
    pub fn shortfall(&self) -> Option<Error> {
        match self {
            ForecastOutcome::Forecast(_) => None,
            ForecastOutcome::InsufficientHistory {
                metric,
                key,
                available,
                required,
            } => Some(Error::insufficient(
                "forecast",
                format!("{metric} for {key}"),
                *required,
                *available,
            )),
        }
    }
}
