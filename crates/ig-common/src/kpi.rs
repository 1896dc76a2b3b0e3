//! KPI records: aggregated counts and the ratio metrics derived from them.

use crate::group::GroupKey;
use crate::metric::Metric;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A ratio that may be undefined.
///
/// A zero denominator yields `Undefined`, never zero or infinity. Consumers
/// must check the state before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Ratio {
    Defined(f64),
    Undefined,
}

impl Ratio {
    /// `numerator / denominator`, undefined when the denominator is zero or
    /// the quotient is not finite.
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Ratio::Undefined;
        }
        let q = numerator / denominator;
        if q.is_finite() {
            Ratio::Defined(q)
        } else {
            Ratio::Undefined
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Ratio::Defined(_))
    }
}

/// Inclusive calendar range covered by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Smallest period containing both `self` and `date`.
    pub fn extend(self, date: NaiveDate) -> Self {
        Self {
            start: self.start.min(date),
            end: self.end.max(date),
        }
    }

    /// Number of calendar days, inclusive.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Raw sums behind a KPI record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Totals {
    /// Input rows aggregated.
    pub rows: usize,
    /// Distinct calendar days among those rows.
    pub days: usize,
    pub impressions: f64,
    pub clicks: f64,
    pub spend: f64,
    pub conversions: f64,
    pub revenue: f64,
    pub visits: f64,
    /// Mean over rows that carried a reading.
    pub mean_temperature: Option<f64>,
    pub mean_rainfall: Option<f64>,
}

/// KPIs for one group over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KpiRecord {
    pub key: GroupKey,
    pub period: Period,
    pub totals: Totals,
    pub ctr: Ratio,
    pub cpc: Ratio,
    pub cvr: Ratio,
    pub cpa: Ratio,
    pub roas: Ratio,
    pub avg_daily_conversions: Ratio,
}

impl KpiRecord {
    /// Derive every ratio from the totals.
    pub fn from_totals(key: GroupKey, period: Period, totals: Totals) -> Self {
        Self {
            ctr: Ratio::of(totals.clicks, totals.impressions),
            cpc: Ratio::of(totals.spend, totals.clicks),
            cvr: Ratio::of(totals.conversions, totals.clicks),
            cpa: Ratio::of(totals.spend, totals.conversions),
            roas: Ratio::of(totals.revenue, totals.spend),
            avg_daily_conversions: Ratio::of(totals.conversions, totals.days as f64),
            key,
            period,
            totals,
        }
    }

    /// The ratio for a ratio metric; `None` for count metrics.
    pub fn ratio(&self, metric: Metric) -> Option<Ratio> {
        match metric {
            Metric::Ctr => Some(self.ctr),
            Metric::Cpc => Some(self.cpc),
            Metric::Cvr => Some(self.cvr),
            Metric::Cpa => Some(self.cpa),
            Metric::Roas => Some(self.roas),
            _ => None,
        }
    }

    /// Numeric value of any metric, `None` when undefined or absent.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        let t = &self.totals;
        match metric {
            Metric::Impressions => Some(t.impressions),
            Metric::Clicks => Some(t.clicks),
            Metric::Spend => Some(t.spend),
            Metric::Conversions => Some(t.conversions),
            Metric::Revenue => Some(t.revenue),
            Metric::Visits => Some(t.visits),
            Metric::Temperature => t.mean_temperature,
            Metric::Rainfall => t.mean_rainfall,
            Metric::Ctr | Metric::Cpc | Metric::Cvr | Metric::Cpa | Metric::Roas => {
                self.ratio(metric).and_then(Ratio::value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn zero_denominator_is_undefined() {
        assert_eq!(Ratio::of(5.0, 0.0), Ratio::Undefined);
        assert_eq!(Ratio::of(0.0, 0.0), Ratio::Undefined);
        assert_eq!(Ratio::of(0.0, 4.0), Ratio::Defined(0.0));
    }

    #[test]
    fn ratios_follow_definitions() {
        let totals = Totals {
            rows: 2,
            days: 2,
            impressions: 1000.0,
            clicks: 50.0,
            spend: 100.0,
            conversions: 5.0,
            revenue: 250.0,
            ..Totals::default()
        };
        let rec = KpiRecord::from_totals(GroupKey::overall(), Period::day(date(1)), totals);
        assert_eq!(rec.ctr, Ratio::Defined(50.0 / 1000.0));
        assert_eq!(rec.cpc, Ratio::Defined(2.0));
        assert_eq!(rec.cvr, Ratio::Defined(0.1));
        assert_eq!(rec.cpa, Ratio::Defined(20.0));
        assert_eq!(rec.roas, Ratio::Defined(2.5));
        assert_eq!(rec.avg_daily_conversions, Ratio::Defined(2.5));
    }

    #[test]
    fn no_spend_leaves_roas_undefined() {
        let totals = Totals {
            rows: 1,
            days: 1,
            revenue: 80.0,
            ..Totals::default()
        };
        let rec = KpiRecord::from_totals(GroupKey::overall(), Period::day(date(1)), totals);
        assert_eq!(rec.roas, Ratio::Undefined);
        assert_eq!(rec.value(Metric::Roas), None);
        assert_eq!(rec.value(Metric::Revenue), Some(80.0));
    }

    #[test]
    fn ratio_serializes_with_explicit_marker() {
        let json = serde_json::to_string(&Ratio::Undefined).unwrap();
        assert_eq!(json, "\"undefined\"");
        let json = serde_json::to_string(&Ratio::Defined(0.5)).unwrap();
        assert_eq!(json, r#"{"defined":0.5}"#);
    }

    #[test]
    fn period_extends_both_ways() {
        let p = Period::day(date(5)).extend(date(2)).extend(date(9));
        assert_eq!(p.start, date(2));
        assert_eq!(p.end, date(9));
        assert_eq!(p.len_days(), 8);
    }
}
