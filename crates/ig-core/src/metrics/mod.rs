//! Metric calculator.
//!
//! Aggregates merged rows into [`KpiRecord`]s per grouping key, builds the
//! per-day series consumed by the anomaly detector and the forecaster, and
//! ranks groups by a KPI.
//!
//! Aggregation is partition-stable: every sum is taken over the values in
//! sorted order, so shuffling rows never changes a total, not even in the
//! last bit.

mod rank;
mod series;

pub use rank::{rank_groups, RankOrder};
pub use series::{daily_series, DailySeries};

use chrono::NaiveDate;
use ig_common::{
    Dimension, Error, GroupKey, KpiRecord, MergedRecord, Metric, Period, Result, Totals,
};
use std::collections::{BTreeSet, HashMap};

/// Everything the analytical branches need from the metric stage.
#[derive(Debug, Clone)]
pub struct MetricsOutput {
    pub period: Period,
    pub row_count: usize,
    /// Overall record first, then one record per group of every breakdown.
    pub kpis: Vec<KpiRecord>,
    pub series: Vec<DailySeries>,
}

impl MetricsOutput {
    /// Run the whole metric stage over `records`.
    pub fn compute(
        records: &[MergedRecord],
        breakdowns: &[Vec<Dimension>],
        series_dims: &[Dimension],
    ) -> Result<Self> {
        let kpis = compute_kpis(records, breakdowns)?;
        let period = kpis
            .first()
            .map(|k| k.period)
            .ok_or(Error::EmptyDataset)?;
        Ok(Self {
            period,
            row_count: records.len(),
            kpis,
            series: daily_series(records, series_dims),
        })
    }
}

/// Reject an empty dataset and rows carrying negative or non-finite values.
pub fn validate_records(records: &[MergedRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(Error::EmptyDataset);
    }
    for (row, record) in records.iter().enumerate() {
        if let Some(metric) = record.invalid_fields().first() {
            return Err(Error::InvalidRecord {
                row,
                field: metric.as_str().to_string(),
                value: record.raw(*metric).unwrap_or(f64::NAN),
            });
        }
    }
    Ok(())
}

/// One KPI record per group per breakdown, preceded by the overall record.
///
/// Groups appear in the order their key is first seen in `records`.
/// Empty and repeated breakdowns are ignored.
pub fn compute_kpis(
    records: &[MergedRecord],
    breakdowns: &[Vec<Dimension>],
) -> Result<Vec<KpiRecord>> {
    validate_records(records)?;

    let mut overall = Accumulator::default();
    for record in records {
        overall.push(record);
    }
    let mut out = Vec::new();
    out.extend(overall.finish(GroupKey::overall()));

    let mut seen: BTreeSet<&[Dimension]> = BTreeSet::new();
    for dims in breakdowns {
        if dims.is_empty() || !seen.insert(dims.as_slice()) {
            continue;
        }
        for (key, acc) in group_rows(records, dims) {
            out.extend(acc.finish(key));
        }
    }
    Ok(out)
}

/// Partition rows by the key over `dims`, in first-seen key order.
pub(crate) fn group_rows(
    records: &[MergedRecord],
    dims: &[Dimension],
) -> Vec<(GroupKey, Accumulator)> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, Accumulator)> = Vec::new();
    for record in records {
        let key = GroupKey::from_record(dims, record);
        let slot = match index.get(&key) {
            Some(i) => *i,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, Accumulator::default()));
                groups.len() - 1
            }
        };
        groups[slot].1.push(record);
    }
    groups
}

/// Raw values collected for one group before summation.
#[derive(Debug, Clone, Default)]
pub(crate) struct Accumulator {
    rows: usize,
    dates: BTreeSet<NaiveDate>,
    impressions: Vec<f64>,
    clicks: Vec<f64>,
    spend: Vec<f64>,
    conversions: Vec<f64>,
    revenue: Vec<f64>,
    visits: Vec<f64>,
    temperature: Vec<f64>,
    rainfall: Vec<f64>,
}

impl Accumulator {
    pub(crate) fn push(&mut self, record: &MergedRecord) {
        self.rows += 1;
        self.dates.insert(record.date);
        self.impressions.push(record.impressions);
        self.clicks.push(record.clicks);
        self.spend.push(record.spend);
        self.conversions.push(record.conversions);
        self.revenue.push(record.revenue);
        self.visits.push(record.visits);
        self.temperature.extend(record.temperature);
        self.rainfall.extend(record.rainfall);
    }

    pub(crate) fn totals(&self) -> Totals {
        Totals {
            rows: self.rows,
            days: self.dates.len(),
            impressions: ordered_sum(&self.impressions),
            clicks: ordered_sum(&self.clicks),
            spend: ordered_sum(&self.spend),
            conversions: ordered_sum(&self.conversions),
            revenue: ordered_sum(&self.revenue),
            visits: ordered_sum(&self.visits),
            mean_temperature: ordered_mean(&self.temperature),
            mean_rainfall: ordered_mean(&self.rainfall),
        }
    }

    /// `None` only for an accumulator that never saw a row.
    pub(crate) fn finish(&self, key: GroupKey) -> Option<KpiRecord> {
        let start = *self.dates.first()?;
        let end = *self.dates.last()?;
        Some(KpiRecord::from_totals(
            key,
            Period { start, end },
            self.totals(),
        ))
    }

    /// Value of `metric` over the collected rows, `None` when undefined.
    pub(crate) fn value(&self, metric: Metric) -> Option<f64> {
        let start = *self.dates.first()?;
        KpiRecord::from_totals(GroupKey::overall(), Period::day(start), self.totals())
            .value(metric)
    }
}

fn ordered_sum(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    ig_math::stable_sum(&sorted)
}

fn ordered_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(ordered_sum(values) / values.len() as f64)
}
