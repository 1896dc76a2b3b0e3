//! Per-day KPI series.

use chrono::NaiveDate;
use ig_common::{Dimension, GroupKey, KpiRecord, MergedRecord, Metric};
use std::collections::{BTreeMap, HashMap};

use super::Accumulator;

/// Date-ordered daily KPI records for one grouping key.
///
/// Days without rows are absent rather than zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub key: GroupKey,
    pub points: Vec<KpiRecord>,
}

impl DailySeries {
    /// Defined values of `metric`, oldest first.
    ///
    /// Days where a ratio is undefined (or a weather reading is missing)
    /// are dropped, so statistics only ever see real numbers.
    pub fn values(&self, metric: Metric) -> Vec<(NaiveDate, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.value(metric).map(|v| (p.period.start, v)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The overall daily series followed by one series per group of each
/// single dimension in `dims`.
pub fn daily_series(records: &[MergedRecord], dims: &[Dimension]) -> Vec<DailySeries> {
    let mut out = vec![by_day(GroupKey::overall(), records.iter())];

    let mut done: Vec<Dimension> = Vec::new();
    for dim in dims {
        if done.contains(dim) {
            continue;
        }
        done.push(*dim);

        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<(GroupKey, Vec<&MergedRecord>)> = Vec::new();
        for record in records {
            let key = GroupKey::from_record(&[*dim], record);
            match index.get(&key) {
                Some(i) => groups[*i].1.push(record),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push((key, vec![record]));
                }
            }
        }
        out.extend(
            groups
                .into_iter()
                .map(|(key, rows)| by_day(key, rows.into_iter())),
        );
    }
    out
}

fn by_day<'a>(key: GroupKey, rows: impl Iterator<Item = &'a MergedRecord>) -> DailySeries {
    let mut days: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
    for row in rows {
        days.entry(row.date).or_default().push(row);
    }
    let points = days
        .values()
        .filter_map(|acc| acc.finish(key.clone()))
        .collect();
    DailySeries { key, points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ig_common::Ratio;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn row(d: u32, channel: &str, clicks: f64, impressions: f64) -> MergedRecord {
        MergedRecord {
            channel: Some(channel.to_string()),
            clicks,
            impressions,
            ..MergedRecord::empty(day(d))
        }
    }

    #[test]
    fn series_are_date_ordered_and_summed_per_day() {
        let rows = vec![
            row(3, "email", 5.0, 50.0),
            row(1, "search", 10.0, 100.0),
            row(1, "email", 2.0, 20.0),
        ];
        let series = daily_series(&rows, &[Dimension::Channel]);
        assert_eq!(series.len(), 3);

        let overall = &series[0];
        assert!(overall.key.is_overall());
        let clicks = overall.values(Metric::Clicks);
        assert_eq!(clicks, vec![(day(1), 12.0), (day(3), 5.0)]);

        assert_eq!(series[1].key.single_channel(), Some("email"));
        assert_eq!(series[1].len(), 2);
        assert_eq!(series[2].key.single_channel(), Some("search"));
    }

    #[test]
    fn undefined_ratio_days_are_dropped() {
        let rows = vec![
            row(1, "email", 5.0, 50.0),
            row(2, "email", 0.0, 0.0),
            row(3, "email", 4.0, 80.0),
        ];
        let series = daily_series(&rows, &[]);
        assert_eq!(series[0].points[1].ctr, Ratio::Undefined);
        let ctr = series[0].values(Metric::Ctr);
        assert_eq!(ctr, vec![(day(1), 0.1), (day(3), 0.05)]);
    }
}
