//! Correlation analyzer and weather segmentation.
//!
//! Rows are first collapsed into location-days: one cell per
//! (date, location) holding summed performance counts and mean weather
//! readings. Performance and weather columns are then paired on the cells
//! present in both.

pub mod correlation;
mod segments;

pub use correlation::{align, correlate};
use segments::{rain_impact, temperature_bands};

use chrono::NaiveDate;
use ig_common::{Dimension, GroupKey, MergedRecord, Metric, WeatherSegments};
use ig_config::WeatherConfig;
use std::collections::BTreeMap;

use crate::metrics::Accumulator;

/// A location-day. Rows without a location share the `None` cell of their date.
pub(crate) type CellKey = (NaiveDate, Option<String>);

/// Rows collapsed per location-day.
pub(crate) type Cells = BTreeMap<CellKey, Accumulator>;

pub(crate) fn cells<'a>(rows: impl Iterator<Item = &'a MergedRecord>) -> Cells {
    let mut out = Cells::new();
    for row in rows {
        out.entry((row.date, row.location.clone()))
            .or_default()
            .push(row);
    }
    out
}

/// Defined values of `metric` per cell.
pub(crate) fn column(cells: &Cells, metric: Metric) -> BTreeMap<CellKey, f64> {
    cells
        .iter()
        .filter_map(|(k, acc)| acc.value(metric).map(|v| (k.clone(), v)))
        .collect()
}

/// Full weather analysis: correlations, rain impact and temperature bands,
/// overall and (when configured) per channel.
pub fn analyze_weather(records: &[MergedRecord], config: &WeatherConfig) -> WeatherSegments {
    let mut scopes: Vec<(GroupKey, Cells)> = vec![(GroupKey::overall(), cells(records.iter()))];
    if config.per_channel {
        let mut channels: Vec<&str> = Vec::new();
        for record in records {
            if let Some(ch) = record.channel.as_deref() {
                if !channels.contains(&ch) {
                    channels.push(ch);
                }
            }
        }
        for ch in channels {
            let rows = records
                .iter()
                .filter(|r| r.channel.as_deref() == Some(ch));
            scopes.push((GroupKey::single(Dimension::Channel, ch), cells(rows)));
        }
    }

    let mut out = WeatherSegments::default();
    for (key, cells) in &scopes {
        for perf in &config.performance_metrics {
            let perf_col = column(cells, *perf);
            for weather in &config.weather_metrics {
                let (xs, ys) = align(&perf_col, &column(cells, *weather));
                out.correlations
                    .push(correlate(key.clone(), *perf, *weather, &xs, &ys, config));
            }
        }
        if config.weather_metrics.contains(&Metric::Rainfall) {
            out.rain_impact.extend(rain_impact(key, cells, config));
        }
        if config.weather_metrics.contains(&Metric::Temperature) {
            out.temperature_bands
                .extend(temperature_bands(key, cells, config));
        }
    }
    out
}
