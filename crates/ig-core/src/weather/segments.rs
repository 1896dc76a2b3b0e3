//! Rainy-versus-dry and temperature-band segmentation.

use ig_common::{GroupKey, Metric, RainImpact, TemperatureBand, TemperatureBandSummary};
use ig_config::WeatherConfig;
use std::collections::{BTreeMap, BTreeSet};

use super::{column, CellKey, Cells};

/// Mean of each performance metric on rainy versus dry location-days.
///
/// A location-day is rainy when its mean rainfall exceeds
/// `rainy_day_mm`. A metric is omitted when either side has no days.
pub(crate) fn rain_impact(key: &GroupKey, cells: &Cells, config: &WeatherConfig) -> Vec<RainImpact> {
    let rain = column(cells, Metric::Rainfall);
    let mut out = Vec::new();

    for metric in &config.performance_metrics {
        let perf = column(cells, *metric);
        let mut rainy = Vec::new();
        let mut dry = Vec::new();
        for (cell, mm) in &rain {
            let Some(v) = perf.get(cell) else { continue };
            if *mm > config.rainy_day_mm {
                rainy.push(*v);
            } else {
                dry.push(*v);
            }
        }
        let (Some(rainy_mean), Some(dry_mean)) = (ig_math::mean(&rainy), ig_math::mean(&dry))
        else {
            continue;
        };
        out.push(RainImpact {
            key: key.clone(),
            metric: *metric,
            rainy_days: rainy.len(),
            dry_days: dry.len(),
            rainy_mean,
            dry_mean,
            pct_change: ig_math::pct_change(rainy_mean, dry_mean),
        });
    }
    out
}

/// Day counts and performance means per temperature band.
///
/// Only bands with at least one location-day are emitted, coldest first.
pub(crate) fn temperature_bands(
    key: &GroupKey,
    cells: &Cells,
    config: &WeatherConfig,
) -> Vec<TemperatureBandSummary> {
    let temps = column(cells, Metric::Temperature);
    let mut banded: BTreeMap<TemperatureBand, BTreeSet<&CellKey>> = BTreeMap::new();
    for (cell, celsius) in &temps {
        banded
            .entry(TemperatureBand::classify(*celsius))
            .or_default()
            .insert(cell);
    }

    let perf: Vec<(Metric, BTreeMap<CellKey, f64>)> = config
        .performance_metrics
        .iter()
        .map(|m| (*m, column(cells, *m)))
        .collect();

    let mut out = Vec::new();
    for band in TemperatureBand::ALL {
        let Some(members) = banded.get(band) else {
            continue;
        };
        let mut means = BTreeMap::new();
        for (metric, values) in &perf {
            let vs: Vec<f64> = members
                .iter()
                .filter_map(|cell| values.get(*cell).copied())
                .collect();
            if let Some(m) = ig_math::mean(&vs) {
                means.insert(*metric, m);
            }
        }
        out.push(TemperatureBandSummary {
            key: key.clone(),
            band: *band,
            days: members.len(),
            means,
        });
    }
    out
}
