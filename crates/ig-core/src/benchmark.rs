//! Benchmark comparator.
//!
//! Compares the overall KPI record and every single-channel record with the
//! industry reference table. Status is decided on the favorable gap, so a
//! CPA above the industry value is a shortfall while a ROAS above it is a
//! strength.

use ig_common::{BenchmarkResult, BenchmarkStatus, KpiRecord, Metric, PercentileBucket};
use ig_config::benchmarks::OVERALL_CHANNEL;
use ig_config::{BenchmarkConfig, BenchmarkTable};
use tracing::debug;

/// Status for a polarity-adjusted gap.
///
/// Within `at_band_pct` either way (inclusive) is at benchmark.
pub fn classify_gap(favorable_gap_pct: f64, at_band_pct: f64) -> BenchmarkStatus {
    if favorable_gap_pct.abs() <= at_band_pct {
        BenchmarkStatus::AtBenchmark
    } else if favorable_gap_pct > 0.0 {
        BenchmarkStatus::AboveBenchmark
    } else {
        BenchmarkStatus::BelowBenchmark
    }
}

/// Compare one client value against one industry value.
///
/// `None` when the industry value is zero or either side is not finite.
pub fn compare_value(
    metric: Metric,
    client_value: f64,
    industry_value: f64,
    at_band_pct: f64,
) -> Option<(f64, f64, BenchmarkStatus, PercentileBucket)> {
    if !client_value.is_finite() || !industry_value.is_finite() {
        return None;
    }
    let gap = ig_math::pct_change(client_value, industry_value)?;
    let favorable = gap * metric.polarity().sign();
    Some((
        gap,
        favorable,
        classify_gap(favorable, at_band_pct),
        PercentileBucket::from_favorable_gap(favorable),
    ))
}

/// Benchmark every eligible KPI record.
///
/// Undefined client values and missing table entries are omitted from the
/// result rather than failing the pass. With `channel_fallback` a missing
/// channel entry falls back to the table's `overall` channel.
pub fn compare(
    kpis: &[KpiRecord],
    table: &BenchmarkTable,
    config: &BenchmarkConfig,
) -> Vec<BenchmarkResult> {
    let mut out = Vec::new();
    for kpi in kpis {
        let channel = if kpi.key.is_overall() {
            OVERALL_CHANNEL
        } else if let Some(ch) = kpi.key.single_channel() {
            ch
        } else {
            continue;
        };

        for metric in &config.metrics {
            let Some(client_value) = kpi.value(*metric) else {
                debug!(key = %kpi.key, metric = %metric, "client value undefined");
                continue;
            };
            let industry_value = table
                .get(*metric, channel, &config.industry)
                .or_else(|| {
                    config
                        .channel_fallback
                        .then(|| table.get(*metric, OVERALL_CHANNEL, &config.industry))
                        .flatten()
                });
            let Some(industry_value) = industry_value else {
                debug!(
                    channel,
                    metric = %metric,
                    industry = %config.industry,
                    "no benchmark entry"
                );
                continue;
            };
            let Some((gap, favorable, status, bucket)) =
                compare_value(*metric, client_value, industry_value, config.at_band_pct)
            else {
                continue;
            };
            out.push(BenchmarkResult {
                key: kpi.key.clone(),
                channel: channel.to_string(),
                metric: *metric,
                client_value,
                industry_value,
                relative_gap_pct: gap,
                favorable_gap_pct: favorable,
                status,
                percentile_bucket: bucket,
            });
        }
    }
    out
}

/// Results above benchmark, largest favorable gap first.
pub fn strengths(results: &[BenchmarkResult]) -> Vec<&BenchmarkResult> {
    let mut out: Vec<&BenchmarkResult> = results
        .iter()
        .filter(|r| r.status == BenchmarkStatus::AboveBenchmark)
        .collect();
    out.sort_by(|a, b| b.favorable_gap_pct.total_cmp(&a.favorable_gap_pct));
    out
}

/// Results below benchmark, largest shortfall first.
pub fn weaknesses(results: &[BenchmarkResult]) -> Vec<&BenchmarkResult> {
    let mut out: Vec<&BenchmarkResult> = results
        .iter()
        .filter(|r| r.status == BenchmarkStatus::BelowBenchmark)
        .collect();
    out.sort_by(|a, b| a.favorable_gap_pct.total_cmp(&b.favorable_gap_pct));
    out
}
