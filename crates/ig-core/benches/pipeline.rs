//! Criterion benchmarks for the analytics pipeline.
//!
//! Inputs are synthetic and deterministic: 90 days of rows for several
//! channels and locations, roughly the largest reporting period the engine
//! is meant for.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ig_common::{Dimension, MergedRecord, Metric};
use ig_config::{AnalysisConfig, BenchmarkTable};
use ig_core::logging::LogContext;
use ig_core::{compute_kpis, run_with_context};

const CHANNELS: [&str; 4] = ["email", "search", "social", "display"];
const LOCATIONS: [&str; 3] = ["leeds", "york", "hull"];

fn synthetic_rows(days: usize) -> Vec<MergedRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let mut rows = Vec::with_capacity(days * CHANNELS.len() * LOCATIONS.len());
    for d in 0..days {
        let date = start + chrono::Days::new(d as u64);
        let wave = ((d % 7) as f64 - 3.0).abs();
        for (ci, channel) in CHANNELS.iter().enumerate() {
            for (li, location) in LOCATIONS.iter().enumerate() {
                let scale = 1.0 + ci as f64 * 0.5 + li as f64 * 0.25;
                let clicks = (200.0 + 15.0 * wave) * scale;
                rows.push(MergedRecord {
                    campaign_id: Some(format!("cmp-{}", (d / 30) + 1)),
                    channel: Some(channel.to_string()),
                    location: Some(location.to_string()),
                    impressions: clicks * 25.0,
                    clicks,
                    spend: clicks * 0.8,
                    conversions: clicks / 20.0 + wave,
                    revenue: clicks * 2.1,
                    visits: clicks * 0.9,
                    temperature: Some(5.0 + (d % 20) as f64),
                    rainfall: Some(((d * 7 + li) % 11) as f64),
                    ..MergedRecord::empty(date)
                });
            }
        }
    }
    rows
}

fn table() -> BenchmarkTable {
    let mut t = BenchmarkTable::new();
    for channel in ["overall"].iter().chain(CHANNELS.iter()) {
        t.insert("general", channel, Metric::Ctr, 0.04);
        t.insert("general", channel, Metric::Cpc, 0.9);
        t.insert("general", channel, Metric::Cpa, 18.0);
        t.insert("general", channel, Metric::Roas, 2.4);
    }
    t
}

fn bench_compute_kpis(c: &mut Criterion) {
    let rows = synthetic_rows(90);
    let dims = vec![
        vec![Dimension::Channel],
        vec![Dimension::Campaign],
        vec![Dimension::Location],
        vec![Dimension::DayOfWeek],
    ];
    c.bench_function("compute_kpis/90d", |b| {
        b.iter(|| {
            let kpis = compute_kpis(black_box(&rows), black_box(&dims)).expect("kpis");
            black_box(kpis.len());
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let table = table();
    let ctx = LogContext::new("run-bench0000000");
    let mut group = c.benchmark_group("pipeline");

    for days in [30usize, 90] {
        let rows = synthetic_rows(days);
        for parallel in [false, true] {
            let config = AnalysisConfig {
                parallel,
                ..AnalysisConfig::default()
            };
            let label = if parallel { "threaded" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, days), &rows, |b, rows| {
                b.iter(|| {
                    let bundle = run_with_context(black_box(rows), &table, &config, &ctx)
                        .expect("pipeline should run");
                    black_box(bundle.kpis().len());
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_compute_kpis, bench_pipeline);
criterion_main!(benches);
