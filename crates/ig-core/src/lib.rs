//! InsightGen analytics engine.
//!
//! Turns a merged marketing + weather dataset into one immutable
//! [`InsightBundle`]:
//! - Metric calculator: KPIs per grouping key, daily series, rankings
//! - Correlation analyzer: performance versus weather, rain impact,
//!   temperature bands
//! - Anomaly detector: rolling z-score with materiality check
//! - Benchmark comparator: polarity-aware gaps against industry values
//! - Forecaster: trend-adjusted next-period estimate with confidence band
//!
//! The four analysis branches are independent and run on scoped threads
//! once KPIs are available; see [`pipeline`].
//!
//! No I/O happens here; the engine only emits `tracing` events. Loading the
//! dataset, installing a subscriber and rendering the bundle belong to the
//! caller.

pub mod anomaly;
pub mod benchmark;
pub mod forecast;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod weather;

pub use ig_bundle::InsightBundle;
pub use metrics::{compute_kpis, daily_series, rank_groups, DailySeries, MetricsOutput, RankOrder};
pub use pipeline::{run, run_with_context};
