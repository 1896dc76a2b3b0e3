//! Pipeline orchestration.
//!
//! One analytical pass: validate the configuration, compute KPIs and daily
//! series, run the four independent analysis branches (optionally on scoped
//! threads), then hand every output to the bundle assembler.
//!
//! Each branch reads shared immutable inputs and writes only its own slot,
//! so no locking is involved. A disabled branch leaves its slot empty.

use ig_bundle::{assemble, BundleParts, InsightBundle};
use ig_common::{
    Anomaly, BenchmarkResult, Dimension, Error, ForecastOutcome, MergedRecord, Result,
    WeatherSegments,
};
use ig_config::{validate_config, AnalysisConfig, BenchmarkTable};
use std::thread::{self, ScopedJoinHandle};

use crate::anomaly::detect_anomalies;
use crate::benchmark::compare;
use crate::forecast::forecast_all;
use crate::logging::{event_names, LogContext, Stage};
use crate::metrics::{DailySeries, MetricsOutput};
use crate::weather::analyze_weather;

/// Run one analytical pass with a fresh run id.
pub fn run(
    records: &[MergedRecord],
    benchmarks: &BenchmarkTable,
    config: &AnalysisConfig,
) -> Result<InsightBundle> {
    run_with_context(records, benchmarks, config, &LogContext::generate())
}

/// Run one analytical pass, logging under `ctx`.
///
/// Fails before any computation on an invalid configuration, an empty
/// dataset or a malformed row. Insufficient data for a single metric or
/// group never fails the run.
pub fn run_with_context(
    records: &[MergedRecord],
    benchmarks: &BenchmarkTable,
    config: &AnalysisConfig,
    ctx: &LogContext,
) -> Result<InsightBundle> {
    crate::log_event!(
        ctx,
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "starting analysis",
        rows = records.len(),
        parallel = config.parallel
    );

    match execute(records, benchmarks, config, ctx) {
        Ok(bundle) => {
            crate::log_event!(
                ctx,
                INFO,
                event_names::RUN_FINISHED,
                Stage::Assemble,
                "analysis complete",
                kpis = bundle.kpis().len()
            );
            Ok(bundle)
        }
        Err(e) => {
            let message = e.to_string();
            crate::log_event!(
                ctx,
                ERROR,
                event_names::RUN_FAILED,
                Stage::Init,
                "analysis failed",
                code = e.code(),
                error = message.as_str()
            );
            Err(e)
        }
    }
}

fn execute(
    records: &[MergedRecord],
    benchmarks: &BenchmarkTable,
    config: &AnalysisConfig,
    ctx: &LogContext,
) -> Result<InsightBundle> {
    if let Err(e) = validate_config(config) {
        let message = e.to_string();
        crate::log_event!(
            ctx,
            ERROR,
            event_names::CONFIG_ERROR,
            Stage::Init,
            "configuration rejected",
            error = message.as_str()
        );
        return Err(e.into());
    }
    let fingerprint = config.fingerprint();
    crate::log_event!(
        ctx,
        DEBUG,
        event_names::CONFIG_VALIDATED,
        Stage::Init,
        "configuration valid",
        fingerprint = fingerprint.as_str()
    );

    let metrics = MetricsOutput::compute(
        records,
        &effective_breakdowns(config),
        &config.grouping.series,
    )?;
    crate::log_event!(
        ctx,
        INFO,
        event_names::METRICS_FINISHED,
        Stage::Metrics,
        "KPIs computed",
        kpis = metrics.kpis.len(),
        series = metrics.series.len()
    );

    let branches = if config.parallel {
        run_parallel(records, &metrics, benchmarks, config, ctx)?
    } else {
        run_sequential(records, &metrics, benchmarks, config, ctx)?
    };

    let bundle = assemble(BundleParts {
        period: metrics.period,
        row_count: metrics.row_count,
        config_fingerprint: fingerprint,
        kpis: metrics.kpis,
        weather: branches.weather,
        anomalies: branches.anomalies,
        benchmarks: branches.benchmarks,
        forecasts: branches.forecasts,
    })?;
    crate::log_event!(
        ctx,
        INFO,
        event_names::BUNDLE_ASSEMBLED,
        Stage::Assemble,
        "bundle assembled",
        kpis = bundle.kpis().len()
    );
    Ok(bundle)
}

/// Configured breakdowns plus every breakdown another branch will refer to.
///
/// Series dimensions and per-channel weather produce group keys that must
/// exist in the KPI set, so their single-dimension breakdowns are added
/// when missing.
pub fn effective_breakdowns(config: &AnalysisConfig) -> Vec<Vec<Dimension>> {
    let mut out: Vec<Vec<Dimension>> = config.grouping.breakdowns.clone();
    let mut add = |dims: Vec<Dimension>| {
        if !out.contains(&dims) {
            out.push(dims);
        }
    };
    for dim in &config.grouping.series {
        add(vec![*dim]);
    }
    if config.analyses.weather && config.weather.per_channel {
        add(vec![Dimension::Channel]);
    }
    out
}

/// Branch outputs gathered at the assembly barrier.
#[derive(Debug, Default)]
struct Branches {
    weather: Option<WeatherSegments>,
    anomalies: Option<Vec<Anomaly>>,
    benchmarks: Option<Vec<BenchmarkResult>>,
    forecasts: Option<Vec<ForecastOutcome>>,
}

fn run_sequential(
    records: &[MergedRecord],
    metrics: &MetricsOutput,
    benchmarks: &BenchmarkTable,
    config: &AnalysisConfig,
    ctx: &LogContext,
) -> Result<Branches> {
    let toggles = &config.analyses;
    Ok(Branches {
        weather: enabled(toggles.weather, ctx, Stage::Weather, || {
            weather_branch(records, config, ctx)
        })?,
        anomalies: enabled(toggles.anomalies, ctx, Stage::Anomalies, || {
            anomaly_branch(&metrics.series, config, ctx)
        })?,
        benchmarks: enabled(toggles.benchmarks, ctx, Stage::Benchmarks, || {
            benchmark_branch(metrics, benchmarks, config, ctx)
        })?,
        forecasts: enabled(toggles.forecast, ctx, Stage::Forecast, || {
            forecast_branch(&metrics.series, config, ctx)
        })?,
    })
}

fn run_parallel(
    records: &[MergedRecord],
    metrics: &MetricsOutput,
    benchmarks: &BenchmarkTable,
    config: &AnalysisConfig,
    ctx: &LogContext,
) -> Result<Branches> {
    let toggles = &config.analyses;
    thread::scope(|s| {
        let weather = spawn_if(s, toggles.weather, ctx, Stage::Weather, || {
            weather_branch(records, config, ctx)
        });
        let anomalies = spawn_if(s, toggles.anomalies, ctx, Stage::Anomalies, || {
            anomaly_branch(&metrics.series, config, ctx)
        });
        let bench = spawn_if(s, toggles.benchmarks, ctx, Stage::Benchmarks, || {
            benchmark_branch(metrics, benchmarks, config, ctx)
        });
        let forecasts = spawn_if(s, toggles.forecast, ctx, Stage::Forecast, || {
            forecast_branch(&metrics.series, config, ctx)
        });

        Ok(Branches {
            weather: join(weather, ctx, Stage::Weather)?,
            anomalies: join(anomalies, ctx, Stage::Anomalies)?,
            benchmarks: join(bench, ctx, Stage::Benchmarks)?,
            forecasts: join(forecasts, ctx, Stage::Forecast)?,
        })
    })
}

fn enabled<T>(
    on: bool,
    ctx: &LogContext,
    stage: Stage,
    f: impl FnOnce() -> Result<T>,
) -> Result<Option<T>> {
    if on {
        f().map(Some)
    } else {
        skipped(ctx, stage);
        Ok(None)
    }
}

fn spawn_if<'scope, 'env, T, F>(
    s: &'scope thread::Scope<'scope, 'env>,
    on: bool,
    ctx: &LogContext,
    stage: Stage,
    f: F,
) -> Option<ScopedJoinHandle<'scope, Result<T>>>
where
    T: Send + 'scope,
    F: FnOnce() -> Result<T> + Send + 'scope,
{
    if on {
        Some(s.spawn(f))
    } else {
        skipped(ctx, stage);
        None
    }
}

fn join<T>(
    handle: Option<ScopedJoinHandle<'_, Result<T>>>,
    ctx: &LogContext,
    stage: Stage,
) -> Result<Option<T>> {
    let Some(handle) = handle else {
        return Ok(None);
    };
    handle
        .join()
        .unwrap_or_else(|_| {
            crate::log_event!(
                ctx,
                ERROR,
                event_names::INTERNAL_ERROR,
                stage,
                "analysis thread panicked"
            );
            Err(Error::TaskFailed(format!("{} branch panicked", stage)))
        })
        .map(Some)
}

fn skipped(ctx: &LogContext, stage: Stage) {
    crate::log_event!(
        ctx,
        DEBUG,
        event_names::BRANCH_SKIPPED,
        stage,
        "analysis disabled"
    );
}

fn weather_branch(
    records: &[MergedRecord],
    config: &AnalysisConfig,
    ctx: &LogContext,
) -> Result<WeatherSegments> {
    let segments = analyze_weather(records, &config.weather);
    for err in segments
        .correlations
        .iter()
        .filter_map(|c| c.shortfall(config.weather.min_pairs))
    {
        crate::log_event!(
            ctx,
            DEBUG,
            event_names::CORRELATION_UNDEFINED,
            Stage::Weather,
            "correlation omitted",
            code = err.code(),
            reason = tracing::field::display(&err)
        );
    }
    crate::log_event!(
        ctx,
        INFO,
        event_names::WEATHER_FINISHED,
        Stage::Weather,
        "weather analysis complete",
        correlations = segments.correlations.len(),
        notable = segments.correlations.iter().filter(|c| c.is_notable()).count()
    );
    Ok(segments)
}

fn anomaly_branch(
    series: &[DailySeries],
    config: &AnalysisConfig,
    ctx: &LogContext,
) -> Result<Vec<Anomaly>> {
    let anomalies = detect_anomalies(series, &config.anomaly);
    for a in &anomalies {
        let key = a.key.to_string();
        crate::log_event!(
            ctx,
            DEBUG,
            event_names::ANOMALY_DETECTED,
            Stage::Anomalies,
            "anomaly detected",
            metric = a.metric.as_str(),
            key = key.as_str(),
            severity = a.severity.as_str(),
            z = a.deviation
        );
    }
    crate::log_event!(
        ctx,
        INFO,
        event_names::ANOMALIES_FINISHED,
        Stage::Anomalies,
        "anomaly detection complete",
        anomalies = anomalies.len()
    );
    Ok(anomalies)
}

fn benchmark_branch(
    metrics: &MetricsOutput,
    table: &BenchmarkTable,
    config: &AnalysisConfig,
    ctx: &LogContext,
) -> Result<Vec<BenchmarkResult>> {
    if table.is_empty() {
        crate::log_event!(
            ctx,
            WARN,
            event_names::BENCHMARK_MISSING,
            Stage::Benchmarks,
            "benchmark table is empty"
        );
    }
    let results = compare(&metrics.kpis, table, &config.benchmark);
    crate::log_event!(
        ctx,
        INFO,
        event_names::BENCHMARKS_FINISHED,
        Stage::Benchmarks,
        "benchmark comparison complete",
        results = results.len()
    );
    Ok(results)
}

fn forecast_branch(
    series: &[DailySeries],
    config: &AnalysisConfig,
    ctx: &LogContext,
) -> Result<Vec<ForecastOutcome>> {
    let outcomes = forecast_all(series, &config.forecast)?;
    let mut insufficient = 0usize;
    for err in outcomes.iter().filter_map(ForecastOutcome::shortfall) {
        insufficient += 1;
        crate::log_event!(
            ctx,
            DEBUG,
            event_names::FORECAST_INSUFFICIENT,
            Stage::Forecast,
            "forecast omitted",
            code = err.code(),
            reason = tracing::field::display(&err)
        );
    }
    crate::log_event!(
        ctx,
        INFO,
        event_names::FORECAST_FINISHED,
        Stage::Forecast,
        "forecasting complete",
        forecasts = outcomes.len() - insufficient
    );
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdowns_cover_series_and_weather_channels() {
        let mut config = AnalysisConfig::default();
        config.grouping.breakdowns = vec![vec![Dimension::Location]];
        config.grouping.series = vec![Dimension::Segment];
        let dims = effective_breakdowns(&config);
        assert_eq!(
            dims,
            vec![
                vec![Dimension::Location],
                vec![Dimension::Segment],
                vec![Dimension::Channel],
            ]
        );

        config.analyses.weather = false;
        assert!(!effective_breakdowns(&config).contains(&vec![Dimension::Channel]));
    }

    #[test]
    fn breakdowns_are_not_duplicated() {
        let config = AnalysisConfig::default();
        let dims = effective_breakdowns(&config);
        assert_eq!(dims, config.grouping.breakdowns);
    }
}
