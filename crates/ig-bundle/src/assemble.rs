//! Bundle assembly with the group-key consistency check.

use ig_common::{
    Anomaly, BenchmarkResult, ForecastOutcome, GroupKey, KpiRecord, Period, WeatherSegments,
};
use std::collections::BTreeSet;

use crate::bundle::{InsightBundle, BUNDLE_SCHEMA_VERSION};
use crate::error::{BundleError, Result};

/// Outputs of the analytical branches, gathered at the assembly barrier.
///
/// Each branch owns exactly one slot; `None` means the branch was disabled.
#[derive(Debug, Clone)]
pub struct BundleParts {
    pub period: Period,
    pub row_count: usize,
    pub config_fingerprint: String,
    pub kpis: Vec<KpiRecord>,
    pub weather: Option<WeatherSegments>,
    pub anomalies: Option<Vec<Anomaly>>,
    pub benchmarks: Option<Vec<BenchmarkResult>>,
    pub forecasts: Option<Vec<ForecastOutcome>>,
}

/// Build the immutable bundle.
///
/// Fails when the KPI set is malformed or when any correlation, weather
/// segment, anomaly, benchmark result or forecast references a group key
/// absent from the KPI set.
pub fn assemble(parts: BundleParts) -> Result<InsightBundle> {
    match parts.kpis.first() {
        Some(first) if first.key.is_overall() => {}
        _ => return Err(BundleError::MissingOverall),
    }

    let mut known: BTreeSet<&GroupKey> = BTreeSet::new();
    for kpi in &parts.kpis {
        if !known.insert(&kpi.key) {
            return Err(BundleError::DuplicateKpi(kpi.key.to_string()));
        }
    }

    let check = |component: &str, key: &GroupKey| -> Result<()> {
        if known.contains(key) {
            Ok(())
        } else {
            Err(BundleError::UnknownGroupKey {
                component: component.to_string(),
                key: key.to_string(),
            })
        }
    };

    if let Some(weather) = &parts.weather {
        for c in &weather.correlations {
            check("correlations", &c.key)?;
        }
        for r in &weather.rain_impact {
            check("rain_impact", &r.key)?;
        }
        for t in &weather.temperature_bands {
            check("temperature_bands", &t.key)?;
        }
    }
    for a in parts.anomalies.iter().flatten() {
        check("anomalies", &a.key)?;
    }
    for b in parts.benchmarks.iter().flatten() {
        check("benchmarks", &b.key)?;
    }
    for f in parts.forecasts.iter().flatten() {
        check("forecasts", f.key())?;
    }

    tracing::debug!(
        kpis = parts.kpis.len(),
        anomalies = parts.anomalies.as_ref().map_or(0, Vec::len),
        benchmarks = parts.benchmarks.as_ref().map_or(0, Vec::len),
        forecasts = parts.forecasts.as_ref().map_or(0, Vec::len),
        "bundle assembled"
    );

    Ok(InsightBundle {
        schema_version: BUNDLE_SCHEMA_VERSION.to_string(),
        period: parts.period,
        row_count: parts.row_count,
        config_fingerprint: parts.config_fingerprint,
        kpis: parts.kpis,
        weather: parts.weather,
        anomalies: parts.anomalies,
        benchmarks: parts.benchmarks,
        forecasts: parts.forecasts,
    })
}
