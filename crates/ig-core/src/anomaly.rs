//! Rolling z-score anomaly detector.
//!
//! Each point is compared against the mean and sample standard deviation of
//! the points before it. The current point is never part of its own
//! baseline.

use chrono::NaiveDate;
use ig_common::{Anomaly, Direction, GroupKey, Metric, Severity};
use ig_config::AnomalyConfig;

use crate::metrics::DailySeries;

/// Severity tier for a deviation that already crossed the threshold.
///
/// Swings smaller than `materiality_pct` of the baseline mean are reported
/// as [`Severity::Info`]; a zero baseline mean always counts as material.
pub fn classify(z: f64, pct_change: Option<f64>, config: &AnomalyConfig) -> Severity {
    let material = pct_change.map_or(true, |p| p.abs() >= config.materiality_pct);
    if !material {
        Severity::Info
    } else if z.abs() >= config.z_threshold + 1.0 {
        Severity::Critical
    } else {
        Severity::Warning
    }
}

/// Scan one (metric, key) series, oldest point first.
///
/// Points with fewer than `warmup_periods` predecessors are not evaluated.
/// The baseline holds up to `window` most recent predecessors; a constant
/// baseline has no spread and is skipped.
pub fn detect_series(
    metric: Metric,
    key: &GroupKey,
    points: &[(NaiveDate, f64)],
    config: &AnomalyConfig,
) -> Vec<Anomaly> {
    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let mut out = Vec::new();

    for (i, (date, observed)) in points.iter().enumerate() {
        if i < config.warmup_periods {
            continue;
        }
        let baseline = &values[i.saturating_sub(config.window)..i];
        if ig_math::is_constant(baseline) {
            continue;
        }
        let (Some(expected), Some(std_dev)) =
            (ig_math::mean(baseline), ig_math::sample_std(baseline))
        else {
            continue;
        };
        let Some(z) = ig_math::z_score(*observed, expected, std_dev) else {
            continue;
        };
        if z.abs() < config.z_threshold {
            continue;
        }

        let pct_change = ig_math::pct_change(*observed, expected);
        out.push(Anomaly {
            metric,
            key: key.clone(),
            date: *date,
            observed: *observed,
            expected,
            std_dev,
            deviation: z,
            pct_change,
            severity: classify(z, pct_change, config),
            direction: if *observed > expected {
                Direction::Spike
            } else {
                Direction::Drop
            },
        });
    }
    out
}

/// Run the detector over every configured metric of every series.
///
/// Output order is series order, then metric order, then date.
pub fn detect_anomalies(series: &[DailySeries], config: &AnomalyConfig) -> Vec<Anomaly> {
    let mut out = Vec::new();
    for s in series {
        for metric in &config.metrics {
            out.extend(detect_series(*metric, &s.key, &s.values(*metric), config));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[f64]) -> Vec<(NaiveDate, f64)> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (start + chrono::Days::new(i as u64), *v))
            .collect()
    }

    const CONVERSIONS: [f64; 14] = [
        100.0, 102.0, 98.0, 101.0, 99.0, 103.0, 97.0, 100.0, 101.0, 99.0, 250.0, 100.0, 98.0,
        102.0,
    ];

    #[test]
    fn spike_at_index_ten_is_critical() {
        let found = detect_series(
            Metric::Conversions,
            &GroupKey::overall(),
            &points(&CONVERSIONS),
            &AnomalyConfig::default(),
        );
        assert_eq!(found.len(), 1);
        let a = &found[0];
        assert_eq!(a.date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(a.direction, Direction::Spike);
        assert_eq!(a.severity, Severity::Critical);
        assert_eq!(a.expected, 100.0);
        assert!((a.std_dev - (30.0f64 / 9.0).sqrt()).abs() < 1e-12);
        assert!(a.deviation > 80.0);
        assert_eq!(a.pct_change, Some(150.0));
    }

    #[test]
    fn constant_series_is_never_anomalous() {
        let found = detect_series(
            Metric::Clicks,
            &GroupKey::overall(),
            &points(&[42.0; 20]),
            &AnomalyConfig::default(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn warmup_points_are_skipped() {
        let mut values = vec![10.0, 11.0, 9.0, 10.0, 500.0];
        values.extend([10.0, 11.0, 9.0]);
        let found = detect_series(
            Metric::Clicks,
            &GroupKey::overall(),
            &points(&values),
            &AnomalyConfig::default(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn small_swing_is_info() {
        // Tight baseline around 1000, jump of 1%: many sigmas, not material
        let mut values: Vec<f64> = (0..10).map(|i| 1000.0 + (i % 2) as f64).collect();
        values.push(1010.0);
        let found = detect_series(
            Metric::Revenue,
            &GroupKey::overall(),
            &points(&values),
            &AnomalyConfig::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Info);
    }

    #[test]
    fn drop_below_baseline() {
        let mut values: Vec<f64> = (0..10).map(|i| 100.0 + (i % 3) as f64).collect();
        values.push(20.0);
        let found = detect_series(
            Metric::Clicks,
            &GroupKey::overall(),
            &points(&values),
            &AnomalyConfig::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].direction, Direction::Drop);
        assert!(found[0].deviation < 0.0);
    }

    #[test]
    fn severity_tiers() {
        let cfg = AnomalyConfig::default();
        assert_eq!(classify(2.0, Some(20.0), &cfg), Severity::Warning);
        assert_eq!(classify(-2.9, Some(-20.0), &cfg), Severity::Warning);
        assert_eq!(classify(3.0, Some(20.0), &cfg), Severity::Critical);
        assert_eq!(classify(3.0, Some(5.0), &cfg), Severity::Info);
        assert_eq!(classify(2.5, None, &cfg), Severity::Warning);
    }

    #[test]
    fn baseline_is_capped_at_window() {
        let cfg = AnomalyConfig {
            window: 3,
            warmup_periods: 3,
            ..AnomalyConfig::default()
        };
        // The early outlier has left the 3-point baseline by the last point
        let values = [100.0, 900.0, 100.0, 101.0, 99.0, 100.0, 130.0];
        let found = detect_series(Metric::Clicks, &GroupKey::overall(), &points(&values), &cfg);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].expected, 100.0);
        assert_eq!(found[0].severity, Severity::Critical);
    }
}
