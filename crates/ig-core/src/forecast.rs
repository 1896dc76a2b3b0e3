//! Next-period forecaster.
//!
//! Point estimate = trailing-window mean × trend factor, where the trend
//! factor is the ratio of the second-half mean to the first-half mean of
//! the window. The band is symmetric around the point estimate, scaled from
//! the window's sample standard deviation by the two-sided normal critical
//! value for the configured confidence level.

use chrono::NaiveDate;
use ig_common::{
    Error, Forecast, ForecastOutcome, GroupKey, Metric, Result, TrendDirection,
};
use ig_config::ForecastConfig;

use crate::metrics::DailySeries;

/// Momentum of a window: second-half mean over first-half mean.
///
/// Halves hold ⌊w/2⌋ points each; the middle point of an odd window
/// belongs to neither. Returns 1.0 (no momentum) when the first half
/// averages zero or the ratio is not finite.
pub fn trend_factor(window: &[f64]) -> f64 {
    let half = window.len() / 2;
    if half == 0 {
        return 1.0;
    }
    let first = ig_math::mean(&window[..half]);
    let second = ig_math::mean(&window[window.len() - half..]);
    match (first, second) {
        (Some(m1), Some(m2)) if m1 != 0.0 => {
            let f = m2 / m1;
            if f.is_finite() {
                f
            } else {
                1.0
            }
        }
        _ => 1.0,
    }
}

/// Label a trend factor against the growth and decline cut-offs.
pub fn trend_direction(factor: f64, config: &ForecastConfig) -> TrendDirection {
    if factor > config.growth_threshold {
        TrendDirection::Growth
    } else if factor < config.decline_threshold {
        TrendDirection::Decline
    } else {
        TrendDirection::Flat
    }
}

/// Forecast the period after the last point of one series.
///
/// Fewer than `min_history` points yields
/// [`ForecastOutcome::InsufficientHistory`], never an error. An error is
/// returned only for a confidence level outside (0, 1).
pub fn forecast_series(
    metric: Metric,
    key: &GroupKey,
    points: &[(NaiveDate, f64)],
    config: &ForecastConfig,
) -> Result<ForecastOutcome> {
    let Some((last_date, _)) = points.last() else {
        return Ok(insufficient(metric, key, 0, config));
    };
    if points.len() < config.min_history {
        return Ok(insufficient(metric, key, points.len(), config));
    }

    let z = ig_math::two_sided_z(config.confidence_level).ok_or_else(|| Error::InvalidValue {
        field: "forecast.confidence_level".to_string(),
        message: format!("{} is outside (0, 1)", config.confidence_level),
    })?;

    let take = config.window.min(points.len());
    let window: Vec<f64> = points[points.len() - take..]
        .iter()
        .map(|(_, v)| *v)
        .collect();
    let (Some(mean), Some(sigma)) = (ig_math::mean(&window), ig_math::sample_std(&window)) else {
        return Ok(insufficient(metric, key, window.len(), config));
    };

    let factor = trend_factor(&window);
    let point_estimate = mean * factor;
    let mut lower = point_estimate - z * sigma;
    let upper = point_estimate + z * sigma;
    if metric.is_non_negative() {
        lower = lower.max(0.0);
    }

    Ok(ForecastOutcome::Forecast(Forecast {
        metric,
        key: key.clone(),
        target_date: last_date.succ_opt().unwrap_or(*last_date),
        point_estimate,
        lower,
        upper,
        confidence_level: config.confidence_level,
        trend: trend_direction(factor, config),
        trend_factor: factor,
        history_len: window.len(),
    }))
}

/// Forecast every configured metric of every series.
pub fn forecast_all(series: &[DailySeries], config: &ForecastConfig) -> Result<Vec<ForecastOutcome>> {
    let mut out = Vec::new();
    for s in series {
        for metric in &config.metrics {
            out.push(forecast_series(*metric, &s.key, &s.values(*metric), config)?);
        }
    }
    Ok(out)
}

fn insufficient(
    metric: Metric,
    key: &GroupKey,
    available: usize,
    config: &ForecastConfig,
) -> ForecastOutcome {
    ForecastOutcome::InsufficientHistory {
        metric,
        key: key.clone(),
        available,
        required: config.min_history,
    }
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

    fn run(metric: Metric, values: &[f64]) -> ForecastOutcome {
        forecast_series(
            metric,
            &GroupKey::overall(),
            &points(values),
            &ForecastConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn six_points_is_insufficient() {
        let out = run(Metric::Conversions, &[5.0; 6]);
        assert_eq!(
            out,
            ForecastOutcome::InsufficientHistory {
                metric: Metric::Conversions,
                key: GroupKey::overall(),
                available: 6,
                required: 7,
            }
        );
        assert!(out.forecast().is_none());
    }

    #[test]
    fn flat_series_has_degenerate_band() {
        let out = run(Metric::Conversions, &[10.0; 8]);
        let f = out.forecast().unwrap();
        assert_eq!(f.point_estimate, 10.0);
        assert_eq!(f.lower, 10.0);
        assert_eq!(f.upper, 10.0);
        assert_eq!(f.trend, TrendDirection::Flat);
        assert_eq!(f.target_date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn rising_series_is_growth() {
        let values: Vec<f64> = (0..14).map(|i| 100.0 + 5.0 * i as f64).collect();
        let f = run(Metric::Revenue, &values).forecast().cloned().unwrap();
        // halves average 115 and 150
        assert!((f.trend_factor - 150.0 / 115.0).abs() < 1e-12);
        assert_eq!(f.trend, TrendDirection::Growth);
        assert!(f.lower <= f.point_estimate && f.point_estimate <= f.upper);
        assert_eq!(f.history_len, 14);
    }

    #[test]
    fn lower_bound_is_clipped_for_counts() {
        let values = [0.0, 40.0, 0.0, 35.0, 1.0, 30.0, 0.0, 2.0];
        let f = run(Metric::Conversions, &values).forecast().cloned().unwrap();
        assert_eq!(f.lower, 0.0);
        assert!(f.upper > f.point_estimate);
    }

    #[test]
    fn trend_factor_edge_cases() {
        assert_eq!(trend_factor(&[0.0, 0.0, 5.0, 6.0]), 1.0);
        assert_eq!(trend_factor(&[2.0, 99.0, 4.0]), 2.0);
        assert_eq!(trend_factor(&[]), 1.0);
    }

    #[test]
    fn window_uses_trailing_points() {
        let cfg = ForecastConfig {
            window: 7,
            ..ForecastConfig::default()
        };
        let mut values = vec![1000.0; 7];
        values.extend([10.0; 7]);
        let out = forecast_series(Metric::Clicks, &GroupKey::overall(), &points(&values), &cfg)
            .unwrap();
        assert_eq!(out.forecast().unwrap().point_estimate, 10.0);
    }

    #[test]
    fn invalid_confidence_is_an_error() {
        let cfg = ForecastConfig {
            confidence_level: 1.0,
            ..ForecastConfig::default()
        };
        let err = forecast_series(
            Metric::Clicks,
            &GroupKey::overall(),
            &points(&[1.0; 10]),
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }
}
