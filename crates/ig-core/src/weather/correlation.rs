//! Pearson correlation between performance and weather series.

use ig_common::{CorrelationResult, CorrelationStrength, GroupKey, Metric};
use ig_config::WeatherConfig;
use std::collections::BTreeMap;

/// Pair two keyed series on the keys present in both.
///
/// Keys present on one side only are dropped silently; partial weather
/// coverage is expected. Pairs come out in key order.
pub fn align<K: Ord>(left: &BTreeMap<K, f64>, right: &BTreeMap<K, f64>) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (k, x) in left {
        if let Some(y) = right.get(k) {
            xs.push(*x);
            ys.push(*y);
        }
    }
    (xs, ys)
}

/// Correlate two aligned samples and label the result.
///
/// The coefficient, p-value and strength stay `None` when fewer than
/// `min_pairs` pairs are available or either side is constant.
pub fn correlate(
    key: GroupKey,
    performance: Metric,
    weather: Metric,
    xs: &[f64],
    ys: &[f64],
    config: &WeatherConfig,
) -> CorrelationResult {
    let sample_size = xs.len().min(ys.len());
    let coefficient = if sample_size < config.min_pairs {
        None
    } else {
        ig_math::pearson(xs, ys)
    };
    CorrelationResult {
        key,
        performance,
        weather,
        coefficient,
        p_value: coefficient.and_then(|r| ig_math::pearson_p_value(r, sample_size)),
        sample_size,
        strength: coefficient.map(|r| {
            CorrelationStrength::classify(r, config.strong_threshold, config.moderate_threshold)
        }),
    }
}
