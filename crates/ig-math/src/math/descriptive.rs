//! Descriptive statistics over finite samples.
//!
//! All functions return `None` instead of NaN when the statistic is not
//! defined for the given sample, so callers are forced to handle the
//! "not computable" case explicitly.

use super::stable::stable_sum;

/// Arithmetic mean. `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(stable_sum(values) / values.len() as f64)
}

/// Sample variance with Bessel's correction (n - 1 denominator).
///
/// `None` for fewer than two observations.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let squares: Vec<f64> = values.iter().map(|v| (v - m) * (v - m)).collect();
    Some(stable_sum(&squares) / (values.len() as f64 - 1.0))
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// True when every value compares equal to the first one.
///
/// Checked directly rather than through the variance so that a series
/// such as `[0.1, 0.1, 0.1]` is recognised as constant even though its
/// floating-point mean is not exactly 0.1.
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

/// Signed percentage change of `value` relative to `baseline`.
///
/// `None` when the baseline is zero.
pub fn pct_change(value: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    Some((value - baseline) / baseline.abs() * 100.0)
}

/// Z-score of `value` against a baseline mean and standard deviation.
///
/// `None` when the standard deviation is zero or not finite.
pub fn z_score(value: f64, mean: f64, std_dev: f64) -> Option<f64> {
    if std_dev <= 0.0 || !std_dev.is_finite() {
        return None;
    }
    Some((value - mean) / std_dev)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }

    #[test]
    fn sample_variance_uses_bessel_correction() {
        // deviations from 100: 0, 2, -2, 1, -1, 3, -3 -> sum of squares 28
        let values = [100.0, 102.0, 98.0, 101.0, 99.0, 103.0, 97.0];
        let var = sample_variance(&values).unwrap();
        assert!(approx_eq(var, 28.0 / 6.0, 1e-12));
    }

    #[test]
    fn sample_std_needs_two_points() {
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(sample_std(&[5.0, 5.0]), Some(0.0));
    }

    #[test]
    fn constant_detection_ignores_rounding() {
        assert!(is_constant(&[0.1, 0.1, 0.1]));
        assert!(!is_constant(&[0.1, 0.1, 0.2]));
        assert!(is_constant(&[]));
    }

    #[test]
    fn pct_change_signs() {
        assert_eq!(pct_change(150.0, 100.0), Some(50.0));
        assert_eq!(pct_change(50.0, 100.0), Some(-50.0));
        assert_eq!(pct_change(1.0, 0.0), None);
    }

    #[test]
    fn z_score_rejects_zero_spread() {
        assert_eq!(z_score(10.0, 5.0, 0.0), None);
        assert_eq!(z_score(10.0, 5.0, 2.5), Some(2.0));
    }
}
