//! Property-based tests for ig-math statistics kernels.
//!
//! Uses proptest to verify statistical invariants across many random inputs.

use ig_math::{
    is_constant, mean, normal_quantile, pearson, pearson_p_value, sample_std, sample_variance,
    stable_sum,
};
use proptest::prelude::*;

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

fn series(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1000.0..1000.0f64, len)
}

fn paired(len: std::ops::Range<usize>) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    len.prop_flat_map(|n| {
        (
            prop::collection::vec(-1000.0..1000.0f64, n),
            prop::collection::vec(-1000.0..1000.0f64, n),
        )
    })
}

// ============================================================================
// Descriptive statistics
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The mean lies between the sample minimum and maximum.
    #[test]
    fn mean_is_bounded(values in series(1..64)) {
        let m = mean(&values).unwrap();
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(m >= lo - TOL && m <= hi + TOL, "mean {} outside [{}, {}]", m, lo, hi);
    }

    /// Variance is never negative.
    #[test]
    fn variance_non_negative(values in series(2..64)) {
        let var = sample_variance(&values).unwrap();
        prop_assert!(var >= 0.0);
    }

    /// Shifting a sample leaves its standard deviation unchanged.
    #[test]
    fn std_shift_invariant(values in series(2..32), shift in -500.0..500.0f64) {
        let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
        let a = sample_std(&values).unwrap();
        let b = sample_std(&shifted).unwrap();
        prop_assert!(approx_eq(a, b, 1e-6), "std {} vs shifted {}", a, b);
    }

    /// Summation is deterministic for identical input.
    #[test]
    fn stable_sum_deterministic(values in series(0..64)) {
        prop_assert_eq!(stable_sum(&values).to_bits(), stable_sum(&values).to_bits());
    }
}

// ============================================================================
// Correlation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// corr(A, B) == corr(B, A) exactly.
    #[test]
    fn pearson_symmetric((a, b) in paired(3..40)) {
        prop_assert_eq!(pearson(&a, &b), pearson(&b, &a));
    }

    /// Defined coefficients lie in [-1, 1].
    #[test]
    fn pearson_bounded((a, b) in paired(3..40)) {
        if let Some(r) = pearson(&a, &b) {
            prop_assert!((-1.0..=1.0).contains(&r), "r = {}", r);
        }
    }

    /// Positive affine maps of one side keep r unchanged.
    #[test]
    fn pearson_affine_invariant((a, b) in paired(3..40), scale in 0.5..20.0f64, shift in -100.0..100.0f64) {
        let scaled: Vec<f64> = a.iter().map(|v| v * scale + shift).collect();
        if let (Some(r1), Some(r2)) = (pearson(&a, &b), pearson(&scaled, &b)) {
            prop_assert!(approx_eq(r1, r2, 1e-6), "r {} vs affine {}", r1, r2);
        }
    }

    /// A constant side always makes the coefficient undefined.
    #[test]
    fn pearson_constant_side_undefined(values in series(3..40), c in -100.0..100.0f64) {
        let constant = vec![c; values.len()];
        prop_assert!(is_constant(&constant));
        prop_assert_eq!(pearson(&values, &constant), None);
    }

    /// p-values are probabilities and shrink as |r| grows.
    #[test]
    fn p_value_monotone(r in 0.0..0.95f64, n in 5usize..200) {
        let p_small = pearson_p_value(r, n).unwrap();
        let p_large = pearson_p_value((r + 0.04).min(0.99), n).unwrap();
        prop_assert!((0.0..=1.0).contains(&p_small));
        prop_assert!(p_large <= p_small + 1e-9, "p({}) = {} > p({}) = {}", r + 0.04, p_large, r, p_small);
    }
}

// ============================================================================
// Normal quantile
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The quantile function is strictly increasing.
    #[test]
    fn normal_quantile_monotone(p in 0.0001..0.9998f64) {
        prop_assert!(normal_quantile(p) < normal_quantile(p + 0.0001));
    }

    /// Q(p) = -Q(1 - p).
    #[test]
    fn normal_quantile_antisymmetric(p in 0.0001..0.9999f64) {
        prop_assert!(approx_eq(normal_quantile(p), -normal_quantile(1.0 - p), 1e-7));
    }
}
