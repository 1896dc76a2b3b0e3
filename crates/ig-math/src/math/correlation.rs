//! Pearson product-moment correlation and its significance.

use super::beta::regularized_incomplete_beta;
use super::descriptive::{is_constant, mean};
use super::stable::stable_sum;

/// Minimum number of paired observations for a defined coefficient.
pub const MIN_PAIRS: usize = 3;

/// Pearson correlation coefficient of two paired samples.
///
/// Returns `None` when the samples differ in length, hold fewer than
/// [`MIN_PAIRS`] pairs, or either side has zero variance. The formula is
/// symmetric in its arguments, so `pearson(a, b) == pearson(b, a)` exactly.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < MIN_PAIRS {
        return None;
    }
    if is_constant(xs) || is_constant(ys) {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let dx: Vec<f64> = xs.iter().map(|x| x - mx).collect();
    let dy: Vec<f64> = ys.iter().map(|y| y - my).collect();
    let cross: Vec<f64> = dx.iter().zip(&dy).map(|(a, b)| a * b).collect();
    let sxx = stable_sum(&dx.iter().map(|a| a * a).collect::<Vec<_>>());
    let syy = stable_sum(&dy.iter().map(|b| b * b).collect::<Vec<_>>());
    let sxy = stable_sum(&cross);

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    if !r.is_finite() {
        return None;
    }
    Some(r.clamp(-1.0, 1.0))
}

/// Two-sided p-value for a Pearson coefficient `r` over `n` pairs.
///
/// Uses the Student-t statistic `t = r * sqrt((n-2) / (1-r^2))` with
/// `n - 2` degrees of freedom. `None` for fewer than three pairs.
pub fn pearson_p_value(r: f64, n: usize) -> Option<f64> {
    if n < MIN_PAIRS || !r.is_finite() {
        return None;
    }
    let df = (n - 2) as f64;
    let r2 = r * r;
    if r2 >= 1.0 {
        return Some(0.0);
    }
    let t2 = r2 * df / (1.0 - r2);
    // P(|T| > t) = I_{df/(df+t^2)}(df/2, 1/2)
    let p = regularized_incomplete_beta(df / (df + t2), df / 2.0, 0.5);
    if p.is_nan() {
        return None;
    }
    Some(p.clamp(0.0, 1.0))
}
