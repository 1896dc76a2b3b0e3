//! Top and worst performer ranking.

use ig_common::{Dimension, KpiRecord, Metric, Polarity};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which end of the ranking to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Best performers first.
    Top,
    /// Worst performers first.
    Worst,
}

/// Rank the records of one breakdown by `metric` and return the first `n`.
///
/// "Best" follows the metric's polarity: cost metrics rank ascending for
/// [`RankOrder::Top`]. Records whose value is undefined always come last.
/// Ties keep the input order.
pub fn rank_groups<'a>(
    kpis: &'a [KpiRecord],
    breakdown: &[Dimension],
    metric: Metric,
    n: usize,
    order: RankOrder,
) -> Vec<&'a KpiRecord> {
    let mut ranked: Vec<&KpiRecord> = kpis
        .iter()
        .filter(|k| !k.key.is_overall() && k.key.dimensions() == breakdown)
        .collect();

    let best_first_desc = metric.polarity() != Polarity::LowerIsBetter;
    let descending = match order {
        RankOrder::Top => best_first_desc,
        RankOrder::Worst => !best_first_desc,
    };

    ranked.sort_by(|a, b| match (a.value(metric), b.value(metric)) {
        (Some(x), Some(y)) => {
            if descending {
                y.total_cmp(&x)
            } else {
                x.total_cmp(&y)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked.truncate(n);
    ranked
}
