//! Property tests for the shared value types.

use chrono::NaiveDate;
use ig_common::{CorrelationStrength, Dimension, PercentileBucket, Period, Ratio, TemperatureBand};
use proptest::prelude::*;

fn date(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date") + chrono::Duration::days(offset)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn ratio_is_never_non_finite(n in prop::num::f64::ANY, d in prop::num::f64::ANY) {
        match Ratio::of(n, d) {
            Ratio::Defined(v) => prop_assert!(v.is_finite()),
            Ratio::Undefined => prop_assert!(d == 0.0 || !(n / d).is_finite()),
        }
    }

    #[test]
    fn zero_denominator_is_undefined(n in -1e9..1e9f64) {
        prop_assert_eq!(Ratio::of(n, 0.0), Ratio::Undefined);
        prop_assert_eq!(Ratio::of(n, -0.0), Ratio::Undefined);
    }

    /// Extending never shrinks the period and always covers the new day.
    #[test]
    fn period_extend_covers_every_day(days in prop::collection::vec(-400i64..400, 1..50)) {
        let mut period = Period::day(date(days[0]));
        for d in &days {
            let before = period;
            period = period.extend(date(*d));
            prop_assert!(period.start <= date(*d) && date(*d) <= period.end);
            prop_assert!(period.len_days() >= before.len_days());
        }
        let lo = days.iter().copied().min().unwrap_or_default();
        let hi = days.iter().copied().max().unwrap_or_default();
        prop_assert_eq!(period.len_days(), hi - lo + 1);
    }

    /// A larger favorable gap never lands in a worse bucket.
    #[test]
    fn percentile_bucket_is_monotonic(a in -100.0..100.0f64, b in -100.0..100.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(PercentileBucket::from_favorable_gap(hi) <= PercentileBucket::from_favorable_gap(lo));
    }

    #[test]
    fn temperature_bands_are_ordered(a in -30.0..45.0f64, b in -30.0..45.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let rank = |band: TemperatureBand| {
            TemperatureBand::ALL.iter().position(|x| *x == band).unwrap_or(usize::MAX)
        };
        prop_assert!(rank(TemperatureBand::classify(lo)) <= rank(TemperatureBand::classify(hi)));
    }

    #[test]
    fn correlation_strength_ignores_sign(r in -1.0..=1.0f64) {
        prop_assert_eq!(
            CorrelationStrength::classify(r, 0.7, 0.4),
            CorrelationStrength::classify(-r, 0.7, 0.4)
        );
    }

    #[test]
    fn dimension_parse_is_case_insensitive(idx in 0usize..5, upper in any::<bool>()) {
        let dim = Dimension::ALL[idx];
        let text = if upper { dim.as_str().to_ascii_uppercase() } else { dim.as_str().to_string() };
        prop_assert_eq!(Dimension::parse(&format!("  {text} ")), Some(dim));
    }
}
