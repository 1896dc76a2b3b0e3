//! Fuzz target for benchmark table parsing (nested and legacy layouts).

#![no_main]

use ig_common::Metric;
use ig_config::BenchmarkTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(table) = BenchmarkTable::parse_json(text) {
        // Every accepted value is usable as a divisor
        for metric in Metric::RATIOS {
            if let Some(v) = table.get(*metric, "overall", "general") {
                assert!(v.is_finite() && v > 0.0);
            }
        }
    }
});
