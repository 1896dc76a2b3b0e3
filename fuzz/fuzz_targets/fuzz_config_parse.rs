//! Fuzz target for analysis configuration parsing and validation.
//!
//! Arbitrary input must produce either a validated config or an error,
//! never a panic.

#![no_main]

use ig_config::{validate_config, AnalysisConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = AnalysisConfig::parse_json(text) {
        let _ = validate_config(&config);
        let _ = config.fingerprint();
    }
});
