//! Fuzz target for insight bundle JSON read-back.
//!
//! Bundles handed back by downstream collaborators may be truncated or
//! edited; reading them should never panic, only return an error.

#![no_main]

use ig_bundle::InsightBundle;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(bundle) = InsightBundle::from_json(text) {
        let _ = bundle.digest();
        let _ = bundle.anomaly_summary(5);
    }
});
