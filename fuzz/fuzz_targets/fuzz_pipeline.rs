//! Fuzz target for the full analytical pass.
//!
//! Builds a small dataset from arbitrary bytes and runs the sequential
//! pipeline. Any outcome is fine except a panic or a consistency error.

#![no_main]

use arbitrary::Arbitrary;
use chrono::NaiveDate;
use ig_common::{Error, MergedRecord};
use ig_config::{AnalysisConfig, BenchmarkTable};
use libfuzzer_sys::fuzz_target;

const CHANNELS: [&str; 3] = ["email", "search", "social"];

#[derive(Debug, Arbitrary)]
struct FuzzRow {
    day: u8,
    channel: u8,
    location: Option<bool>,
    impressions: u16,
    clicks: u16,
    spend: u16,
    conversions: u8,
    revenue: u16,
    rainfall: Option<u8>,
    temperature: Option<i8>,
}

impl FuzzRow {
    fn into_record(self) -> Option<MergedRecord> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)? + chrono::Days::new(u64::from(self.day % 60));
        Some(MergedRecord {
            channel: Some(CHANNELS[usize::from(self.channel) % CHANNELS.len()].to_string()),
            location: self.location.map(|l| if l { "leeds" } else { "york" }.to_string()),
            impressions: f64::from(self.impressions),
            clicks: f64::from(self.clicks),
            spend: f64::from(self.spend),
            conversions: f64::from(self.conversions),
            revenue: f64::from(self.revenue),
            rainfall: self.rainfall.map(f64::from),
            temperature: self.temperature.map(f64::from),
            ..MergedRecord::empty(date)
        })
    }
}

fuzz_target!(|rows: Vec<FuzzRow>| {
    let records: Vec<MergedRecord> = rows.into_iter().filter_map(FuzzRow::into_record).collect();
    let config = AnalysisConfig {
        parallel: false,
        ..AnalysisConfig::default()
    };
    let mut table = BenchmarkTable::new();
    table.insert("general", "overall", ig_common::Metric::Roas, 2.0);

    match ig_core::run(&records, &table, &config) {
        Ok(_) | Err(Error::EmptyDataset) => {}
        Err(Error::Consistency(msg)) => panic!("assembly consistency violated: {msg}"),
        Err(_) => {}
    }
});
