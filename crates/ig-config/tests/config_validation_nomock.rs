//! No-mock configuration validation + loading tests.
//!
//! Covers:
//! - Config and benchmark-table loading against real JSON fixtures
//! - Caller-supplied paths versus built-in defaults
//! - Preset determinism

use ig_common::Metric;
use ig_config::preset::{get_preset, list_presets, PresetName};
use ig_config::validate::{validate_config, ValidationError};
use ig_config::{load_config, AnalysisConfig, BenchmarkTable};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("test")
        .join("fixtures")
        .join("config")
}

fn load_config_fixture(name: &str) -> AnalysisConfig {
    let path = fixtures_dir().join(name);
    AnalysisConfig::from_file(&path).expect("read config fixture")
}

#[test]
fn test_validate_config_fixture_ok() {
    let config = load_config_fixture("valid_config.json");
    validate_config(&config).expect("valid config should pass validation");
    assert_eq!(config.benchmark.industry, "retail");
    assert_eq!(config.grouping.breakdowns.len(), 3);
}

#[test]
fn test_validate_config_rejects_bad_confidence() {
    let config = load_config_fixture("invalid_config_bad_confidence.json");
    let err = validate_config(&config).expect_err("confidence 1.2 should fail validation");
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
}

#[test]
fn test_validate_config_rejects_zero_threshold() {
    let config = load_config_fixture("invalid_config_zero_threshold.json");
    let err = validate_config(&config).expect_err("zero threshold should fail validation");
    match err {
        ValidationError::InvalidValue { field, .. } => assert_eq!(field, "anomaly.z_threshold"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_negative_window_is_rejected_at_parse() {
    let path = fixtures_dir().join("invalid_config_negative_window.json");
    let err = AnalysisConfig::from_file(&path).expect_err("negative window should not parse");
    assert!(matches!(err, ValidationError::ParseError(_)));
}

#[test]
fn test_benchmark_fixtures_agree() {
    let nested = BenchmarkTable::from_file(&fixtures_dir().join("benchmarks.json"))
        .expect("nested benchmarks");
    let legacy = BenchmarkTable::parse_legacy(
        &fs::read_to_string(fixtures_dir().join("legacy_benchmarks.json")).expect("read legacy"),
        "retail",
    )
    .expect("legacy benchmarks");

    for metric in [Metric::Ctr, Metric::Cpc, Metric::Cvr, Metric::Cpa, Metric::Roas] {
        let a = nested.get(metric, "email", "retail").expect("nested email");
        let b = legacy.get(metric, "email", "retail").expect("legacy email");
        assert!((a - b).abs() < 1e-12, "{metric}: {a} vs {b}");
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().expect("temp dir");
    let err = AnalysisConfig::from_file(&temp.path().join("absent.json"))
        .expect_err("absent file should fail");
    assert!(matches!(err, ValidationError::IoError(_)));
}

#[test]
fn test_load_config_without_path_uses_defaults() {
    let config = load_config(None).expect("defaults are valid");
    assert_eq!(config.fingerprint(), AnalysisConfig::default().fingerprint());
}

#[test]
fn test_load_config_reads_supplied_path() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("analysis.json");
    fs::copy(fixtures_dir().join("valid_config.json"), &path).expect("copy fixture");

    let config = load_config(Some(&path)).expect("load supplied config");
    assert_eq!(config.benchmark.industry, "retail");
}

#[test]
fn test_load_config_rejects_invalid_file() {
    let path = fixtures_dir().join("invalid_config_bad_confidence.json");
    let err = load_config(Some(&path)).expect_err("invalid config rejected");
    let engine: ig_common::Error = err.into();
    assert!(engine.is_fatal());
    assert_eq!(engine.code(), 11);
}

#[test]
fn test_load_config_missing_file_is_io_error() {
    let temp = TempDir::new().expect("temp dir");
    let err = load_config(Some(&temp.path().join("absent.json"))).expect_err("absent file");
    assert!(matches!(err, ValidationError::IoError(_)));
}

#[test]
fn test_presets_are_deterministic() {
    let first = get_preset(PresetName::Conservative);
    let second = get_preset(PresetName::Conservative);
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_ne!(
        first.fingerprint(),
        get_preset(PresetName::Default).fingerprint()
    );

    let presets = list_presets();
    assert!(presets
        .iter()
        .any(|p| p.name == PresetName::Conservative.as_str()));
}
