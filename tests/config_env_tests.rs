// Configuration layering against the real process environment
//
// These tests mutate process-wide environment variables, so every one of
// them runs serially.

mod common;

use assert_cmd::Command;
use common::{Fixture, JSONB_1K, REL_1K};
use ledgerbench::config::{AnalysisConfig, ConfigLayer, ENV_ALPHA, ENV_DELTA, ENV_RESULTS};
use ledgerbench::distribution::PValueMethod;
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use std::path::PathBuf;

fn clear_env() {
    std::env::remove_var(ENV_DELTA);
    std::env::remove_var(ENV_ALPHA);
    std::env::remove_var(ENV_RESULTS);
}

#[test]
#[serial]
fn test_from_env_reads_all_variables() {
    clear_env();
    std::env::set_var(ENV_DELTA, "0.3");
    std::env::set_var(ENV_ALPHA, " 0.01 ");
    std::env::set_var(ENV_RESULTS, "/data/bench.csv");

    let layer = ConfigLayer::from_env().unwrap();
    clear_env();

    assert_eq!(layer.delta, Some(0.3));
    assert_eq!(layer.alpha, Some(0.01));
    assert_eq!(layer.results, Some(PathBuf::from("/data/bench.csv")));
    assert_eq!(layer.label_a, None);
}

#[test]
#[serial]
fn test_from_env_ignores_empty_values() {
    clear_env();
    std::env::set_var(ENV_DELTA, "");
    std::env::set_var(ENV_RESULTS, "  ");

    let layer = ConfigLayer::from_env().unwrap();
    clear_env();

    assert_eq!(layer, ConfigLayer::default());
}

#[test]
#[serial]
fn test_from_env_rejects_non_numbers() {
    clear_env();
    std::env::set_var(ENV_DELTA, "twenty percent");

    let err = ConfigLayer::from_env().unwrap_err();
    clear_env();

    assert!(err.to_string().contains(ENV_DELTA));
}

#[test]
#[serial]
fn test_resolve_precedence_file_env_cli() {
    clear_env();
    let fixture = Fixture::new();
    let config_path = fixture.path("ledgerbench.toml");
    fs::write(
        &config_path,
        "delta = 0.25\nalpha = 0.01\nlabel_a = \"from file\"\np_value_method = \"normal\"\n",
    )
    .unwrap();

    std::env::set_var(ENV_ALPHA, "0.1");
    let env = ConfigLayer::from_env().unwrap();
    clear_env();

    let cli = ConfigLayer {
        label_a: Some("from cli".to_string()),
        ..Default::default()
    };
    let config = AnalysisConfig::resolve(Some(&config_path), &env, &cli).unwrap();

    assert_eq!(config.superiority.delta, 0.25);
    assert_eq!(config.superiority.alpha, 0.1);
    assert_eq!(config.label_a.as_deref(), Some("from cli"));
    assert_eq!(config.p_value_method, Some(PValueMethod::Normal));
}

#[test]
#[serial]
fn test_results_path_from_env_only() {
    clear_env();
    let fixture = Fixture::new();

    let mut cmd = Command::cargo_bin("ledgerbench").unwrap();
    cmd.env(ENV_RESULTS, &fixture.results)
        .env_remove(ENV_DELTA)
        .env_remove(ENV_ALPHA)
        .arg("superiority")
        .arg("-a")
        .arg(REL_1K)
        .arg("-b")
        .arg(JSONB_1K)
        .arg("--format")
        .arg("csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("__OVERALL__"));
}

#[test]
#[serial]
fn test_missing_results_names_every_source() {
    clear_env();
    let mut cmd = Command::cargo_bin("ledgerbench").unwrap();
    cmd.env_remove(ENV_RESULTS).arg("compare");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--results"))
        .stderr(predicate::str::contains(ENV_RESULTS));
}

#[test]
#[serial]
fn test_env_delta_validated_after_merge() {
    clear_env();
    let fixture = Fixture::new();

    let mut cmd = Command::cargo_bin("ledgerbench").unwrap();
    cmd.env(ENV_DELTA, "0")
        .arg("superiority")
        .arg("--results")
        .arg(&fixture.results)
        .arg("-a")
        .arg(REL_1K)
        .arg("-b")
        .arg(JSONB_1K);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("delta must be in (0, 1)"));
}

#[test]
#[serial]
fn test_unknown_config_key_rejected() {
    clear_env();
    let fixture = Fixture::new();
    let config_path = fixture.path("ledgerbench.toml");
    fs::write(&config_path, "delta = 0.2\nconfidence = 0.95\n").unwrap();

    let mut cmd = Command::cargo_bin("ledgerbench").unwrap();
    cmd.env_remove(ENV_RESULTS)
        .arg("compare")
        .arg("--results")
        .arg(&fixture.results)
        .arg("--config")
        .arg(&config_path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration file"))
        .stderr(predicate::str::contains("confidence"));
}
