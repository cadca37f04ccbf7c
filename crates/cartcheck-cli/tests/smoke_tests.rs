//! Smoke tests for the cartcheck binary
//!
//! Everything here runs without a browser: `--driver mock` swaps in the
//! in-memory storefront.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the cartcheck binary with a clean environment
fn cartcheck() -> Command {
    let mut cmd = Command::cargo_bin("cartcheck").expect("cartcheck binary should exist");
    for var in [
        "CARTCHECK_BASE_URL",
        "CARTCHECK_HEADLESS",
        "CARTCHECK_CHROMIUM_PATH",
        "CARTCHECK_TIMEOUT_MS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    cartcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    cartcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    cartcheck().assert().failure();
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_text() {
    cartcheck()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity_and_value_addition"))
        .stdout(predicate::str::contains("estimate_shipping_and_taxes[product=4]"));
}

#[test]
fn test_list_json() {
    let output = cartcheck()
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 33);
}

#[test]
fn test_list_one_product() {
    let output = cartcheck()
        .args(["list", "-p", "2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // eight per-product scenarios plus the catalog scenario
    assert_eq!(json.as_array().unwrap().len(), 9);
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_defaults() {
    cartcheck()
        .args(["config", "--no-env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost/"))
        .stdout(predicate::str::contains("shipping_region_id"));
}

#[test]
fn test_config_env_override() {
    cartcheck()
        .arg("config")
        .env("CARTCHECK_BASE_URL", "https://shop.test")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://shop.test/"));
}

#[test]
fn test_config_file_errors_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.yaml");
    fs::write(&path, "base_url: [not, a, url]\n").unwrap();
    cartcheck()
        .args(["config", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_mock_suite() {
    cartcheck()
        .args(["run", "--driver", "mock", "--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains("PASSED 33 scenarios"));
}

#[test]
fn test_run_mock_json_report() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.json");
    let output = cartcheck()
        .args([
            "run",
            "--driver",
            "mock",
            "-s",
            "validate_quantity_restrictions",
            "--format",
            "json",
            "--report",
        ])
        .arg(&report)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout["results"].as_array().unwrap().len(), 4);
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(written["suite_name"], "storefront");
}

#[test]
fn test_run_rejects_unknown_product() {
    cartcheck()
        .args(["run", "--driver", "mock", "-p", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the catalog"));
}

#[test]
fn test_run_empty_selection() {
    cartcheck()
        .args(["run", "--driver", "mock", "--filter", "nothing_matches_this"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenario matches"));
}
