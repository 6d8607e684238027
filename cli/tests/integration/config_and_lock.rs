//! Binary-level behavior around config, the signal contract, and the lock.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use fs2::FileExt;
use predicates::prelude::*;
use tempfile::TempDir;

/// Container strategy with a docker binary that does not exist and a sun
/// API on a port nobody listens on.
fn container_config(dir: &Path, latitude: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let body = format!(
        "location:\n  latitude: {latitude}\n  longitude: 4.89\n  timezone: Europe/Amsterdam\n\
         strategy: container\n\
         sun_api:\n  url: http://127.0.0.1:9/json\n\
         app:\n  container: web\n  docker_bin: {}\n\
         lock_file: {}\n",
        dir.join("no-such-docker").display(),
        dir.join("cycle.lock").display(),
    );
    std::fs::write(&path, body).unwrap();
    path
}

fn lightcycle(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lightcycle"));
    cmd.env("NO_COLOR", "1")
        .env("HOME", home.path())
        .env_remove("LIGHTCYCLE_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_signal_without_config_prints_nothing_and_fails() {
    let home = TempDir::new().unwrap();
    lightcycle(&home)
        .arg("signal")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_signal_json_error_goes_to_stderr() {
    let home = TempDir::new().unwrap();
    let output = lightcycle(&home)
        .args(["signal", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let json_start = stderr.find('{').expect("JSON error object on stderr");
    let value: serde_json::Value = serde_json::from_str(&stderr[json_start..]).unwrap();
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "config");
}

#[test]
fn test_signal_rejects_out_of_range_latitude_without_fetching() {
    let home = TempDir::new().unwrap();
    let config = container_config(home.path(), "123.0");
    lightcycle(&home)
        .args(["signal", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("latitude 123"))
        .stderr(predicate::str::contains("cannot fetch").not());
}

#[test]
fn test_unreachable_sun_api_fails_plan() {
    let home = TempDir::new().unwrap();
    let config = container_config(home.path(), "52.37");
    lightcycle(&home)
        .env("LIGHTCYCLE_CONFIG", &config)
        .arg("plan")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot fetch sun times"));
}

#[test]
fn test_status_downgrades_missing_docker() {
    let home = TempDir::new().unwrap();
    let config = container_config(home.path(), "52.37");
    let output = lightcycle(&home)
        .args(["status", "--json", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["strategy"], "container");
    assert_eq!(value["observed"], "stopped");
    assert_eq!(value["infra"]["app_running"], false);
    assert!(String::from_utf8_lossy(&output.stderr).contains("[PROBE]"));
}

#[test]
fn test_vm_strategy_requires_vm_section() {
    let home = TempDir::new().unwrap();
    let config = container_config(home.path(), "52.37");
    let body = std::fs::read_to_string(&config)
        .unwrap()
        .replace("strategy: container\n", "");
    std::fs::write(&config, body).unwrap();
    lightcycle(&home)
        .args(["status", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("vm.directory"));
}

#[test]
fn test_cycle_refuses_to_run_while_locked() {
    let home = TempDir::new().unwrap();
    let config = container_config(home.path(), "52.37");
    let lock = std::fs::OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(home.path().join("cycle.lock"))
        .unwrap();
    lock.try_lock_exclusive().unwrap();

    lightcycle(&home)
        .args(["cycle", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("another decision cycle holds"))
        .stderr(predicate::str::contains("[FETCH]").not());

    FileExt::unlock(&lock).unwrap();
}

#[test]
fn test_log_file_receives_stage_tags() {
    let home = TempDir::new().unwrap();
    let config = container_config(home.path(), "52.37");
    let log = home.path().join("lightcycle.log");
    lightcycle(&home)
        .args(["status", "--config"])
        .arg(&config)
        .arg("--log-file")
        .arg(&log)
        .assert()
        .success();
    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("[CONFIG]"), "log: {text}");
    assert!(text.contains("[PROBE]"), "log: {text}");
}
