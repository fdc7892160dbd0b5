use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const EMPTY_METRICS_CONFIG: &str = r#"{
    "sourceAPIHost": "http://127.0.0.1:59998",
    "sourceAPIToken": "tok",
    "destinationAPIHost": "http://127.0.0.1:59998",
    "destinationAPIKey": "key",
    "updateDelay": 2000,
    "metrics": []
}"#;

fn statusfeed_cmd(config: &Path, pidfile: &Path, logfile: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("statusfeed"));
    cmd.args([
        "--config",
        &config.to_string_lossy(),
        "--pidfile",
        &pidfile.to_string_lossy(),
        "--logfile",
        &logfile.to_string_lossy(),
        "--screen",
    ]);
    cmd
}

#[test]
fn empty_metric_list_exits_cleanly() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("statusfeed.json");
    let pidfile = dir.path().join("statusfeed.pid");
    let logfile = dir.path().join("statusfeed.log");
    fs::write(&config, EMPTY_METRICS_CONFIG).unwrap();

    statusfeed_cmd(&config, &pidfile, &logfile)
        .assert()
        .success()
        .stderr(predicates::str::contains("nothing to do"));

    // The lock is released on the way out
    assert!(!pidfile.exists());
}

#[test]
fn held_lock_file_exits_with_code_1() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("statusfeed.json");
    let pidfile = dir.path().join("statusfeed.pid");
    let logfile = dir.path().join("statusfeed.log");
    fs::write(&config, EMPTY_METRICS_CONFIG).unwrap();
    fs::write(&pidfile, "12345").unwrap();

    statusfeed_cmd(&config, &pidfile, &logfile)
        .assert()
        .code(1)
        .stderr(predicates::str::contains("another instance"));

    // A lock this process did not create is never deleted
    assert_eq!(fs::read_to_string(&pidfile).unwrap(), "12345");
}

#[test]
fn missing_config_file_exits_with_code_2() {
    let dir = tempdir().unwrap();
    let pidfile = dir.path().join("statusfeed.pid");
    let logfile = dir.path().join("statusfeed.log");

    statusfeed_cmd(&dir.path().join("nonexistent.json"), &pidfile, &logfile)
        .assert()
        .code(2);

    assert!(!pidfile.exists());
}

#[test]
fn malformed_config_file_exits_with_code_2() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("statusfeed.json");
    let pidfile = dir.path().join("statusfeed.pid");
    let logfile = dir.path().join("statusfeed.log");
    fs::write(&config, "{ not json").unwrap();

    statusfeed_cmd(&config, &pidfile, &logfile)
        .assert()
        .code(2)
        .stderr(predicates::str::contains("failed to parse config file"));

    assert!(!pidfile.exists());
}

#[test]
fn small_update_delay_warns_at_startup() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("statusfeed.json");
    let pidfile = dir.path().join("statusfeed.pid");
    let logfile = dir.path().join("statusfeed.log");
    fs::write(
        &config,
        EMPTY_METRICS_CONFIG.replace("\"updateDelay\": 2000", "\"updateDelay\": 200"),
    )
    .unwrap();

    statusfeed_cmd(&config, &pidfile, &logfile)
        .assert()
        .success()
        .stderr(predicates::str::contains("minimum update frequency"));
}
