//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the available,
//! check, open and hours subcommands through the actual binary, including
//! config files, environment overrides and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: the binary with the user's own config directory hidden.
fn slots() -> Command {
    let mut cmd = Command::cargo_bin("slots").unwrap();
    cmd.env("XDG_CONFIG_HOME", "/nonexistent/slots-test-config")
        .env_remove("SLOTS_SLOT_GRANULARITY_MINUTES")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper: a TOML config file with Saturday-only hours.
fn saturday_only_config() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(
        br#"
slot_granularity_minutes = 60

[saturday]
open = [{ start = "09:00", end = "12:00" }]
"#,
    )
    .unwrap();
    file
}

fn stdout_lines(output: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(output)
        .lines()
        .map(str::to_string)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// available
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn available_lists_one_time_per_line() {
    let output = slots()
        .args([
            "available",
            "--date",
            "2025-10-27",
            "--duration",
            "30",
            "--booking",
            "10:00/60",
            "--booking",
            "14:30/30",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let lines = stdout_lines(&output.stdout);
    assert_eq!(lines.len(), 17);
    assert_eq!(lines[0], "08:00");
    assert!(lines.contains(&"11:30".to_string()));
    assert!(!lines.contains(&"10:00".to_string()));
    assert!(!lines.contains(&"14:30".to_string()));
}

#[test]
fn available_json_matches_response_shape() {
    let output = slots()
        .args(["available", "--date", "2025-10-25", "--duration", "30", "--json"])
        .args(["--booking", "09:00/60"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let slots = value["available_slots"].as_array().unwrap();
    assert_eq!(slots.len(), 14);
    assert_eq!(slots[0], "08:00");
    assert_eq!(slots[2], "10:00");
}

#[test]
fn available_on_sunday_prints_nothing() {
    slots()
        .args(["available", "--date", "2025-10-26", "--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn available_rejects_bad_date() {
    slots()
        .args(["available", "--date", "2025/10/27", "--duration", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn available_rejects_zero_duration() {
    slots()
        .args(["available", "--date", "2025-10-27", "--duration", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive"));
}

#[test]
fn available_rejects_malformed_booking() {
    slots()
        .args(["available", "--date", "2025-10-27", "--duration", "30"])
        .args(["--booking", "10:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HH:MM/MINUTES"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_slot_before_lunch_is_available() {
    slots()
        .args(["check", "--date", "2025-10-27", "--time", "11:30", "--duration", "30"])
        .args(["--booking", "11:00/30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("available"));
}

#[test]
fn check_booked_slot_fails() {
    slots()
        .args(["check", "--date", "2025-10-27", "--time", "11:00", "--duration", "30"])
        .args(["--booking", "11:00/30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no longer available"));
}

#[test]
fn check_rejects_bad_time() {
    slots()
        .args(["check", "--date", "2025-10-27", "--time", "eleven", "--duration", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time"));
}

// ─────────────────────────────────────────────────────────────────────────────
// open
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn open_reports_business_hours() {
    slots()
        .args(["open", "--at", "2025-10-27T09:15"])
        .assert()
        .success()
        .stdout("open\n");

    slots()
        .args(["open", "--at", "2025-10-27T12:30"])
        .assert()
        .success()
        .stdout("closed\n");

    slots()
        .args(["open", "--at", "2025-10-26T10:00"])
        .assert()
        .success()
        .stdout("closed\n");
}

#[test]
fn open_rejects_bad_instant() {
    slots()
        .args(["open", "--at", "monday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DDTHH:MM"));
}

// ─────────────────────────────────────────────────────────────────────────────
// hours + configuration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hours_shows_builtin_table() {
    slots()
        .arg("hours")
        .assert()
        .success()
        .stdout(predicate::str::contains("Slot granularity: 30 minutes"))
        .stdout(predicate::str::contains(
            "Mon  08:00-12:00, 13:00-19:00 (break 12:00-13:00)",
        ))
        .stdout(predicate::str::contains("Sat  08:00-16:00\n"))
        .stdout(predicate::str::contains("Sun  closed"));
}

#[test]
fn hours_json_is_valid() {
    let output = slots().args(["hours", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["slot_granularity_minutes"], 30);
    assert_eq!(value["monday"]["open"][0]["start"], "08:00");
    assert_eq!(value["sunday"]["open"].as_array().unwrap().len(), 0);
}

#[test]
fn config_file_replaces_schedule() {
    let config = saturday_only_config();
    let path = config.path().to_str().unwrap();

    let output = slots()
        .args(["--config", path, "available", "--date", "2025-10-25", "--duration", "60"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output.stdout), vec!["09:00", "10:00", "11:00"]);

    slots()
        .args(["--config", path, "available", "--date", "2025-10-27", "--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn env_overrides_granularity() {
    let output = slots()
        .env("SLOTS_SLOT_GRANULARITY_MINUTES", "15")
        .args(["available", "--date", "2025-10-25", "--duration", "30"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let lines = stdout_lines(&output.stdout);
    assert_eq!(lines.len(), 31);
    assert_eq!(lines[1], "08:15");
}

#[test]
fn missing_config_file_fails() {
    slots()
        .args(["--config", "/nonexistent/slots.toml", "hours"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn invalid_config_file_fails() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(b"slot_granularity_minutes = 0\n").unwrap();

    slots()
        .args(["--config", file.path().to_str().unwrap(), "hours"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid business hours"));
}

#[test]
fn verbose_logs_to_stderr_only() {
    slots()
        .args(["-v", "available", "--date", "2025-10-26", "--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("closed day"));
}

#[test]
fn no_subcommand_shows_usage() {
    slots()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
