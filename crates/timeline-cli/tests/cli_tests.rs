//! Integration tests for the `timeline` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the ticks, layout,
//! conflicts, and render subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: path to the intervals.json fixture.
fn intervals_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/intervals.json")
}

/// Helper: path to the document.json fixture.
fn document_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/document.json")
}

/// Helper: path to the config.json fixture.
fn config_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/config.json")
}

/// Helper: run the binary and parse its stdout as JSON.
fn run_json(args: &[&str]) -> Value {
    let output = Command::cargo_bin("timeline")
        .unwrap()
        .args(args)
        .output()
        .expect("binary must run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// Ticks subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn month_ticks_for_a_quarter() {
    let ticks = run_json(&[
        "ticks",
        "--start",
        "2025-01-01",
        "--end",
        "2025-03-31",
        "--granularity",
        "month",
    ]);

    let dates: Vec<&str> = ticks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-01-01", "2025-02-01", "2025-03-01"]);
    assert_eq!(ticks[0]["label"], "Jan 2025");
}

#[test]
fn week_ticks_follow_week_start() {
    let ticks = run_json(&[
        "ticks",
        "--start",
        "2025-01-01",
        "--end",
        "2025-01-31",
        "--granularity",
        "week",
        "--week-start",
        "monday",
    ]);

    assert_eq!(ticks[0]["date"], "2024-12-30");
    assert_eq!(ticks.as_array().unwrap().len(), 5);
}

#[test]
fn ticks_accept_alternate_date_formats() {
    let ticks = run_json(&["ticks", "--start", "2025/01/01", "--end", "2025-01-03"]);
    assert_eq!(ticks.as_array().unwrap().len(), 3);
}

#[test]
fn ticks_reject_reversed_window() {
    Command::cargo_bin("timeline")
        .unwrap()
        .args(["ticks", "--start", "2025-03-01", "--end", "2025-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid window"));
}

#[test]
fn ticks_reject_unknown_granularity() {
    Command::cargo_bin("timeline")
        .unwrap()
        .args([
            "ticks",
            "--start",
            "2025-01-01",
            "--end",
            "2025-01-31",
            "--granularity",
            "fortnight",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --granularity"));
}

#[test]
fn ticks_reject_invalid_date() {
    Command::cargo_bin("timeline")
        .unwrap()
        .args(["ticks", "--start", "2025-02-30", "--end", "2025-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --start"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn layout_with_pixel_scale() {
    let bars = run_json(&[
        "layout",
        "-i",
        intervals_path(),
        "--start",
        "2025-01-01",
        "--end",
        "2025-03-31",
        "--px-per-day",
        "4",
    ]);

    assert_eq!(bars.as_array().unwrap().len(), 4);
    assert_eq!(bars[1]["interval_id"], "B");
    assert_eq!(bars[1]["left"], 16.0);
    assert_eq!(bars[1]["width"], 44.0);
}

#[test]
fn layout_from_stdin_in_percent_mode() {
    let input = r#"[{"id": "all", "start": "2025-01-01", "end": "2025-01-04"}]"#;

    let output = Command::cargo_bin("timeline")
        .unwrap()
        .args([
            "layout",
            "--start",
            "2025-01-01",
            "--end",
            "2025-01-04",
            "--percent",
        ])
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let bars: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(bars[0]["left"], 0.0);
    assert_eq!(bars[0]["width"], 100.0);
}

#[test]
fn layout_clamps_to_the_window() {
    let bars = run_json(&[
        "layout",
        "-i",
        intervals_path(),
        "--start",
        "2025-01-05",
        "--end",
        "2025-01-31",
        "--px-per-day",
        "10",
        "--clamp",
    ]);

    // A runs Jan 1-10: only Jan 5-10 is visible.
    assert_eq!(bars[0]["left"], 0.0);
    assert_eq!(bars[0]["width"], 60.0);
}

#[test]
fn layout_rejects_zero_px_per_day() {
    Command::cargo_bin("timeline")
        .unwrap()
        .args([
            "layout",
            "-i",
            intervals_path(),
            "--start",
            "2025-01-01",
            "--end",
            "2025-01-31",
            "--px-per-day",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --px-per-day"));
}

#[test]
fn layout_percent_and_px_per_day_conflict() {
    Command::cargo_bin("timeline")
        .unwrap()
        .args([
            "layout",
            "--start",
            "2025-01-01",
            "--end",
            "2025-01-31",
            "--px-per-day",
            "4",
            "--percent",
        ])
        .assert()
        .failure();
}

#[test]
fn layout_to_file() {
    let output_path = "/tmp/timeline-test-layout-output.json";
    let _ = std::fs::remove_file(output_path);

    Command::cargo_bin("timeline")
        .unwrap()
        .args([
            "layout",
            "-i",
            intervals_path(),
            "--start",
            "2025-01-01",
            "--end",
            "2025-03-31",
            "-o",
            output_path,
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    let bars: Value = serde_json::from_str(&content).unwrap();
    // Default scale is 30 px per day.
    assert_eq!(bars[0]["width"], 300.0);

    let _ = std::fs::remove_file(output_path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Conflicts subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_from_file() {
    let conflicts = run_json(&["conflicts", "-i", intervals_path()]);

    let list = conflicts.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["resource_id"], "ann");
    assert_eq!(list[0]["interval_a"], "A");
    assert_eq!(list[0]["interval_b"], "B");
    assert_eq!(list[0]["overlap_start"], "2025-01-05");
    assert_eq!(list[0]["overlap_end"], "2025-01-10");
    assert_eq!(list[0]["overlap_days"], 6);
}

#[test]
fn conflicts_from_stdin_skip_bad_records() {
    let input = r#"[
        {"id": "x", "start": "2025-01-01", "end": "2025-01-03", "resources": ["ann"]},
        {"id": "y", "start": "garbage", "end": "2025-01-03", "resources": ["ann"]}
    ]"#;

    Command::cargo_bin("timeline")
        .unwrap()
        .arg("conflicts")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn conflicts_reject_malformed_json() {
    Command::cargo_bin("timeline")
        .unwrap()
        .arg("conflicts")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse interval records"));
}

#[test]
fn conflicts_missing_input_file() {
    Command::cargo_bin("timeline")
        .unwrap()
        .args(["conflicts", "-i", "/nonexistent/intervals.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Render subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn render_document() {
    let view = run_json(&["render", "-i", document_path()]);

    assert_eq!(view["ticks"].as_array().unwrap().len(), 5);
    assert_eq!(view["ticks"][0]["instant"], "2024-12-30");
    assert_eq!(view["extent"], 310.0);
    assert_eq!(view["bars"].as_array().unwrap().len(), 2);
    assert_eq!(view["markers"].as_array().unwrap().len(), 2);
    assert_eq!(view["conflicts"].as_array().unwrap().len(), 1);
    assert_eq!(view["warnings"][0]["kind"], "invalid_date");
    assert_eq!(view["warnings"][0]["record_id"], "broken");
}

#[test]
fn render_with_config_file() {
    let view = run_json(&["render", "-i", document_path(), "--config", config_path()]);

    // Sunday-anchored weeks in percent mode.
    assert_eq!(view["ticks"][0]["instant"], "2024-12-29");
    assert_eq!(view["extent"], 100.0);
}

#[test]
fn render_with_granularity_override() {
    let view = run_json(&["render", "-i", document_path(), "--granularity", "month"]);

    assert_eq!(view["granularity"], "month");
    assert_eq!(view["ticks"].as_array().unwrap().len(), 1);
}

#[test]
fn render_rejects_bad_config_file() {
    let config = "/tmp/timeline-test-bad-config.json";
    std::fs::write(config, r#"{"scale": {"px_per_day": -1}}"#).unwrap();

    Command::cargo_bin("timeline")
        .unwrap()
        .args(["render", "-i", document_path(), "--config", config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));

    let _ = std::fs::remove_file(config);
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("timeline")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ticks"))
        .stdout(predicate::str::contains("layout"))
        .stdout(predicate::str::contains("conflicts"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn logs_go_to_stderr() {
    Command::cargo_bin("timeline")
        .unwrap()
        .args(["conflicts", "-i", intervals_path()])
        .env("RUST_LOG", "debug")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stderr(predicate::str::contains("conflict sweep complete"));
}
