//! Integration tests for the `periods` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the query, relate,
//! and ago subcommands through the actual binary, including stdin/stdout piping,
//! file I/O, and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the day.json fixture.
fn day_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/day.json")
}

/// Helper: path to the strings_pl.json fixture.
fn strings_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/strings_pl.json")
}

/// Helper: run `periods query -i day.json <args>` and return the start times
/// of the resulting periods, in output order.
fn query_starts(args: &[&str]) -> Vec<String> {
    let output = Command::cargo_bin("periods")
        .unwrap()
        .args(["query", "-i", day_json_path()])
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "query {:?} failed", args);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["periods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["start"].as_str().unwrap().to_string())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Query subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn query_at_instant() {
    assert_eq!(
        query_starts(&["--at", "2026-03-01T11:00:00Z"]),
        vec!["2026-03-01T10:00:00Z", "2026-03-01T09:00:00Z"]
    );
}

#[test]
fn query_at_boundary_is_closed() {
    assert_eq!(
        query_starts(&["--at", "2026-03-01T12:00:00Z"]),
        vec![
            "2026-03-01T10:00:00Z",
            "2026-03-01T09:00:00Z",
            "2026-03-01T12:00:00Z"
        ]
    );
}

#[test]
fn query_inside() {
    assert_eq!(
        query_starts(&["--inside", "2026-03-01T09:00:00Z", "2026-03-01T13:00:00Z"]),
        vec!["2026-03-01T10:00:00Z", "2026-03-01T09:00:00Z"]
    );
}

#[test]
fn query_overlaps_excludes_touching() {
    assert_eq!(
        query_starts(&["--overlaps", "2026-03-01T12:00:00Z", "2026-03-01T14:00:00Z"]),
        vec![
            "2026-03-01T13:00:00Z",
            "2026-03-01T09:00:00Z",
            "2026-03-01T12:00:00Z"
        ]
    );
}

#[test]
fn query_intersects_includes_touching() {
    assert_eq!(
        query_starts(&["--intersects", "2026-03-01T14:00:00Z", "2026-03-01T15:00:00Z"]),
        vec!["2026-03-01T13:00:00Z", "2026-03-01T12:00:00Z"]
    );
}

#[test]
fn query_sort_by_duration_descending() {
    let starts = query_starts(&["--sort", "duration", "--desc"]);
    assert_eq!(starts.len(), 4);
    assert_eq!(starts[0], "2026-03-01T09:00:00Z", "4h period first");
    assert_eq!(starts[3], "2026-03-01T13:00:00Z", "1h period last");
}

#[test]
fn query_sort_by_start() {
    assert_eq!(
        query_starts(&["--sort", "start"]),
        vec![
            "2026-03-01T09:00:00Z",
            "2026-03-01T10:00:00Z",
            "2026-03-01T12:00:00Z",
            "2026-03-01T13:00:00Z"
        ]
    );
}

#[test]
fn query_stdin_to_stdout() {
    let input = std::fs::read_to_string(day_json_path()).expect("day.json fixture must exist");

    Command::cargo_bin("periods")
        .unwrap()
        .args(["query", "--at", "2026-03-01T13:30:00Z"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"timezone\": \"UTC\""))
        .stdout(predicate::str::contains("2026-03-01T13:00:00Z"))
        .stdout(predicate::str::contains("2026-03-01T10:00:00Z").not());
}

#[test]
fn query_file_to_file() {
    let output_path = std::env::temp_dir().join("periods-test-query-output.json");
    let _ = std::fs::remove_file(&output_path);

    Command::cargo_bin("periods")
        .unwrap()
        .args(["query", "-i", day_json_path(), "-o"])
        .arg(&output_path)
        .args(["--inside", "2026-03-01T12:00:00Z", "2026-03-01T14:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&output_path).expect("output file must exist");
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["periods"].as_array().unwrap().len(), 2);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn query_rejects_two_filters() {
    Command::cargo_bin("periods")
        .unwrap()
        .args(["query", "-i", day_json_path()])
        .args(["--at", "2026-03-01T11:00:00Z"])
        .args(["--inside", "2026-03-01T09:00:00Z", "2026-03-01T13:00:00Z"])
        .assert()
        .failure();
}

#[test]
fn query_rejects_desc_without_sort() {
    Command::cargo_bin("periods")
        .unwrap()
        .args(["query", "-i", day_json_path(), "--desc"])
        .assert()
        .failure();
}

#[test]
fn query_rejects_bad_timestamp() {
    Command::cargo_bin("periods")
        .unwrap()
        .args(["query", "-i", day_json_path(), "--at", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RFC 3339"));
}

#[test]
fn query_rejects_inverted_period_in_input() {
    let input = r#"{"timezone":"UTC","periods":[{"start":"2026-03-01T12:00:00Z","end":"2026-03-01T10:00:00Z"}]}"#;

    Command::cargo_bin("periods")
        .unwrap()
        .arg("query")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse period collection"));
}

#[test]
fn query_rejects_inverted_reference_period() {
    Command::cargo_bin("periods")
        .unwrap()
        .args(["query", "-i", day_json_path()])
        .args(["--inside", "2026-03-01T13:00:00Z", "2026-03-01T09:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid reference period"));
}

#[test]
fn query_missing_file() {
    Command::cargo_bin("periods")
        .unwrap()
        .args(["query", "-i", "/nonexistent/day.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Relate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn relate_touching_periods() {
    Command::cargo_bin("periods")
        .unwrap()
        .args([
            "relate",
            "2026-03-01T10:00:00Z",
            "2026-03-01T12:00:00Z",
            "2026-03-01T12:00:00Z",
            "2026-03-01T14:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("relation: end_touching"))
        .stdout(predicate::str::contains("intersects: true"))
        .stdout(predicate::str::contains("overlaps_with: false"))
        .stdout(predicate::str::contains("gap_seconds").not());
}

#[test]
fn relate_disjoint_periods_reports_gap() {
    Command::cargo_bin("periods")
        .unwrap()
        .args([
            "relate",
            "2026-03-01T10:00:00Z",
            "2026-03-01T11:00:00Z",
            "2026-03-01T12:00:00Z",
            "2026-03-01T14:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("relation: before"))
        .stdout(predicate::str::contains("gap_seconds: 3600"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Ago subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn ago_english_hours() {
    Command::cargo_bin("periods")
        .unwrap()
        .args([
            "ago",
            "2026-03-15T09:00:00Z",
            "--now",
            "2026-03-15T12:00:00Z",
            "--tz",
            "UTC",
        ])
        .assert()
        .success()
        .stdout("3 hours ago\n");
}

#[test]
fn ago_short_format() {
    Command::cargo_bin("periods")
        .unwrap()
        .args([
            "ago",
            "2026-03-12T12:00:00Z",
            "--now",
            "2026-03-15T12:00:00Z",
            "--tz",
            "UTC",
            "--format",
            "short",
        ])
        .assert()
        .success()
        .stdout("3d\n");
}

#[test]
fn ago_with_translation_table() {
    Command::cargo_bin("periods")
        .unwrap()
        .args([
            "ago",
            "2026-03-14T10:00:00Z",
            "--now",
            "2026-03-15T12:00:00Z",
            "--tz",
            "UTC",
            "--strings",
            strings_path(),
        ])
        .assert()
        .success()
        .stdout("Wczoraj\n");
}

#[test]
fn ago_missing_translation_fails() {
    Command::cargo_bin("periods")
        .unwrap()
        .args([
            "ago",
            "2026-03-15T11:00:00Z",
            "--now",
            "2026-03-15T12:00:00Z",
            "--tz",
            "UTC",
            "--strings",
            strings_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing translation"));
}

#[test]
fn ago_rejects_unknown_timezone() {
    Command::cargo_bin("periods")
        .unwrap()
        .args(["ago", "2026-03-15T11:00:00Z", "--tz", "Mars/Olympus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    Command::cargo_bin("periods")
        .unwrap()
        .args(["-v", "query", "-i", day_json_path(), "--at", "2026-03-01T11:00:00Z"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded 4 periods in UTC"));
}
