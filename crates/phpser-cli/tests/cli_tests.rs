//! Integration tests for the `phpser` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the serialize,
//! unserialize and inspect subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, decoder flags and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn sample_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.json")
}

fn session_ser_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/session.ser")
}

/// Helper: a per-test scratch file path under the system temp dir.
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("phpser-cli-{}-{}", std::process::id(), name))
}

fn phpser() -> Command {
    Command::cargo_bin("phpser").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// serialize
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn serialize_stdin_to_stdout() {
    phpser()
        .arg("serialize")
        .write_stdin(r#"{"a":1,"b":[1,2]}"#)
        .assert()
        .success()
        .stdout(r#"a:2:{s:1:"a";i:1;s:1:"b";a:2:{i:0;i:1;i:1;i:2;}}"#);
}

#[test]
fn serialize_scalars() {
    phpser()
        .arg("serialize")
        .write_stdin("null")
        .assert()
        .success()
        .stdout("N;");
    phpser()
        .arg("serialize")
        .write_stdin(r#""hi""#)
        .assert()
        .success()
        .stdout(r#"s:2:"hi";"#);
}

#[test]
fn serialize_file_to_file() {
    let output_path = temp_path("serialize.ser");
    let _ = std::fs::remove_file(&output_path);

    phpser()
        .args(["serialize", "-i", sample_json_path(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert!(content.starts_with("a:6:{s:4:\"name\";s:5:\"Alice\";"));
    assert!(content.contains(r#"s:6:"scores";a:3:{i:0;i:95;i:1;i:87;i:2;i:92;}"#));

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn serialize_invalid_json_fails() {
    phpser()
        .arg("serialize")
        .write_stdin("this is not json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON input"));
}

#[test]
fn serialize_missing_file_fails() {
    phpser()
        .args(["serialize", "-i", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// unserialize
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unserialize_stdin_compact() {
    phpser()
        .args(["unserialize", "--compact"])
        .write_stdin(r#"a:2:{s:1:"a";i:1;s:1:"b";a:2:{i:0;i:1;i:1;i:2;}}"#)
        .assert()
        .success()
        .stdout(r#"{"a":1,"b":[1,2]}"#);
}

#[test]
fn unserialize_pretty_by_default() {
    let output = phpser()
        .arg("unserialize")
        .write_stdin("a:1:{s:1:\"k\";b:1;}\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "{\n  \"k\": true\n}");
}

#[test]
fn unserialize_file_with_object() {
    let output = phpser()
        .args(["unserialize", "--compact", "-i", session_ser_path()])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "user": {"id": 7, "email": "ada@php.net"},
            "cart": ["apple", "pear"],
            "token": null
        })
    );
}

#[test]
fn unserialize_length_mismatch_fails() {
    phpser()
        .arg("unserialize")
        .write_stdin(r#"s:5:"hi";"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to unserialize input"))
        .stderr(predicate::str::contains("byte 2"));
}

#[test]
fn unserialize_trailing_data_needs_flag() {
    phpser()
        .args(["unserialize", "--compact"])
        .write_stdin("i:1;i:2;")
        .assert()
        .failure();
    phpser()
        .args(["--allow-trailing", "unserialize", "--compact"])
        .write_stdin("i:1;i:2;")
        .assert()
        .success()
        .stdout("1");
}

#[test]
fn unserialize_respects_max_depth() {
    phpser()
        .args(["unserialize", "--max-depth", "1"])
        .write_stdin("a:1:{i:0;a:0:{}}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("depth"));
}

#[test]
fn unserialize_no_references_flag() {
    let input = r#"a:2:{i:0;s:1:"x";i:1;r:2;}"#;
    phpser()
        .args(["unserialize", "--compact"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(r#"["x","x"]"#);
    phpser()
        .args(["unserialize", "--no-references"])
        .write_stdin(input)
        .assert()
        .failure();
}

#[test]
fn unserialize_reference_budget_flag() {
    let input = r#"a:3:{i:0;a:0:{}i:1;a:2:{i:0;r:2;i:1;r:2;}i:2;a:2:{i:0;r:3;i:1;r:3;}}"#;
    phpser()
        .args(["unserialize", "--compact"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("[[],[[],[]],[[[],[]],[[],[]]]]");
    phpser()
        .args(["unserialize", "--max-reference-nodes", "3"])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("back references would copy more than 3 values"));
}

#[test]
fn unserialize_infinity_cannot_become_json() {
    phpser()
        .arg("unserialize")
        .write_stdin("d:INF;")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to convert value to JSON"));
}

// ─────────────────────────────────────────────────────────────────────────────
// inspect
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn inspect_session_fixture() {
    phpser()
        .args(["inspect", "-i", session_ser_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Type:       array"))
        .stdout(predicate::str::contains("Entries:    3"))
        .stdout(predicate::str::contains("Values:     8"))
        .stdout(predicate::str::contains("Depth:      2"));
}

#[test]
fn inspect_object_reports_class() {
    phpser()
        .arg("inspect")
        .write_stdin(r#"O:8:"stdClass":0:{}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Class:      stdClass"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Roundtrip, help, logging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_serialize_unserialize_pipeline() {
    let original = std::fs::read_to_string(sample_json_path()).unwrap();
    let ser = phpser()
        .args(["serialize", "-i", sample_json_path()])
        .output()
        .unwrap();
    assert!(ser.status.success());

    let back = phpser()
        .args(["unserialize", "--compact"])
        .write_stdin(ser.stdout)
        .output()
        .unwrap();
    assert!(back.status.success());

    let a: serde_json::Value = serde_json::from_str(&original).unwrap();
    let b: serde_json::Value = serde_json::from_slice(&back.stdout).unwrap();
    assert_eq!(a, b);
}

#[test]
fn help_flag_shows_usage() {
    phpser()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serialize"))
        .stdout(predicate::str::contains("unserialize"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn missing_subcommand_fails() {
    phpser().assert().failure();
}

#[test]
fn unknown_subcommand_fails() {
    phpser().arg("frobnicate").assert().failure();
}

#[test]
fn debug_logs_go_to_stderr_as_json() {
    phpser()
        .args(["--log-format", "json", "unserialize"])
        .env("RUST_LOG", "phpser_core=debug")
        .write_stdin("x;")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rejected PHP serialized input"))
        .stderr(predicate::str::contains("\"level\":\"DEBUG\""));
}
