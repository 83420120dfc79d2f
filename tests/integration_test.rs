//! Integration tests for the qif-reader CLI.
//!
//! These tests run the actual binary over the fixtures in `tests/data`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given input file and return stdout
fn run_reader(input_file: &str) -> String {
    let mut cmd = Command::cargo_bin("qif-reader").unwrap();
    let assert = cmd.arg(input_file).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_sample_account_summary() {
    let output = run_reader(&test_data_path("sample.qif"));
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(
        lines,
        [
            "account,type,transactions,balance",
            ",,2,-820.63",
            "Joint Brokerage Account,Invst,2,11010.00",
            "Sample Checking Account,Bank,2,-35.50",
        ]
    );
}

#[test]
fn test_split_mismatch_reports_line() {
    let mut cmd = Command::cargo_bin("qif-reader").unwrap();
    cmd.arg(test_data_path("split_mismatch.qif"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("at line 7"));
}

#[test]
fn test_unsupported_section_error() {
    let mut cmd = Command::cargo_bin("qif-reader").unwrap();
    cmd.arg(test_data_path("unsupported.qif"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported token at line 1: !Type:Class"));
}

#[test]
fn test_empty_file_has_header_only() {
    let file = NamedTempFile::new().unwrap();
    let output = run_reader(file.path().to_str().unwrap());
    assert_eq!(output, "account,type,transactions,balance\n");
}

#[test]
fn test_invalid_amount_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "!Type:Bank").unwrap();
    writeln!(file, "Tten dollars").unwrap();
    writeln!(file, "^").unwrap();

    let mut cmd = Command::cargo_bin("qif-reader").unwrap();
    cmd.arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount at line 2"));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("qif-reader").unwrap();
    cmd.arg("nonexistent.qif")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("qif-reader").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}
