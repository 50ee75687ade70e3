//! End-to-end tests running the compiled binary.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_version_runs() {
    let mut cmd = Command::cargo_bin("exprlint-bin").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("exprlint"));
}

#[test]
fn test_lint_run_reports_summary() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("rules.expr");
    fs::write(&file, "x > 5\n").unwrap();

    let mut cmd = Command::cargo_bin("exprlint-bin").unwrap();
    cmd.arg(file.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Expression Lint Results"))
        .stdout(predicate::str::contains("findings"));
}

#[test]
fn test_fail_on_findings_exit_code() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("rules.expr");
    fs::write(&file, "x > 5\n").unwrap();

    let mut cmd = Command::cargo_bin("exprlint-bin").unwrap();
    cmd.args([file.to_str().unwrap(), "--fail-on-findings"])
        .assert()
        .code(1);
}
