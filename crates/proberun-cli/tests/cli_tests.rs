//! CLI integration tests
//!
//! Exercises the binary end to end: help text, empty directories,
//! unloadable module files, and exit codes.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn proberun_cmd() -> Command {
    Command::cargo_bin("proberun").unwrap()
}

#[test]
fn help_shows_usage_and_examples() {
    let mut cmd = proberun_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXAMPLES"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--no-color"))
        .stdout(predicate::str::contains("NO_COLOR"));
}

#[test]
fn version_flag_works() {
    let mut cmd = proberun_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("proberun"));
}

#[test]
fn empty_directory_reports_zero_attempted_and_exits_clean() {
    let dir = tempdir().unwrap();

    let mut cmd = proberun_cmd();
    cmd.arg(dir.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("No probe modules found."))
        .stdout(predicate::str::contains("0 attempted, 0 passed, 0 failed"));

    assert!(!dir.path().join("test.log").exists());
}

#[test]
fn unloadable_module_file_is_reported_but_not_fatal() {
    let dir = tempdir().unwrap();
    let bogus = dir
        .path()
        .join(format!("bogus.{}", std::env::consts::DLL_EXTENSION));
    fs::write(&bogus, b"definitely not a shared object").unwrap();

    let mut cmd = proberun_cmd();
    cmd.arg(dir.path())
        .arg("--no-color")
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to load module files:"))
        .stderr(predicate::str::contains("bogus"))
        .stdout(predicate::str::contains("0 attempted, 0 passed, 0 failed"));
}

#[test]
fn non_module_files_are_ignored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"nothing to see").unwrap();

    let mut cmd = proberun_cmd();
    cmd.arg(dir.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("No probe modules found."));
}

#[test]
fn missing_directory_is_reported_not_silently_empty() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("never-created");

    // A typo'd directory must be distinguishable from a clean zero-probe
    // run: the enumeration failure shows up in the error block.
    let mut cmd = proberun_cmd();
    cmd.arg(&missing)
        .arg("--no-color")
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to load module files:"))
        .stderr(predicate::str::contains("never-created"))
        .stdout(predicate::str::contains("0 attempted, 0 passed, 0 failed"));
}
