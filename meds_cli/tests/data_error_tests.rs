//! Malformed and low-quality data handling for the adhd-meds binary.
//!
//! These tests verify the CLI:
//! - Names the file when a record cannot be parsed
//! - Rejects duplicate drug ids
//! - Reports data-quality problems without changing lookups

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("adhd-meds"));
    cmd.env("XDG_CONFIG_HOME", home.path())
        .arg("--data-dir")
        .arg(home.path().join("data"));
    cmd
}

fn write_record(home: &TempDir, name: &str, contents: &str) {
    let dir = home.path().join("data").join("drugs");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_malformed_record_names_file() {
    let home = TempDir::new().unwrap();
    write_record(&home, "broken.yaml", "id: [oops\n");

    cli(&home)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.yaml"));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let home = TempDir::new().unwrap();
    let record = "id: same\ndrugClass: stimulant\ncategory: x\n";
    write_record(&home, "a.yaml", record);
    write_record(&home, "b.yaml", record);

    cli(&home)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("same"));
}

#[test]
fn test_missing_data_directory_fails() {
    let home = TempDir::new().unwrap();
    cli(&home).arg("list").assert().failure();
}

#[test]
fn test_validate_reports_duplicate_rules() {
    let home = TempDir::new().unwrap();
    write_record(
        &home,
        "dup.yaml",
        r#"
id: dup-rules
drugClass: stimulant
category: amphetamine
controlledSubstance: true
travelRules:
  crossBorderRules:
    - {fromRegion: US, toRegion: CN, status: allowed}
    - {fromRegion: US, toRegion: CN, status: prohibited}
"#,
    );

    cli(&home)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate cross-border rule US -> CN"));

    // First authored rule still decides the lookup
    cli(&home)
        .args(["travel", "dup-rules", "--from", "US", "--to", "CN", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"allowed\""));
}

#[test]
fn test_unrecognized_class_still_loads() {
    let home = TempDir::new().unwrap();
    write_record(
        &home,
        "odd.yaml",
        "id: odd-one\ndrugClass: experimental\ncategory: x\n",
    );

    cli(&home)
        .args(["list", "--class", "experimental"])
        .assert()
        .success()
        .stdout(predicate::str::contains("odd-one"));

    cli(&home)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized drug class 'experimental'"));
}
