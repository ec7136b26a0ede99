//! CLI smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("pdfpress")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_config_show_prints_settings() {
    Command::cargo_bin("pdfpress")
        .unwrap()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ghostscript"))
        .stdout(predicate::str::contains("default_preset"));
}

#[test]
fn test_config_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    Command::cargo_bin("pdfpress")
        .unwrap()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("output_suffix"));
}

#[test]
fn test_compress_rejects_missing_input() {
    Command::cargo_bin("pdfpress")
        .unwrap()
        .args(["compress", "/nonexistent/input.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_compress_rejects_preset_with_target_size() {
    Command::cargo_bin("pdfpress")
        .unwrap()
        .args([
            "compress",
            "x.pdf",
            "--preset",
            "low",
            "--target-size",
            "100",
        ])
        .assert()
        .failure();
}

#[test]
fn test_compress_rejects_zero_target_size() {
    Command::cargo_bin("pdfpress")
        .unwrap()
        .args(["compress", "x.pdf", "--target-size", "0"])
        .assert()
        .failure();
}
