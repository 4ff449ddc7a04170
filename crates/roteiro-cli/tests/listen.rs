//! `roteiro listen` with a scripted recognizer command.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

fn seed(home: &TempDir, speech_command: &str) {
    fs::write(
        home.path().join("config.toml"),
        format!("[speech]\ncommand = {speech_command}\n"),
    )
    .unwrap();

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .arg("edit")
        .write_stdin("1 - praia\n")
        .assert()
        .success();
}

#[test]
fn test_listen_appends_recognized_lines() {
    let home = tempdir().unwrap();
    seed(
        &home,
        r#"["sh", "-c", "printf 'o sol\nnasce\n'", "sh"]"#,
    );

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .args(["listen", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("o sol"))
        .stdout(predicate::str::contains("nasce"));

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .args(["show", "scenes"])
        .assert()
        .success()
        .stdout("1 - praia o sol nasce");
}

#[test]
fn test_listen_receives_locale() {
    let home = tempdir().unwrap();
    seed(&home, r#"["sh", "-c", "echo \"$1\"", "sh"]"#);

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .args(["listen", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pt-BR"));
}

#[test]
fn test_listen_without_recognizer_reports_unavailable() {
    let home = tempdir().unwrap();
    seed(&home, "[]");

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .args(["listen", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Speech recognition is not available",
        ));

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .args(["show", "scenes"])
        .assert()
        .success()
        .stdout("1 - praia");
}

#[test]
fn test_listen_recognizer_failure_is_reported() {
    let home = tempdir().unwrap();
    seed(&home, r#"["sh", "-c", "echo 'no input device' >&2; exit 2", "sh"]"#);

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .args(["listen", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Could not capture speech"))
        .stderr(predicate::str::contains("no input device"));
}
