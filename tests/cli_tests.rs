//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with config and data isolated in a temporary home
fn voice_notes_bin(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("voice-notes").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("VOICE_NOTES_DATA_DIR");
    cmd
}

#[test]
fn help_output() {
    let home = tempfile::tempdir().unwrap();
    voice_notes_bin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice notes"))
        .stdout(predicate::str::contains("--data-dir"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    let home = tempfile::tempdir().unwrap();
    voice_notes_bin(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-notes"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn list_on_empty_data_dir() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    voice_notes_bin(&home)
        .arg("--data-dir")
        .arg(data.path())
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("No recordings"));
}

#[test]
fn list_prints_saved_recordings_and_filters() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    std::fs::write(
        data.path().join("VOICE_NOTES_DB.json"),
        r#"[
            {"id":"2","uri":"/n/2.wav","name":"Standup notes","date":"2024-01-16T09:00:00.000Z","durationMillis":65000},
            {"id":"1","uri":"/n/1.wav","name":"Groceries","date":"2024-01-15T10:30:00.000Z","durationMillis":125000}
        ]"#,
    )
    .unwrap();

    voice_notes_bin(&home)
        .env("NO_COLOR", "1")
        .arg("--data-dir")
        .arg(data.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Standup notes"))
        .stdout(predicate::str::contains("2. Groceries"))
        .stdout(predicate::str::contains("2:05"));

    voice_notes_bin(&home)
        .env("NO_COLOR", "1")
        .arg("--data-dir")
        .arg(data.path())
        .args(["list", "GROC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Standup").not());
}

#[test]
fn list_with_corrupted_store_is_empty() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    std::fs::write(data.path().join("VOICE_NOTES_DB.json"), "{oops").unwrap();

    voice_notes_bin(&home)
        .arg("--data-dir")
        .arg(data.path())
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("No recordings"));
}

#[test]
fn config_path_command() {
    let home = tempfile::tempdir().unwrap();
    voice_notes_bin(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-notes"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_then_get() {
    let home = tempfile::tempdir().unwrap();
    voice_notes_bin(&home)
        .args(["config", "set", "sample_rate", "48000"])
        .assert()
        .success();

    voice_notes_bin(&home)
        .args(["config", "get", "sample_rate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("48000"));
}

#[test]
fn config_help() {
    let home = tempfile::tempdir().unwrap();
    voice_notes_bin(&home)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    voice_notes_bin(&home)
        .arg("publish")
        .assert()
        .code(2);
}
