//! Error scenario integration tests

use std::process::Command;

fn voice_notes_bin(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_voice-notes"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"));
    cmd
}

#[test]
fn config_get_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let output = voice_notes_bin(home.path())
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown key") && stderr.contains("sample_rate"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let output = voice_notes_bin(home.path())
        .args(["config", "set", "api_key", "value"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown key"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_sample_rate() {
    let home = tempfile::tempdir().unwrap();
    let output = voice_notes_bin(home.path())
        .args(["config", "set", "sample_rate", "1000000"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("8000") && stderr.contains("192000"),
        "Expected error about sample rate bounds, got: {}",
        stderr
    );
}

#[test]
fn config_set_blank_data_dir() {
    let home = tempfile::tempdir().unwrap();
    let output = voice_notes_bin(home.path())
        .args(["config", "set", "data_dir", "  "])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("data_dir"), "got: {}", stderr);
}

#[test]
fn config_init_twice_fails() {
    let home = tempfile::tempdir().unwrap();
    let first = voice_notes_bin(home.path())
        .args(["config", "init"])
        .output()
        .expect("Failed to execute command");
    assert!(first.status.success());

    let second = voice_notes_bin(home.path())
        .args(["config", "init"])
        .output()
        .expect("Failed to execute command");
    assert!(!second.status.success());
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(stderr.contains("already exists"), "got: {}", stderr);
}

#[test]
fn config_list_with_no_file() {
    let home = tempfile::tempdir().unwrap();
    let output = voice_notes_bin(home.path())
        .args(["config", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("not set") && stdout.contains("sample_rate"),
        "Expected config list output, got: {}",
        stdout
    );
}
