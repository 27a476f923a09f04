//! Integration tests for the `metro-sim` binary.
//!
//! Nothing here opens an audio device.

use std::process::Command;
use tempfile::TempDir;

fn metro_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_metro-sim"));
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Empty config file so the user's own config never leaks into a test.
fn empty_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();
    path
}

fn plan_stdout(seed: &str, config: &std::path::Path) -> String {
    let output = metro_bin()
        .args(["plan", "--minutes", "3", "--seed", seed, "--config"])
        .arg(config)
        .output()
        .expect("failed to run metro-sim plan");
    assert!(output.status.success(), "metro-sim plan failed");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ---------------------------------------------------------------------------
// `metro-sim plan`
// ---------------------------------------------------------------------------

#[test]
fn cli_plan_is_deterministic_for_a_seed() {
    let dir = TempDir::new().unwrap();
    let config = empty_config(&dir);

    let a = plan_stdout("42", &config);
    let b = plan_stdout("42", &config);
    assert_eq!(a, b);
    assert!(a.contains("seed 42"));
    assert!(a.contains("door_sequence"));
    assert!(a.contains("acceleration"));
}

#[test]
fn cli_plan_differs_between_seeds() {
    let dir = TempDir::new().unwrap();
    let config = empty_config(&dir);
    assert_ne!(plan_stdout("1", &config), plan_stdout("2", &config));
}

#[test]
fn cli_plan_uses_the_config_seed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seeded.toml");
    std::fs::write(&path, "[journey]\nseed = 77\nminutes = 1.0\n").unwrap();

    let output = metro_bin()
        .args(["plan", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("seed 77, 1 minute(s)"), "{stdout}");
}

// ---------------------------------------------------------------------------
// Failures before any audio is touched
// ---------------------------------------------------------------------------

#[test]
fn cli_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[output]\ncrossfade_ms = 500.0\n").unwrap();

    let output = metro_bin()
        .args(["run", "--minutes", "1", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("output.crossfade_ms"), "{stderr}");
}

#[test]
fn cli_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    let output = metro_bin()
        .args(["plan", "--config"])
        .arg(dir.path().join("nope.toml"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_rejects_non_positive_minutes() {
    let output = metro_bin()
        .args(["plan", "--minutes", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// Help
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_commands() {
    let output = metro_bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["run", "demo", "plan", "devices"] {
        assert!(stdout.contains(cmd), "help should mention '{cmd}'");
    }
}
