//! End-to-end tests for the exbreak binary

use std::fs;
use std::process::Command;

fn exbreak() -> Command
{
    let mut command = Command::new(env!("CARGO_BIN_EXE_exbreak"));
    command.env_remove("RUST_LOG").env_remove("EXBREAK_LOG_FILE");
    command
}

#[test]
fn test_check_reports_ignored_names()
{
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("exbreak.toml");
    fs::write(&settings, "ignored = [\"System.*\", \"MyApp.ExpectedException\"]\n").unwrap();

    let output = exbreak()
        .args(["check", "--settings"])
        .arg(&settings)
        .args(["System.NullReferenceException", "MyLib.Exception"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("System.NullReferenceException: ignored (System.*)"));
    assert!(stdout.contains("MyLib.Exception: break"));
}

#[test]
fn test_simulate_prints_transcript()
{
    let output = exbreak()
        .args(["--log-level", "error", "simulate", "--host", "11", "toggle", "start", "ready", "throw:Any.Error"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("armed in session #1, veto"));
    assert!(stdout.contains("throw:Any.Error: break"));
    assert!(stdout.contains("native calls: 1"));
}

#[test]
fn test_missing_settings_file_fails()
{
    let dir = tempfile::tempdir().unwrap();
    let output = exbreak()
        .args(["check", "--settings"])
        .arg(dir.path().join("missing.toml"))
        .arg("Any.Error")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("IO error"));
}

#[test]
fn test_unknown_step_is_rejected()
{
    let output = exbreak().args(["simulate", "pause"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_simulate_disable_between_sessions()
{
    let output = exbreak()
        .args(["--log-level", "error", "simulate", "--host", "11"])
        .args(["toggle", "start", "ready", "end", "toggle", "start", "ready", "throw:MyApp.Bug"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("ready: session #2 starting -> active (disabled)"));
    assert!(stdout.contains("throw:MyApp.Bug: continue"));
}
