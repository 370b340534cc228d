//! Integration tests for the coachctl CLI
//!
//! Each test drives the real binary and checks output and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Custom predicate to check if output is valid JSON
fn is_json() -> impl predicates::Predicate<[u8]> {
    predicates::function::function(|s: &[u8]| {
        std::str::from_utf8(s).is_ok_and(|text| serde_json::from_str::<Value>(text).is_ok())
    })
}

/// Test helper to create a coachctl command
fn coachctl() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("coachctl")?;
    cmd.env_remove("COACHCTL_CONFIG").env_remove("RUST_LOG");
    Ok(cmd)
}

/// A short hand-written recording: five seconds at 10 mph over the limit.
fn write_speeding_jsonl(dir: &TempDir) -> std::io::Result<std::path::PathBuf> {
    let mut lines = String::new();
    for tick in 0..=50 {
        let t = f64::from(tick) * 0.1;
        lines.push_str(&format!(
            "{{\"t\":{t:.1},\"speed_mps\":18.0,\"speed_limit_mps\":13.4,\"lane_offset_m\":0.05}}\n"
        ));
    }
    let path = dir.path().join("speeding.jsonl");
    fs::write(&path, lines)?;
    Ok(path)
}

#[test]
fn test_cli_help() -> TestResult {
    coachctl()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DriveCoach"));
    Ok(())
}

#[test]
fn test_cli_version() -> TestResult {
    coachctl()?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("coachctl"));
    Ok(())
}

#[test]
fn test_config_show_defaults_as_yaml() -> TestResult {
    coachctl()?
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("min_display_s"))
        .stdout(predicate::str::contains("weights"));
    Ok(())
}

#[test]
fn test_config_show_json() -> TestResult {
    let output = coachctl()?.args(["--json", "config", "show"]).output()?;
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["success"], Value::Bool(true));
    assert_eq!(value["config"]["cues"]["max_concurrent_cues"], Value::from(2));
    Ok(())
}

#[test]
fn test_config_validate_valid_file() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("coach.yaml");
    fs::write(
        &path,
        "cues:\n  speed_margin_warn_mps: 3.0\n  speed_margin_clear_mps: 1.5\nweights:\n  speeding: 0.3\n",
    )?;

    coachctl()?
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
    Ok(())
}

#[test]
fn test_config_validate_rejects_inverted_band() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("coach.yaml");
    fs::write(
        &path,
        "cues:\n  speed_margin_warn_mps: 1.0\n  speed_margin_clear_mps: 2.0\n",
    )?;

    coachctl()?
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("speed_margin_clear_mps"));
    Ok(())
}

#[test]
fn test_config_validate_malformed_json() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("coach.json");
    fs::write(&path, "{ not json")?;

    coachctl()?
        .args(["--json", "config", "validate"])
        .arg(&path)
        .assert()
        .code(4)
        .stdout(is_json());
    Ok(())
}

#[test]
fn test_config_validate_missing_file() -> TestResult {
    coachctl()?
        .args(["config", "validate", "/nonexistent/coach.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Input not found"));
    Ok(())
}

#[test]
fn test_synth_json_output() -> TestResult {
    let output = coachctl()?
        .args(["--json", "synth", "--duration", "30"])
        .output()?;
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["success"], Value::Bool(true));
    assert_eq!(value["recording"]["frame_count"], Value::from(301));
    assert_eq!(value["outcome"]["frames"], Value::from(301));
    // The red light at 20 s is run inside the stop zone.
    assert_eq!(
        value["outcome"]["scorecard"]["subscores"]["compliance"].as_f64(),
        Some(75.0)
    );
    Ok(())
}

#[test]
fn test_synth_writes_recording() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("drive.jsonl");

    coachctl()?
        .args(["synth", "--duration", "5", "--hz", "5", "--out"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Final score:"));

    let written = fs::read_to_string(&path)?;
    assert_eq!(written.lines().count(), 26);
    Ok(())
}

#[test]
fn test_synth_rejects_zero_rate() -> TestResult {
    coachctl()?
        .args(["synth", "--hz", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid argument"));
    Ok(())
}

#[test]
fn test_replay_recording() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_speeding_jsonl(&dir)?;

    coachctl()?
        .arg("replay")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Final score:"))
        .stdout(predicate::str::contains("SLOW_DOWN x1"));
    Ok(())
}

#[test]
fn test_replay_json_scorecard() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_speeding_jsonl(&dir)?;

    let output = coachctl()?.arg("--json").arg("replay").arg(&path).output()?;
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout)?;
    let scorecard = &value["outcome"]["scorecard"];
    assert_eq!(scorecard["subscores"]["speeding"].as_f64(), Some(75.0));
    assert_eq!(scorecard["subscores"]["lane"].as_f64(), Some(100.0));
    assert_eq!(value["outcome"]["cue_onsets"]["SLOW_DOWN"], Value::from(1));
    Ok(())
}

#[test]
fn test_replay_with_trace() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_speeding_jsonl(&dir)?;

    coachctl()?
        .args(["replay", "--trace"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cue trace:"));
    Ok(())
}

#[test]
fn test_replay_missing_file() -> TestResult {
    coachctl()?
        .args(["replay", "/nonexistent/drive.jsonl"])
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn test_replay_malformed_recording() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.jsonl");
    fs::write(&path, "{\"t\":0.0,\"speed_mps\":1.0,\"speed_limit_mps\":13.4}\nnot a frame\n")?;

    coachctl()?
        .args(["--json", "replay"])
        .arg(&path)
        .assert()
        .code(4)
        .stdout(is_json())
        .stdout(predicate::str::contains("line 2"));
    Ok(())
}

#[test]
fn test_replay_with_invalid_config() -> TestResult {
    let dir = TempDir::new()?;
    let recording = write_speeding_jsonl(&dir)?;
    let config = dir.path().join("coach.yaml");
    fs::write(&config, "cues:\n  max_concurrent_cues: 0\n")?;

    coachctl()?
        .arg("replay")
        .arg(&recording)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(4);
    Ok(())
}

#[test]
fn test_synth_unwritable_output() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("drive.csv");

    let output = coachctl()?
        .args(["--json", "synth", "--duration", "2", "--out"])
        .arg(&path)
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["success"], Value::Bool(false));
    assert_eq!(value["error"]["type"], Value::from("output"));
    assert!(!path.exists());
    Ok(())
}
