mod common;

use common::{fixture, json_lines, run_cli};

const EXIT_CONFIG_ERROR: i32 = 2;
const EXIT_TIMEOUT: i32 = 4;

// ============================================================================
// version / completions
// ============================================================================

#[test]
fn version_human() {
    let output = run_cli(&["version"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("trafficlight"), "{stdout}");
    assert!(stdout.contains('.'), "missing version number: {stdout}");
}

#[test]
fn version_json() {
    let output = run_cli(&["version", "--format", "json"]);
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("version JSON should be valid");
    assert_eq!(parsed["name"], "trafficlight");
    assert!(parsed.get("version").is_some());
}

#[test]
fn completions_bash() {
    let output = run_cli(&["completions", "bash"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("trafficlight"));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn validate_accepts_good_files() {
    let output = run_cli(&["validate", &fixture("fast.yaml"), &fixture("partial.yaml")]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stdout)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fast.yaml: ok (60-90 ms cycle, 1 ms tick)"), "{stdout}");
    assert!(stdout.contains("partial.yaml: ok (4000-6000 ms cycle, 2 ms tick)"), "{stdout}");
}

#[test]
fn validate_reports_every_file_before_failing() {
    let output = run_cli(&[
        "validate",
        &fixture("inverted_bounds.yaml"),
        &fixture("fast.yaml"),
    ]);
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("inverted_bounds.yaml: invalid"), "{stdout}");
    assert!(stdout.contains("fast.yaml: ok"), "{stdout}");
}

#[test]
fn validate_json_summary() {
    let output = run_cli(&[
        "validate",
        "--format",
        "json",
        &fixture("fast.yaml"),
        &fixture("unknown_field.yaml"),
        &fixture("malformed.yaml"),
    ]);
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["valid"], 1);
    assert_eq!(report["summary"]["invalid"], 2);
    assert_eq!(report["files"][0]["config"]["min_cycle_ms"], 60);
    assert_eq!(report["files"][1]["valid"], false);
}

#[test]
fn validate_missing_file() {
    let output = run_cli(&["validate", "/nonexistent/light.yaml"]);
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("file not found"), "{stderr}");
}

// ============================================================================
// run
// ============================================================================

#[test]
fn run_human_reports_changes() {
    let output = run_cli(&["run", "--config", &fixture("fast.yaml"), "--for", "600ms"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("light started, red (60-90 ms per phase)"), "{stdout}");
    assert!(stdout.contains("red -> green after"), "{stdout}");
    assert!(stdout.contains("light stopped (completed)"), "{stdout}");
}

#[test]
fn run_json_stream_is_ordered() {
    let output = run_cli(&[
        "run",
        "--config",
        &fixture("fast.yaml"),
        "--for",
        "500ms",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let events = json_lines(&output);
    assert!(events.len() >= 4, "too few events: {events:?}");
    assert_eq!(events[0]["type"], "LightStarted");
    assert_eq!(events[0]["min_cycle_ms"], 60);

    let last = events.last().unwrap();
    assert_eq!(last["type"], "LightStopped");
    assert_eq!(last["reason"], "completed");
    assert_eq!(last["transitions"], events.len() as u64 - 2);

    for (i, event) in events.iter().enumerate() {
        assert_eq!(event["sequence"], i as u64);
    }

    let changes: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "PhaseChanged")
        .collect();
    assert_eq!(changes[0]["from"], "red");
    assert_eq!(changes[0]["to"], "green");
    for pair in changes.windows(2) {
        assert_eq!(pair[0]["to"], pair[1]["from"]);
    }
}

#[test]
fn run_writes_events_file() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.jsonl");

    let output = run_cli(&[
        "run",
        "--min-cycle-ms",
        "50",
        "--max-cycle-ms",
        "50",
        "--for",
        "300ms",
        "--events-file",
        events.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let contents = std::fs::read_to_string(&events).unwrap();
    let types: Vec<String> = contents
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["type"].to_string())
        .collect();
    assert_eq!(types.first().map(String::as_str), Some("\"LightStarted\""));
    assert_eq!(types.last().map(String::as_str), Some("\"LightStopped\""));
    assert!(types.iter().any(|t| t == "\"PhaseChanged\""));
}

#[test]
fn run_rejects_invalid_overrides() {
    let output = run_cli(&["run", "--min-cycle-ms", "0", "--for", "10ms"]);
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));

    let output = run_cli(&[
        "run",
        "--config",
        &fixture("fast.yaml"),
        "--max-cycle-ms",
        "10",
        "--for",
        "10ms",
    ]);
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_cycle_ms"), "{stderr}");
}

// ============================================================================
// wait
// ============================================================================

#[test]
fn wait_succeeds_on_fast_light() {
    let output = run_cli(&["wait", "--config", &fixture("fast.yaml"), "--timeout", "5s"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("green after"), "{stdout}");
}

#[test]
fn wait_json_reports_wait_time() {
    let output = run_cli(&[
        "wait",
        "--min-cycle-ms",
        "80",
        "--max-cycle-ms",
        "80",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let events = json_lines(&output);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "GreenReached");
    assert!(events[0]["waited_ms"].as_u64().unwrap() >= 70);
}

#[test]
fn wait_timeout_exit_code() {
    let output = run_cli(&["wait", "--timeout", "100ms"]);
    assert_eq!(output.status.code(), Some(EXIT_TIMEOUT));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("did not turn green"), "{stderr}");
}
