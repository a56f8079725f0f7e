//! Shared integration-test helpers for driving the `trafficlight` binary
//! and building fast lights.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use trafficlight::light::{CycleTiming, TrafficLight};

/// Environment variables the CLI reads; cleared so the host cannot leak in.
const CLI_ENV: &[&str] = &[
    "TRAFFICLIGHT_CONFIG",
    "TRAFFICLIGHT_MIN_CYCLE_MS",
    "TRAFFICLIGHT_MAX_CYCLE_MS",
    "TRAFFICLIGHT_TICK_MS",
    "TRAFFICLIGHT_SEED",
    "TRAFFICLIGHT_EVENTS_FILE",
    "TRAFFICLIGHT_COLOR",
    "TRAFFICLIGHT_LOG_LEVEL",
    "TRAFFICLIGHT_LOG_FORMAT",
];

/// Runs the binary with `args` to completion and captures its output.
#[allow(clippy::missing_panics_doc)]
pub fn run_cli(args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_trafficlight"));
    for var in CLI_ENV {
        cmd.env_remove(var);
    }
    cmd.args(args).output().expect("failed to run trafficlight")
}

/// Path to a file under `tests/fixtures`.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Same as [`fixture_path`], as a `&str`-friendly `String`.
#[must_use]
pub fn fixture(name: &str) -> String {
    fixture_path(name).display().to_string()
}

/// Parses every non-empty stdout line as JSON.
#[allow(clippy::missing_panics_doc)]
pub fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            serde_json::from_str(l).unwrap_or_else(|e| panic!("invalid JSON line: {e}\nline: {l}"))
        })
        .collect()
}

/// A light whose every phase lasts exactly `cycle_ms`.
#[must_use]
pub fn fixed_light(cycle_ms: u64) -> TrafficLight {
    TrafficLight::with_source(
        CycleTiming::from_millis(cycle_ms, cycle_ms, 1),
        move |_low: u64, _high: u64| cycle_ms,
    )
}
