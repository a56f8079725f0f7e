//! Metrics for `trafficlight`.
//!
//! Recorded through the `metrics` facade. No exporter is installed here: an
//! embedding program that wants the numbers installs its own recorder, and
//! without one every call is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};

use crate::light::Phase;

/// Guard to prevent registering descriptions twice.
static METRICS_DESCRIBED: AtomicBool = AtomicBool::new(false);

/// Registers metric descriptions with whatever recorder is installed.
///
/// Call after installing a recorder. Later calls are ignored.
pub fn init_metrics() {
    if METRICS_DESCRIBED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already described, skipping");
        return;
    }

    describe_counter!(
        "trafficlight_phase_transitions_total",
        "Total number of phase transitions, by target phase"
    );
    describe_histogram!(
        "trafficlight_cycle_target_ms",
        "Randomly drawn phase lengths in milliseconds"
    );
    describe_histogram!(
        "trafficlight_green_wait_ms",
        "Time callers spent blocked waiting for green, in milliseconds"
    );
}

/// Records a phase transition into `to`.
pub fn record_transition(to: Phase) {
    counter!("trafficlight_phase_transitions_total", "to" => to.as_str()).increment(1);
}

/// Records a freshly drawn cycle length.
#[allow(clippy::cast_precision_loss)] // cycle lengths are far below 2^52 ms
pub fn record_cycle_target(ms: u64) {
    histogram!("trafficlight_cycle_target_ms").record(ms as f64);
}

/// Records how long a `wait_for_green` caller blocked.
pub fn record_green_wait(waited: Duration) {
    histogram!("trafficlight_green_wait_ms").record(waited.as_secs_f64() * 1000.0);
}
