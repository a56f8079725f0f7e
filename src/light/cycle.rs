//! Cycle timing and the background cycling loop.
//!
//! The cycler is a coarse poller: it sleeps one tick at a time and compares
//! the time since the last transition against a randomly drawn target. That
//! is precise to about one tick, which is plenty for a traffic light.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::observability::metrics;

use super::traffic_light::SharedLight;

/// Default shortest cycle, in milliseconds.
pub const DEFAULT_MIN_CYCLE_MS: u64 = 4000;

/// Default longest cycle, in milliseconds.
pub const DEFAULT_MAX_CYCLE_MS: u64 = 6000;

/// Default polling tick, in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 1;

/// Bounds for the randomized cycle length and the polling tick.
///
/// Cycle lengths are drawn from the closed interval
/// `[min_cycle_ms, max_cycle_ms]`. [`from_millis`](Self::from_millis) takes
/// the values as given; [`new`](Self::new) checks them first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTiming {
    /// Shortest time a phase is held
    pub min_cycle_ms: u64,
    /// Longest time a phase is held
    pub max_cycle_ms: u64,
    /// Sleep between two elapsed-time checks
    pub tick_ms: u64,
}

impl CycleTiming {
    /// Creates timing bounds from raw millisecond values.
    #[must_use]
    pub const fn from_millis(min_cycle_ms: u64, max_cycle_ms: u64, tick_ms: u64) -> Self {
        Self {
            min_cycle_ms,
            max_cycle_ms,
            tick_ms,
        }
    }

    /// Creates timing bounds, rejecting values the cycler cannot run with.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(min_cycle_ms: u64, max_cycle_ms: u64, tick_ms: u64) -> Result<Self, ConfigError> {
        let timing = Self::from_millis(min_cycle_ms, max_cycle_ms, tick_ms);
        timing.validate()?;
        Ok(timing)
    }

    /// Checks that the bounds describe a usable cycle: a non-empty interval
    /// of positive lengths and a non-zero tick no longer than the shortest
    /// cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cycle_ms == 0 {
            return Err(invalid(
                "min_cycle_ms",
                self.min_cycle_ms,
                "a positive number of milliseconds",
            ));
        }
        if self.max_cycle_ms < self.min_cycle_ms {
            return Err(invalid(
                "max_cycle_ms",
                self.max_cycle_ms,
                &format!("at least min_cycle_ms ({})", self.min_cycle_ms),
            ));
        }
        if self.tick_ms == 0 {
            return Err(invalid(
                "tick_ms",
                self.tick_ms,
                "a positive number of milliseconds",
            ));
        }
        if self.tick_ms > self.min_cycle_ms {
            return Err(invalid(
                "tick_ms",
                self.tick_ms,
                &format!("at most min_cycle_ms ({})", self.min_cycle_ms),
            ));
        }
        Ok(())
    }

    /// The polling tick as a [`Duration`].
    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn invalid(field: &str, value: u64, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        value: value.to_string(),
        expected: expected.to_owned(),
    }
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self::from_millis(DEFAULT_MIN_CYCLE_MS, DEFAULT_MAX_CYCLE_MS, DEFAULT_TICK_MS)
    }
}

/// Supplies cycle lengths to the cycler.
///
/// Implementations must return a value in the closed interval
/// `[low, high]`. The cycler calls this once per phase.
pub trait DurationSource: Send {
    /// Returns the next cycle length in milliseconds.
    fn next_duration(&mut self, low: u64, high: u64) -> u64;
}

impl<F> DurationSource for F
where
    F: FnMut(u64, u64) -> u64 + Send,
{
    fn next_duration(&mut self, low: u64, high: u64) -> u64 {
        self(low, high)
    }
}

/// Duration source shared by every cycler of one light.
pub type SharedSource = Arc<Mutex<Box<dyn DurationSource>>>;

/// Wraps a source so several cyclers can draw from it.
pub fn share_source(source: impl DurationSource + 'static) -> SharedSource {
    let boxed: Box<dyn DurationSource> = Box::new(source);
    Arc::new(Mutex::new(boxed))
}

/// Uniformly distributed cycle lengths.
///
/// Seed it for reproducible runs; the same seed always yields the same
/// sequence of lengths.
pub struct UniformDuration {
    rng: StdRng,
}

impl UniformDuration {
    /// Creates a source seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministic source.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DurationSource for UniformDuration {
    fn next_duration(&mut self, low: u64, high: u64) -> u64 {
        self.rng.random_range(low..=high)
    }
}

impl std::fmt::Debug for UniformDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniformDuration").finish_non_exhaustive()
    }
}

/// Draws the next cycle length from `source`.
///
/// # Panics
///
/// Panics if the source mutex is poisoned.
fn draw(source: &SharedSource, timing: CycleTiming) -> Duration {
    let ms = source
        .lock()
        .expect("duration source lock poisoned")
        .next_duration(timing.min_cycle_ms, timing.max_cycle_ms);
    metrics::record_cycle_target(ms);
    Duration::from_millis(ms)
}

/// Body of the cycling thread.
///
/// Runs until `cancel` fires. Each time the current phase has been held for
/// the drawn target, a new target is drawn, the authoritative phase is
/// toggled and the new phase is published to the channel. The two updates
/// take two separate locks, one after the other, never nested.
pub(crate) fn cycle_through_phases(
    light: &SharedLight,
    timing: CycleTiming,
    source: &SharedSource,
    cancel: &CancellationToken,
) {
    let tick = timing.tick();
    let mut target = draw(source, timing);
    let mut last_transition = Instant::now();
    debug!(target_ms = duration_ms(target), "cycling started");

    while !cancel.is_cancelled() {
        thread::sleep(tick);

        let held = last_transition.elapsed();
        if held < target {
            continue;
        }

        target = draw(source, timing);
        let (from, to) = light.toggle();
        light.channel.send(to);
        last_transition = Instant::now();

        metrics::record_transition(to);
        info!(
            %from,
            %to,
            held_ms = duration_ms(held),
            next_ms = duration_ms(target),
            "phase transition"
        );
    }

    debug!("cycling stopped");
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
