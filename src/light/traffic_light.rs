//! The traffic light: authoritative phase, wait channel and cycler handles.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::LightError;
use crate::observability::metrics;

use super::channel::PhaseChannel;
use super::cycle::{
    CycleTiming, DurationSource, SharedSource, UniformDuration, cycle_through_phases,
    share_source,
};
use super::phase::Phase;

/// State shared between a light and its cycling threads.
///
/// The authoritative phase and the channel slot sit behind two different
/// locks. Only the cycler writes either of them.
#[derive(Debug, Default)]
pub(crate) struct SharedLight {
    phase: Mutex<Phase>,
    pub(crate) channel: PhaseChannel,
}

impl SharedLight {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the phase mutex is poisoned.
    pub(crate) fn current(&self) -> Phase {
        *self.phase.lock().expect("phase lock poisoned")
    }

    /// Flips the authoritative phase and returns `(from, to)`.
    ///
    /// # Panics
    ///
    /// Panics if the phase mutex is poisoned.
    pub(crate) fn toggle(&self) -> (Phase, Phase) {
        let mut phase = self.phase.lock().expect("phase lock poisoned");
        let from = *phase;
        *phase = from.toggled();
        (from, *phase)
    }
}

/// A single red/green traffic light.
///
/// The light starts red and stays red until [`simulate`](Self::simulate)
/// starts the cycling thread. From then on the phase flips every
/// `min_cycle_ms..=max_cycle_ms` milliseconds, a fresh random length per
/// phase.
///
/// Any number of threads may call [`current_phase`](Self::current_phase)
/// concurrently. [`wait_for_green`](Self::wait_for_green) is built for one
/// waiter at a time: each publish wakes a single blocked caller.
///
/// Dropping the light (or calling [`shutdown`](Self::shutdown)) stops and
/// joins its cyclers. Callers still blocked in `wait_for_green` at that point
/// stay blocked.
pub struct TrafficLight {
    shared: Arc<SharedLight>,
    timing: CycleTiming,
    source: SharedSource,
    cancel: CancellationToken,
    cyclers: Mutex<Vec<JoinHandle<()>>>,
}

impl TrafficLight {
    /// Creates a red light with the default 4-6 s cycle and an OS-seeded
    /// random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(CycleTiming::default(), UniformDuration::from_os_rng())
    }

    /// Creates a red light with custom timing and duration source.
    #[must_use]
    pub fn with_source(timing: CycleTiming, source: impl DurationSource + 'static) -> Self {
        Self {
            shared: Arc::new(SharedLight::new()),
            timing,
            source: share_source(source),
            cancel: CancellationToken::new(),
            cyclers: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of the current phase. Never blocks beyond lock
    /// contention.
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.shared.current()
    }

    /// The timing this light cycles with.
    #[must_use]
    pub const fn timing(&self) -> CycleTiming {
        self.timing
    }

    /// Blocks until the light is green.
    ///
    /// Returns at once if the last published phase already is green; this
    /// waits for green, not for the next switch to green.
    pub fn wait_for_green(&self) {
        let started = Instant::now();
        self.shared.channel.receive();
        metrics::record_green_wait(started.elapsed());
    }

    /// Blocks until the light is green or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`LightError::WaitTimedOut`] if the light is still red when
    /// the timeout elapses.
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> Result<(), LightError> {
        let started = Instant::now();
        self.shared.channel.receive_timeout(timeout)?;
        metrics::record_green_wait(started.elapsed());
        Ok(())
    }

    /// Starts the cycling thread and returns immediately.
    ///
    /// Each call spawns another cycler; calling this more than once leaves
    /// several threads toggling the same light. After
    /// [`shutdown`](Self::shutdown) new cyclers exit straight away.
    ///
    /// # Errors
    ///
    /// Returns [`LightError::InvalidTiming`] without spawning anything if the
    /// light's [`CycleTiming`] fails [`CycleTiming::validate`], and
    /// [`LightError::Spawn`] if the thread cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if the cycler-handle mutex is poisoned.
    pub fn simulate(&self) -> Result<(), LightError> {
        self.timing
            .validate()
            .map_err(LightError::InvalidTiming)?;

        let shared = Arc::clone(&self.shared);
        let source = Arc::clone(&self.source);
        let cancel = self.cancel.clone();
        let timing = self.timing;

        let handle = thread::Builder::new()
            .name("light-cycler".to_owned())
            .spawn(move || cycle_through_phases(&shared, timing, &source, &cancel))
            .map_err(LightError::Spawn)?;

        let mut cyclers = self.cyclers.lock().expect("cycler lock poisoned");
        cyclers.push(handle);
        info!(
            min_cycle_ms = timing.min_cycle_ms,
            max_cycle_ms = timing.max_cycle_ms,
            cyclers = cyclers.len(),
            "light simulation started"
        );
        Ok(())
    }

    /// Stops every cycler and waits for them to exit.
    ///
    /// Cyclers notice within one tick. Idempotent.
    ///
    /// # Panics
    ///
    /// Panics if the cycler-handle mutex is poisoned.
    pub fn shutdown(&self) {
        self.cancel.cancel();

        let handles: Vec<_> = self
            .cyclers
            .lock()
            .expect("cycler lock poisoned")
            .drain(..)
            .collect();
        if handles.is_empty() {
            return;
        }

        for handle in handles {
            if handle.join().is_err() {
                warn!("cycling thread panicked");
            }
        }
        debug!("light simulation stopped");
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrafficLight {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for TrafficLight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrafficLight")
            .field("phase", &self.current_phase())
            .field("timing", &self.timing)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
