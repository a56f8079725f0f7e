//! Single-slot phase mailbox with blocking wait-until-green.
//!
//! The slot only ever holds the most recent phase; older values are
//! overwritten, never queued. Receivers block on a condition variable and
//! re-check the slot on every wake, so a spurious wakeup or a wake caused by
//! a switch to red simply puts them back to sleep.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::error::LightError;

use super::phase::Phase;

/// Lock-and-condition handoff between the cycling thread and waiters.
#[derive(Debug, Default)]
pub struct PhaseChannel {
    /// Last published phase
    slot: Mutex<Phase>,
    /// Signalled once per `send`
    published: Condvar,
}

impl PhaseChannel {
    /// Creates a channel whose slot holds [`Phase::Red`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the slot with `phase` and wakes one waiter.
    ///
    /// # Panics
    ///
    /// Panics if the slot mutex is poisoned.
    pub fn send(&self, phase: Phase) {
        {
            let mut slot = self.slot.lock().expect("phase slot lock poisoned");
            *slot = phase;
        }
        self.published.notify_one();
    }

    /// Blocks until the slot holds [`Phase::Green`].
    ///
    /// Returns immediately when the slot is already green.
    ///
    /// # Panics
    ///
    /// Panics if the slot mutex is poisoned.
    pub fn receive(&self) {
        let slot = self.slot.lock().expect("phase slot lock poisoned");
        let _green = self
            .published
            .wait_while(slot, |phase| !phase.is_green())
            .expect("phase slot lock poisoned");
    }

    /// Like [`receive`](Self::receive), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`LightError::WaitTimedOut`] if the slot is still red when
    /// the timeout elapses.
    ///
    /// # Panics
    ///
    /// Panics if the slot mutex is poisoned.
    pub fn receive_timeout(&self, timeout: Duration) -> Result<(), LightError> {
        let started = Instant::now();
        let slot = self.slot.lock().expect("phase slot lock poisoned");
        let (_slot, result) = self
            .published
            .wait_timeout_while(slot, timeout, |phase| !phase.is_green())
            .expect("phase slot lock poisoned");

        if result.timed_out() {
            return Err(LightError::WaitTimedOut {
                waited: started.elapsed(),
            });
        }
        Ok(())
    }

    /// Returns a copy of the last published phase without waiting.
    ///
    /// # Panics
    ///
    /// Panics if the slot mutex is poisoned.
    #[must_use]
    pub fn last_published(&self) -> Phase {
        *self.slot.lock().expect("phase slot lock poisoned")
    }
}
