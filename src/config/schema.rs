//! Configuration schema for a single light.
//!
//! ```yaml
//! min_cycle_ms: 4000
//! max_cycle_ms: 6000
//! tick_ms: 1
//! seed: 42        # optional, makes cycle lengths reproducible
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::light::cycle::{DEFAULT_MAX_CYCLE_MS, DEFAULT_MIN_CYCLE_MS, DEFAULT_TICK_MS};
use crate::light::{CycleTiming, TrafficLight, UniformDuration};

/// Timing configuration for a light.
///
/// Every field is optional in YAML; missing fields take the defaults of a
/// 4-6 s cycle polled every millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct LightConfig {
    /// Shortest phase length in milliseconds.
    pub min_cycle_ms: u64,

    /// Longest phase length in milliseconds.
    pub max_cycle_ms: u64,

    /// Cycler polling tick in milliseconds.
    pub tick_ms: u64,

    /// Seed for reproducible cycle lengths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            min_cycle_ms: DEFAULT_MIN_CYCLE_MS,
            max_cycle_ms: DEFAULT_MAX_CYCLE_MS,
            tick_ms: DEFAULT_TICK_MS,
            seed: None,
        }
    }
}

impl LightConfig {
    /// Checks that the timing bounds describe a usable cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing().validate()
    }

    /// The cycle timing described by this configuration.
    #[must_use]
    pub const fn timing(&self) -> CycleTiming {
        CycleTiming::from_millis(self.min_cycle_ms, self.max_cycle_ms, self.tick_ms)
    }

    /// Duration source for this configuration: seeded when `seed` is set.
    #[must_use]
    pub fn source(&self) -> UniformDuration {
        self.seed
            .map_or_else(UniformDuration::from_os_rng, UniformDuration::seeded)
    }

    /// Builds a red, not yet cycling light from this configuration.
    #[must_use]
    pub fn build_light(&self) -> TrafficLight {
        TrafficLight::with_source(self.timing(), self.source())
    }
}
