//! Traffic light core
//!
//! A [`TrafficLight`] owns the authoritative [`Phase`] and a
//! [`PhaseChannel`] through which its cycling thread publishes every change.
//!
//! # Architecture
//!
//! - [`Phase`]: red or green
//! - [`PhaseChannel`]: single-slot mailbox with blocking wait-until-green
//! - [`cycle`]: timing bounds, duration sources and the cycling loop
//! - [`TrafficLight`]: query, wait and simulate surface

pub mod channel;
pub mod cycle;
pub mod phase;
pub mod traffic_light;

pub use channel::PhaseChannel;
pub use cycle::{CycleTiming, DurationSource, UniformDuration};
pub use phase::Phase;
pub use traffic_light::TrafficLight;
