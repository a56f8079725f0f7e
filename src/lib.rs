//! `trafficlight` - a randomized red/green traffic light
//!
//! A [`TrafficLight`](light::TrafficLight) flips between red and green on a
//! background thread, holding each phase for a random 4-6 seconds. Callers
//! can read the phase at any time or block until it turns green.

pub mod cli;
pub mod config;
pub mod error;
pub mod light;
pub mod observability;
