//! Command-line interface
//!
//! Argument definitions and command handlers for the `trafficlight` binary.

pub mod args;
pub mod commands;
