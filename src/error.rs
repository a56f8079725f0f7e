//! Error types for `trafficlight`
//!
//! The light itself has almost no failure modes; most of this hierarchy
//! exists for configuration loading and the CLI exit-code mapping.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `trafficlight` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// A bounded wait expired before the light turned green
    pub const TIMEOUT: i32 = 4;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `trafficlight` operations.
#[derive(Debug, Error)]
pub enum TrafficLightError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Traffic light runtime error
    #[error(transparent)]
    Light(#[from] LightError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The command was cancelled by a signal before it finished
    #[error("interrupted")]
    Interrupted,
}

impl TrafficLightError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) => ExitCode::CONFIG_ERROR,
            Self::Light(LightError::WaitTimedOut { .. }) => ExitCode::TIMEOUT,
            Self::Light(LightError::InvalidTiming(_)) => ExitCode::CONFIG_ERROR,
            Self::Light(LightError::Spawn(_)) => ExitCode::ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Interrupted => ExitCode::INTERRUPTED,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// The configuration file exists but could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

// ============================================================================
// Light Errors
// ============================================================================

/// Runtime errors raised by a [`TrafficLight`](crate::light::TrafficLight).
#[derive(Debug, Error)]
pub enum LightError {
    /// A bounded wait for green expired first
    #[error("light did not turn green within {waited:?}")]
    WaitTimedOut {
        /// How long the caller waited
        waited: Duration,
    },

    /// The light's timing bounds cannot drive a cycler
    #[error("invalid cycle timing: {0}")]
    InvalidTiming(#[source] ConfigError),

    /// The operating system refused to start the cycling thread
    #[error("failed to spawn cycling thread: {0}")]
    Spawn(#[source] std::io::Error),
}
