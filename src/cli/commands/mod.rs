//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod run;
pub mod validate;
pub mod version;
pub mod wait;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, LightArgs};
use crate::config::{LightConfig, read_config};
use crate::error::{ConfigError, TrafficLightError};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// `cancel` fires on the first SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), TrafficLightError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, cancel).await,
        Commands::Wait(args) => wait::run(&args, cancel).await,
        Commands::Validate(args) => validate::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Merges defaults, the optional config file and command-line overrides,
/// then validates the result.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be loaded or the merged
/// configuration is invalid.
pub fn resolve_config(args: &LightArgs) -> Result<LightConfig, ConfigError> {
    let mut config = match args.config {
        Some(ref path) => {
            tracing::info!(config = %path.display(), "loading configuration");
            read_config(path)?
        }
        None => LightConfig::default(),
    };

    if let Some(ms) = args.min_cycle_ms {
        config.min_cycle_ms = ms;
    }
    if let Some(ms) = args.max_cycle_ms {
        config.max_cycle_ms = ms;
    }
    if let Some(ms) = args.tick_ms {
        config.tick_ms = ms;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}
