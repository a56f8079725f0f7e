//! `wait` command
//!
//! Starts a light and blocks a worker thread in `wait_for_green` until the
//! light turns green.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::cli::args::{OutputFormat, WaitArgs};
use crate::cli::commands::resolve_config;
use crate::error::TrafficLightError;
use crate::observability::{Event, EventEmitter};

/// Start a light and wait for green.
///
/// # Errors
///
/// Returns [`LightError::WaitTimedOut`](crate::error::LightError::WaitTimedOut)
/// when `--timeout` expires first, [`TrafficLightError::Interrupted`] on a
/// signal, or a config error for an invalid light.
pub async fn run(args: &WaitArgs, cancel: CancellationToken) -> Result<(), TrafficLightError> {
    let config = resolve_config(&args.light)?;
    let light = Arc::new(config.build_light());
    light.simulate()?;

    let started = Instant::now();
    let timeout = args.timeout;
    let waiter = {
        let light = Arc::clone(&light);
        tokio::task::spawn_blocking(move || match timeout {
            Some(timeout) => light.wait_for_green_timeout(timeout),
            None => {
                light.wait_for_green();
                Ok(())
            }
        })
    };

    let outcome = tokio::select! {
        () = cancel.cancelled() => return Err(TrafficLightError::Interrupted),
        joined = waiter => joined.map_err(std::io::Error::other)?,
    };
    outcome?;

    let waited = started.elapsed();
    let waited_ms = u64::try_from(waited.as_millis()).unwrap_or(u64::MAX);
    let phase = light.current_phase();
    tracing::info!(waited_ms, %phase, "light turned green");

    match args.format {
        OutputFormat::Human => {
            println!("{phase} after {}", humantime::format_duration(waited));
        }
        OutputFormat::Json => {
            EventEmitter::stdout().emit(Event::GreenReached {
                timestamp: Utc::now(),
                waited_ms,
            });
        }
    }
    Ok(())
}
