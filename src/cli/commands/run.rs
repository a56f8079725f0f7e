//! `run` command
//!
//! Starts a light and samples its phase on a tokio interval, reporting each
//! observed change until the run time elapses or a signal arrives.

use std::time::Duration;

use chrono::Utc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::cli::commands::resolve_config;
use crate::error::TrafficLightError;
use crate::observability::{Event, EventEmitter, StopReason};

/// Fans events out to stdout (human lines or JSONL) and an optional file.
struct Reporter {
    format: OutputFormat,
    stdout: EventEmitter,
    file: Option<EventEmitter>,
}

impl Reporter {
    fn new(args: &RunArgs) -> std::io::Result<Self> {
        let stdout = match args.format {
            OutputFormat::Json => EventEmitter::stdout(),
            OutputFormat::Human => EventEmitter::noop(),
        };
        let file = args
            .events_file
            .as_deref()
            .map(EventEmitter::from_file)
            .transpose()?;

        Ok(Self {
            format: args.format,
            stdout,
            file,
        })
    }

    fn report(&self, event: Event) {
        if self.format == OutputFormat::Human {
            println!("{}", human_line(&event));
        }
        if let Some(ref file) = self.file {
            file.emit(event.clone());
        }
        self.stdout.emit(event);
    }
}

fn human_line(event: &Event) -> String {
    match event {
        Event::LightStarted {
            timestamp,
            min_cycle_ms,
            max_cycle_ms,
            ..
        } => format!(
            "{} light started, red ({min_cycle_ms}-{max_cycle_ms} ms per phase)",
            timestamp.format("%H:%M:%S%.3f")
        ),
        Event::PhaseChanged {
            timestamp,
            from,
            to,
            held_ms,
        } => format!(
            "{} {from} -> {to} after {held_ms} ms",
            timestamp.format("%H:%M:%S%.3f")
        ),
        Event::GreenReached {
            timestamp,
            waited_ms,
        } => format!(
            "{} green after {waited_ms} ms",
            timestamp.format("%H:%M:%S%.3f")
        ),
        Event::LightStopped {
            timestamp,
            reason,
            transitions,
        } => format!(
            "{} light stopped ({}) after {transitions} transitions",
            timestamp.format("%H:%M:%S%.3f"),
            match reason {
                StopReason::Completed => "completed",
                StopReason::Interrupted => "interrupted",
            }
        ),
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Cycle a light and report every observed phase change.
///
/// A signal ends the run normally; the light is shut down and a final
/// `LightStopped` event is reported either way.
///
/// # Errors
///
/// Returns a config error for an invalid light, an I/O error if the events
/// file cannot be created, or a light error if the cycler cannot start.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> Result<(), TrafficLightError> {
    let config = resolve_config(&args.light)?;
    let reporter = Reporter::new(args)?;

    let light = config.build_light();
    light.simulate()?;
    reporter.report(Event::LightStarted {
        timestamp: Utc::now(),
        min_cycle_ms: config.min_cycle_ms,
        max_cycle_ms: config.max_cycle_ms,
        tick_ms: config.tick_ms,
    });

    let deadline = args.run_for.map(|d| Instant::now() + d);
    let mut interval = tokio::time::interval(Duration::from_millis(args.poll_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last = light.current_phase();
    let mut since = Instant::now();
    let mut transitions = 0_u64;

    let reason = loop {
        tokio::select! {
            () = cancel.cancelled() => break StopReason::Interrupted,
            () = until(deadline) => break StopReason::Completed,
            _ = interval.tick() => {
                let now = light.current_phase();
                if now == last {
                    continue;
                }
                transitions += 1;
                reporter.report(Event::PhaseChanged {
                    timestamp: Utc::now(),
                    from: last,
                    to: now,
                    held_ms: millis(since.elapsed()),
                });
                last = now;
                since = Instant::now();
            }
        }
    };

    light.shutdown();
    tracing::info!(?reason, transitions, "run finished");
    reporter.report(Event::LightStopped {
        timestamp: Utc::now(),
        reason,
        transitions,
    });
    Ok(())
}
