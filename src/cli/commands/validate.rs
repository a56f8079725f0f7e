//! `validate` command
//!
//! Loads each configuration file and reports whether it describes a usable
//! light.

use serde_json::json;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::load_config;
use crate::error::TrafficLightError;

/// Validate configuration files.
///
/// Every file is checked and reported before the first failure, if any, is
/// returned.
///
/// # Errors
///
/// Returns the first file's [`ConfigError`](crate::error::ConfigError).
pub fn run(args: &ValidateArgs) -> Result<(), TrafficLightError> {
    let results: Vec<_> = args
        .files
        .iter()
        .map(|path| {
            tracing::info!(file = %path.display(), "validating configuration");
            (path, load_config(path))
        })
        .collect();

    match args.format {
        OutputFormat::Human => {
            for (path, result) in &results {
                match result {
                    Ok(config) => println!(
                        "{}: ok ({}-{} ms cycle, {} ms tick)",
                        path.display(),
                        config.min_cycle_ms,
                        config.max_cycle_ms,
                        config.tick_ms
                    ),
                    Err(e) => println!("{}: invalid: {e}", path.display()),
                }
            }
        }
        OutputFormat::Json => {
            let files: Vec<_> = results
                .iter()
                .map(|(path, result)| match result {
                    Ok(config) => json!({
                        "file": path.display().to_string(),
                        "valid": true,
                        "config": config,
                    }),
                    Err(e) => json!({
                        "file": path.display().to_string(),
                        "valid": false,
                        "error": e.to_string(),
                    }),
                })
                .collect();
            let valid = results.iter().filter(|(_, r)| r.is_ok()).count();
            let report = json!({
                "files": files,
                "summary": { "valid": valid, "invalid": results.len() - valid },
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    match results.into_iter().find_map(|(_, r)| r.err()) {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
