//! CLI argument definitions
//!
//! All Clap derive structs for `trafficlight` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Randomized red/green traffic light.
#[derive(Parser, Debug)]
#[command(name = "trafficlight", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "TRAFFICLIGHT_COLOR")]
    pub color: ColorChoice,

    /// Log line format on stderr.
    #[arg(long, default_value = "human", global = true, env = "TRAFFICLIGHT_LOG_FORMAT")]
    pub log_format: OutputFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cycle a light and report every phase change.
    Run(RunArgs),

    /// Start a light and block until it turns green.
    Wait(WaitArgs),

    /// Validate light configuration files.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Light Options
// ============================================================================

/// Options that shape the light, shared by `run` and `wait`.
///
/// Flags override values from `--config`, which override the defaults.
#[derive(Args, Debug, Default)]
pub struct LightArgs {
    /// Path to YAML light configuration.
    #[arg(short, long, env = "TRAFFICLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Shortest phase length in milliseconds.
    #[arg(long, env = "TRAFFICLIGHT_MIN_CYCLE_MS")]
    pub min_cycle_ms: Option<u64>,

    /// Longest phase length in milliseconds.
    #[arg(long, env = "TRAFFICLIGHT_MAX_CYCLE_MS")]
    pub max_cycle_ms: Option<u64>,

    /// Cycler polling tick in milliseconds.
    #[arg(long, env = "TRAFFICLIGHT_TICK_MS")]
    pub tick_ms: Option<u64>,

    /// Seed for reproducible phase lengths.
    #[arg(long, env = "TRAFFICLIGHT_SEED")]
    pub seed: Option<u64>,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Light options.
    #[command(flatten)]
    pub light: LightArgs,

    /// Stop after this long (e.g. `30s`, `2m`). Runs until Ctrl+C if unset.
    #[arg(long = "for", value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub run_for: Option<Duration>,

    /// How often the observer samples the phase, in milliseconds.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_ms: u64,

    /// Output format for phase changes on stdout.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Also write every event as JSONL to this file.
    #[arg(long, env = "TRAFFICLIGHT_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,
}

/// Arguments for `wait`.
#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Light options.
    #[command(flatten)]
    pub light: LightArgs,

    /// Give up after this long (e.g. `10s`). Waits forever if unset.
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["trafficlight", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("Expected RunArgs");
        };
        assert_eq!(args.poll_ms, 5);
        assert_eq!(args.format, OutputFormat::Human);
        assert!(args.run_for.is_none());
        assert!(args.light.config.is_none());
    }

    #[test]
    fn test_run_for_parses_humantime() {
        let cli = Cli::try_parse_from(["trafficlight", "run", "--for", "1m 30s"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("Expected RunArgs");
        };
        assert_eq!(args.run_for, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_run_rejects_zero_poll() {
        let result = Cli::try_parse_from(["trafficlight", "run", "--poll-ms", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_light_overrides_parse() {
        let cli = Cli::try_parse_from([
            "trafficlight",
            "wait",
            "--min-cycle-ms",
            "100",
            "--max-cycle-ms",
            "200",
            "--tick-ms",
            "2",
            "--seed",
            "7",
            "--timeout",
            "5s",
        ])
        .unwrap();
        let Commands::Wait(args) = cli.command else {
            panic!("Expected WaitArgs");
        };
        assert_eq!(args.light.min_cycle_ms, Some(100));
        assert_eq!(args.light.max_cycle_ms, Some(200));
        assert_eq!(args.light.tick_ms, Some(2));
        assert_eq!(args.light.seed, Some(7));
        assert_eq!(args.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let result = Cli::try_parse_from(["trafficlight", "wait", "--timeout", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_output() {
        let result = Cli::try_parse_from(["trafficlight", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let result = Cli::try_parse_from(["trafficlight", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_validate_requires_files() {
        let result = Cli::try_parse_from(["trafficlight", "validate"]);
        assert!(result.is_err(), "Expected error for missing files");
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["trafficlight", "--color", variant, "run"]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["trafficlight", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_log_format_is_global() {
        let cli = Cli::try_parse_from(["trafficlight", "run", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, OutputFormat::Json);
    }

    #[test]
    fn test_verbose_count_and_quiet() {
        let cli = Cli::try_parse_from(["trafficlight", "-vvv", "--quiet", "run"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert!(cli.quiet);
    }
}
