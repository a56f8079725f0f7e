//! Configuration loader
//!
//! Reads a YAML file, deserializes it into a [`LightConfig`] and validates
//! the result.

use std::path::Path;

use crate::config::schema::LightConfig;
use crate::error::ConfigError;

/// Loads and validates a light configuration file.
///
/// An empty file yields the default configuration.
///
/// # Errors
///
/// Returns the errors of [`read_config`], plus
/// [`ConfigError::InvalidValue`] if validation fails.
pub fn load_config(path: &Path) -> Result<LightConfig, ConfigError> {
    let config = read_config(path)?;
    config.validate()?;
    tracing::debug!(config = %path.display(), ?config, "configuration loaded");
    Ok(config)
}

/// Reads and parses a light configuration file without validating it.
///
/// Used when command-line overrides are applied before validation.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if `path` does not exist,
/// [`ConfigError::Io`] if it cannot be read, and [`ConfigError::ParseError`]
/// for malformed YAML or unknown fields.
pub fn read_config(path: &Path) -> Result<LightConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&raw, path)
}

/// Parses YAML text into a [`LightConfig`] without validating it.
///
/// `path` is only used for error reporting.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] with the offending line when the
/// YAML is malformed or names an unknown field.
pub fn parse_config(raw: &str, path: &Path) -> Result<LightConfig, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(LightConfig::default());
    }

    serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|loc| loc.line()),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = parse_config("min_cycle_ms: 100\nmax_cycle_ms: 150\n", Path::new("x.yaml"))
            .unwrap();
        assert_eq!(config.min_cycle_ms, 100);
        assert_eq!(config.max_cycle_ms, 150);
        assert_eq!(config.tick_ms, 1);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = parse_config("   \n", Path::new("x.yaml")).unwrap();
        assert_eq!(config, LightConfig::default());
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let err = parse_config("min_cycle_ms: 100\ncolour: amber\n", Path::new("x.yaml"))
            .unwrap_err();
        match err {
            ConfigError::ParseError { message, .. } => {
                assert!(message.contains("colour"), "message: {message}");
            }
            other => panic!("expected ParseError, got {other}"),
        }
    }

    #[test]
    fn malformed_yaml_reports_line() {
        let err = parse_config("min_cycle_ms: 100\nmax_cycle_ms: [\n", Path::new("x.yaml"))
            .unwrap_err();
        match err {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("expected ParseError, got {other}"),
        }
    }

    #[test]
    fn load_validates() {
        let file = write_temp("min_cycle_ms: 6000\nmax_cycle_ms: 4000\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }), "{err}");
    }

    #[test]
    fn load_reads_seed() {
        let file = write_temp("min_cycle_ms: 50\nmax_cycle_ms: 80\nseed: 42\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn read_skips_validation() {
        let file = write_temp("min_cycle_ms: 6000\nmax_cycle_ms: 4000\n");
        let config = read_config(file.path()).unwrap();
        assert_eq!(config.max_cycle_ms, 4000);
    }

    #[test]
    fn missing_file() {
        let err = load_config(Path::new("/nonexistent/trafficlight.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }), "{err}");
    }
}
