//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{FileConfig, LogConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate logger configuration from TOML text.
pub fn parse_config(content: &str) -> Result<LogConfig, ConfigError> {
    let file: FileConfig = toml::from_str(content)?;
    validate_config(&file.logger).map_err(ConfigError::Validation)?;
    Ok(file.logger)
}

/// Load and validate logger configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LogConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [logger]
            level = "WARN"
            encoding = "console"
            color = true
            disable_stacktrace = true
            dev_mode = true
            disable_caller = true
            output_paths = ["stdout", "/tmp/app.log"]
            error_output_paths = ["stderr"]
            "#,
        )
        .unwrap();

        assert_eq!(config.level, "WARN");
        assert_eq!(config.encoding, "console");
        assert!(config.color && config.disable_stacktrace && config.dev_mode && config.disable_caller);
        assert_eq!(config.output_paths, vec!["stdout", "/tmp/app.log"]);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), LogConfig::default());
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_config("[logger\nlevel = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_everything() {
        let err = parse_config(
            r#"
            [logger]
            level = "loud"
            encoding = "yaml"
            "#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("\"loud\""));
        assert!(message.contains("\"yaml\""));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/logsetup.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
