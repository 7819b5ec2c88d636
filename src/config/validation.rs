//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the level parses and the encoding is known
//! - Reject blank destination entries
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogConfig → Result<(), Vec<ValidationError>>
//! - Destinations are not opened here; that happens when the logger is built

use thiserror::Error;

use crate::config::schema::LogConfig;
use crate::logging::level::parse_level;
use crate::logging::options::Encoding;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown log level {0:?}")]
    Level(String),

    #[error("unknown encoding {0:?} (expected \"json\" or \"console\")")]
    Encoding(String),

    #[error("{field}[{index}] is empty")]
    EmptyPath { field: &'static str, index: usize },
}

/// Check a configuration, collecting every error found.
pub fn validate_config(config: &LogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if parse_level(&config.level).is_err() {
        errors.push(ValidationError::Level(config.level.clone()));
    }

    if config.encoding.parse::<Encoding>().is_err() {
        errors.push(ValidationError::Encoding(config.encoding.clone()));
    }

    for (field, paths) in [
        ("output_paths", &config.output_paths),
        ("error_output_paths", &config.error_output_paths),
    ] {
        for (index, path) in paths.iter().enumerate() {
            if path.trim().is_empty() {
                errors.push(ValidationError::EmptyPath { field, index });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
