//! Severity tier parsing and labels.

use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::logging::error::LogError;

/// Parse a configured level into a filter.
///
/// Accepts `trace`, `debug`, `info`, `warn`, `error` and `off` in any case,
/// plus the numeric tiers `0` (off), `1` (error) through `5` (trace). An
/// empty string means `info`. `dpanic`, `panic` and `fatal` have no tier of
/// their own and filter like `error`. Surrounding whitespace is not allowed.
pub fn parse_level(level: &str) -> Result<LevelFilter, LogError> {
    match level.to_ascii_lowercase().as_str() {
        "" => Ok(LevelFilter::INFO),
        "dpanic" | "panic" | "fatal" => Ok(LevelFilter::ERROR),
        _ => LevelFilter::from_str(level).map_err(|source| LogError::InvalidLevel {
            level: level.to_string(),
            source,
        }),
    }
}

/// Lowercase label used by the structured encoding.
pub fn lowercase_label(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Uppercase label used by the colorized console encoding.
pub fn capital_label(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARN",
        Level::ERROR => "ERROR",
    }
}

/// ANSI foreground color code for a level.
pub fn ansi_color(level: &Level) -> u8 {
    match *level {
        Level::TRACE => 36,
        Level::DEBUG => 35,
        Level::INFO => 34,
        Level::WARN => 33,
        Level::ERROR => 31,
    }
}

/// `true` when `level` is at least as severe as `threshold`.
///
/// tracing orders levels by verbosity, so ERROR is the *smallest* level.
pub fn at_least(level: &Level, threshold: &Level) -> bool {
    level <= threshold
}
