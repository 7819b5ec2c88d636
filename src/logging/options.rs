//! Translation of a [`LogConfig`] into resolved logger options.
//!
//! `LoggerOptions` is the builder state: everything the logger needs,
//! already parsed and defaulted, but with no files opened yet.

use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::config::LogConfig;
use crate::logging::error::{BuildError, LogError};
use crate::logging::level::parse_level;

/// Entry encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// One JSON object per line.
    Json,
    /// Tab-separated human-readable text.
    Console,
}

impl FromStr for Encoding {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "console" => Ok(Self::Console),
            other => Err(BuildError::UnknownEncoding(other.to_string())),
        }
    }
}

/// How level labels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStyle {
    /// `info`, `warn`, ...
    Lowercase,
    /// `INFO` wrapped in an ANSI color escape.
    CapitalColor,
}

/// How entry timestamps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStyle {
    /// Floating point seconds since the Unix epoch.
    EpochSeconds,
    /// Local time, `2006-01-02T15:04:05.000-0700`.
    Iso8601,
}

/// Field names and renderers shared by both encoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub message_key: &'static str,
    pub level_key: &'static str,
    pub caller_key: &'static str,
    pub time_key: &'static str,
    pub stacktrace_key: &'static str,
    pub level_style: LevelStyle,
    pub time_style: TimeStyle,
}

impl EncoderConfig {
    /// Production encoder defaults.
    pub fn production() -> Self {
        Self {
            message_key: "msg",
            level_key: "level",
            caller_key: "caller",
            time_key: "ts",
            stacktrace_key: "stacktrace",
            level_style: LevelStyle::Lowercase,
            time_style: TimeStyle::EpochSeconds,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Resolved logger options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerOptions {
    pub level: LevelFilter,
    pub encoding: Encoding,
    pub encoder: EncoderConfig,
    pub disable_stacktrace: bool,
    pub disable_caller: bool,
    pub development: bool,
    pub output_paths: Vec<String>,
    pub error_output_paths: Vec<String>,
}

impl LoggerOptions {
    /// Production defaults: info level, JSON, stderr for everything.
    ///
    /// There is no sampling stage; every entry that passes the level filter
    /// is written.
    pub fn production() -> Self {
        Self {
            level: LevelFilter::INFO,
            encoding: Encoding::Json,
            encoder: EncoderConfig::production(),
            disable_stacktrace: false,
            disable_caller: false,
            development: false,
            output_paths: vec!["stderr".to_string()],
            error_output_paths: vec!["stderr".to_string()],
        }
    }

    /// Resolve a configuration into options.
    ///
    /// Fails on an unknown level or encoding. Destinations are only checked
    /// when the logger is built.
    pub fn from_config(config: &LogConfig) -> Result<Self, LogError> {
        let mut options = Self::production();

        options.level = parse_level(&config.level)?;
        options.encoding = config.encoding.parse()?;

        // Color only makes sense for terminal text; JSON stays clean.
        if config.color && options.encoding == Encoding::Console {
            options.encoder.level_style = LevelStyle::CapitalColor;
        }

        options.disable_stacktrace = config.disable_stacktrace;
        options.disable_caller = config.disable_caller;

        if options.encoding == Encoding::Console {
            options.encoder.time_style = TimeStyle::Iso8601;
        }

        options.encoder.message_key = "msg";
        options.encoder.level_key = "level";
        options.encoder.caller_key = "caller";

        options.development = config.dev_mode;

        options.output_paths = config.output_paths.clone();
        options.error_output_paths = config.error_output_paths.clone();

        Ok(options)
    }

    /// Lowest severity that gets a stack trace attached, if any.
    pub fn stacktrace_level(&self) -> Option<Level> {
        if self.disable_stacktrace {
            None
        } else if self.development {
            Some(Level::WARN)
        } else {
            Some(Level::ERROR)
        }
    }
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self::production()
    }
}
