//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration file layout.
///
/// Logger settings live under a `[logger]` table so the file can be shared
/// with the rest of a service's configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// Logger settings.
    pub logger: LogConfig,
}

/// Logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum severity (trace, debug, info, warn, error).
    pub level: String,

    /// Entry encoding ("json" or "console").
    pub encoding: String,

    /// Colorize level labels (console encoding only).
    pub color: bool,

    /// Suppress automatic stack capture.
    pub disable_stacktrace: bool,

    /// Development mode: earlier stack capture, `dpanic` panics.
    pub dev_mode: bool,

    /// Suppress the caller field on every entry.
    pub disable_caller: bool,

    /// Destinations for log entries (paths, `file://` URLs, stdout, stderr).
    pub output_paths: Vec<String>,

    /// Destinations for the logger's own internal errors.
    pub error_output_paths: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            encoding: "json".to_string(),
            color: false,
            disable_stacktrace: false,
            dev_mode: false,
            disable_caller: false,
            output_paths: vec!["stderr".to_string()],
            error_output_paths: vec!["stderr".to_string()],
        }
    }
}
