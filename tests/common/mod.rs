//! Shared utilities for integration tests.

use std::path::{Path, PathBuf};

use logsetup::LogConfig;
use serde_json::Value;
use tempfile::TempDir;

/// A temporary directory holding log destinations.
pub struct LogDir {
    dir: TempDir,
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// A config writing entries to `name` inside this directory.
    pub fn config(&self, name: &str) -> LogConfig {
        LogConfig {
            output_paths: vec![self.path(name).display().to_string()],
            error_output_paths: vec![],
            ..LogConfig::default()
        }
    }
}

/// Read a log file, empty if it was never created.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

/// Parse every line of a JSON log file.
#[allow(dead_code)]
pub fn json_lines(path: &Path) -> Vec<Value> {
    read(path)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Emit one event per level through whatever dispatcher is current.
pub fn emit_all_levels() {
    tracing::trace!("trace entry");
    tracing::debug!("debug entry");
    tracing::info!("info entry");
    tracing::warn!("warn entry");
    tracing::error!("error entry");
}
