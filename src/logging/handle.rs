//! Atomically replaceable logger slot.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::LogConfig;
use crate::logging::error::LogError;
use crate::logging::logger::Logger;

/// Holds the current [`Logger`] and swaps it out on re-initialization.
///
/// Readers get an `Arc` snapshot; a replacement never tears an in-flight
/// read. Start with [`LoggerHandle::new`], which holds a no-op logger.
pub struct LoggerHandle {
    current: ArcSwap<Logger>,
}

impl LoggerHandle {
    pub fn new() -> Self {
        Self::with_logger(Logger::nop())
    }

    pub fn with_logger(logger: Logger) -> Self {
        Self {
            current: ArcSwap::from_pointee(logger),
        }
    }

    /// Snapshot of the installed logger.
    pub fn current(&self) -> Arc<Logger> {
        self.current.load_full()
    }

    /// Install `logger`, returning the one it replaced.
    pub fn replace(&self, logger: Logger) -> Arc<Logger> {
        self.current.swap(Arc::new(logger))
    }

    /// Build a logger from `config` and install it.
    ///
    /// On error nothing is replaced.
    pub fn init(&self, config: &LogConfig) -> Result<(), LogError> {
        let logger = Logger::build(config)?;
        self.replace(logger);
        Ok(())
    }
}

impl Default for LoggerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("current", &*self.current.load())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn quiet(level: &str) -> LogConfig {
        LogConfig {
            level: level.into(),
            output_paths: vec![],
            error_output_paths: vec![],
            ..LogConfig::default()
        }
    }

    #[test]
    fn test_starts_as_nop() {
        let handle = LoggerHandle::new();
        assert!(!handle.current().enabled(Level::ERROR));
    }

    #[test]
    fn test_failed_init_keeps_previous() {
        let handle = LoggerHandle::new();
        handle.init(&quiet("debug")).unwrap();
        let before = handle.current();

        assert!(handle.init(&quiet("verbose")).is_err());
        assert!(Arc::ptr_eq(&before, &handle.current()));

        let bad_path = LogConfig {
            output_paths: vec!["/nonexistent-dir/sub/out.log".into()],
            ..quiet("info")
        };
        assert!(handle.init(&bad_path).is_err());
        assert!(Arc::ptr_eq(&before, &handle.current()));
    }

    #[test]
    fn test_reinit_replaces() {
        let handle = LoggerHandle::new();
        handle.init(&quiet("error")).unwrap();
        assert!(!handle.current().enabled(Level::INFO));

        handle.init(&quiet("DEBUG")).unwrap();
        assert!(handle.current().enabled(Level::DEBUG));
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let handle = LoggerHandle::new();
        handle.init(&quiet("warn")).unwrap();
        let snapshot = handle.current();

        let old = handle.replace(Logger::nop());
        assert!(Arc::ptr_eq(&snapshot, &old));
        assert!(snapshot.enabled(Level::WARN));
        assert!(!handle.current().enabled(Level::WARN));
    }
}
