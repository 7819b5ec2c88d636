//! Process-wide structured logger setup.
//!
//! Translates a [`LogConfig`] into a tracing-backed [`Logger`] and installs
//! it as the process-wide logger, replacing whatever was there before.

pub mod config;
pub mod logging;

pub use config::LogConfig;
pub use logging::{init_logger, LogError, Logger, LoggerHandle};
