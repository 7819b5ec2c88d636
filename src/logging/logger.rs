//! The built logger.

use std::io;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Level};
use tracing_subscriber::layer::SubscriberExt;

use crate::config::LogConfig;
use crate::logging::encoder::encoder_for;
use crate::logging::error::LogError;
use crate::logging::layer::{entry_layer, BoxedLayer, EntryFormat};
use crate::logging::options::LoggerOptions;
use crate::logging::sink::{Output, Sinks};

/// A fully built logger: level filter, encoder and open destinations behind
/// a tracing [`Dispatch`].
pub struct Logger {
    dispatch: Dispatch,
    level: LevelFilter,
    development: bool,
    format: EntryFormat,
    output: Output,
    outputs: Arc<Sinks>,
    error_outputs: Arc<Sinks>,
}

impl Logger {
    /// A logger that discards everything.
    pub fn nop() -> Self {
        let options = LoggerOptions::production();
        let outputs = Sinks::default();
        let error_outputs = Sinks::default();

        Self {
            dispatch: Dispatch::none(),
            level: LevelFilter::OFF,
            development: false,
            format: EntryFormat::new(
                encoder_for(options.encoding, options.encoder),
                true,
                None,
            ),
            output: Output::new(&outputs, &error_outputs),
            outputs: Arc::new(outputs),
            error_outputs: Arc::new(error_outputs),
        }
    }

    /// Resolve `config` and build a logger from it.
    pub fn build(config: &LogConfig) -> Result<Self, LogError> {
        LoggerOptions::from_config(config)?.build()
    }

    /// Build from already resolved options.
    pub fn from_options(options: &LoggerOptions) -> Result<Self, LogError> {
        let outputs = Sinks::open(&options.output_paths)?;
        let error_outputs = Sinks::open(&options.error_output_paths)?;

        let format = EntryFormat::new(
            encoder_for(options.encoding, options.encoder.clone()),
            options.disable_caller,
            options.stacktrace_level(),
        );
        let output = Output::new(&outputs, &error_outputs);

        let subscriber = tracing_subscriber::registry().with(entry_layer(
            options.level,
            format.clone(),
            output.clone(),
        ));

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            level: options.level,
            development: options.development,
            format,
            output,
            outputs: Arc::new(outputs),
            error_outputs: Arc::new(error_outputs),
        })
    }

    /// The dispatcher that receives this logger's events.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// A fresh layer with this logger's filter, format and destinations.
    ///
    /// Used to install the logger into a registry other than its own.
    pub(crate) fn layer(&self) -> BoxedLayer {
        entry_layer(self.level, self.format.clone(), self.output.clone())
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Whether an event at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    /// Run `f` with this logger as the current thread's default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Flush every output destination.
    pub fn sync(&self) -> io::Result<()> {
        self.outputs.flush()?;
        self.error_outputs.flush()
    }

    /// Log `message` at error level, then panic in development mode.
    ///
    /// For conditions that are bugs, but not worth crashing production over.
    pub fn dpanic(&self, message: &str) {
        self.in_scope(|| tracing::error!(dpanic = true, "{}", message));
        if self.development {
            panic!("{message}");
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::nop()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("development", &self.development)
            .field("outputs", &self.outputs.len())
            .field("error_outputs", &self.error_outputs.len())
            .finish()
    }
}

impl LoggerOptions {
    /// Build a logger from these options.
    pub fn build(&self) -> Result<Logger, LogError> {
        Logger::from_options(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_into(path: &std::path::Path) -> LogConfig {
        LogConfig {
            output_paths: vec![path.display().to_string()],
            error_output_paths: vec![],
            ..LogConfig::default()
        }
    }

    #[test]
    fn test_nop_discards() {
        let logger = Logger::nop();
        assert!(!logger.enabled(Level::ERROR));
        logger.in_scope(|| tracing::error!("nobody hears this"));
        assert!(logger.sync().is_ok());
    }

    #[test]
    fn test_level_filtering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let config = LogConfig {
            level: "warn".into(),
            ..config_into(&path)
        };
        let logger = Logger::build(&config).unwrap();

        logger.in_scope(|| {
            tracing::debug!("dropped");
            tracing::info!("dropped");
            tracing::warn!("kept");
            tracing::error!("kept");
        });

        let output = std::fs::read_to_string(&path).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert!(!output.contains("dropped"));
        assert!(logger.enabled(Level::WARN));
        assert!(!logger.enabled(Level::INFO));
    }

    #[test]
    fn test_build_failure_on_bad_destination() {
        let config = LogConfig {
            output_paths: vec!["/nonexistent-dir/sub/out.log".into()],
            ..LogConfig::default()
        };
        assert!(matches!(Logger::build(&config), Err(LogError::Build(_))));
    }

    #[test]
    fn test_error_output_checked_too() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            error_output_paths: vec!["ftp://example.com/errors".into()],
            ..config_into(&dir.path().join("out.log"))
        };
        assert!(matches!(Logger::build(&config), Err(LogError::Build(_))));
    }

    #[test]
    fn test_dpanic_logs_in_production() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let logger = Logger::build(&config_into(&path)).unwrap();

        logger.dpanic("invariant broken");

        let output = std::fs::read_to_string(&path).unwrap();
        assert!(output.contains("invariant broken"));
        assert!(output.contains("\"dpanic\":true"));
    }

    #[test]
    #[should_panic(expected = "invariant broken")]
    fn test_dpanic_panics_in_development() {
        let config = LogConfig {
            dev_mode: true,
            output_paths: vec![],
            error_output_paths: vec![],
            ..LogConfig::default()
        };
        Logger::build(&config).unwrap().dpanic("invariant broken");
    }
}
