//! Logger initialization errors.

use thiserror::Error;
use tracing::level_filters::ParseLevelFilterError;

/// Errors returned by logger initialization.
///
/// Either kind leaves the previously installed logger in place.
#[derive(Debug, Error)]
pub enum LogError {
    /// The configured level is not a known severity tier.
    #[error("could not determine log level: {source}")]
    InvalidLevel {
        level: String,
        #[source]
        source: ParseLevelFilterError,
    },

    /// Building the logger from the resolved options failed.
    #[error("could not build log config: {0}")]
    Build(#[from] BuildError),
}

/// Failures while constructing a logger from resolved options.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no encoder registered for name {0:?}")]
    UnknownEncoding(String),

    #[error("couldn't open sink {path:?}: {source}")]
    OpenSink {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no sink found for scheme {scheme:?} in {path:?}")]
    UnsupportedScheme { scheme: String, path: String },

    #[error("invalid file URL {path:?}: {reason}")]
    InvalidFileUrl { path: String, reason: &'static str },

    #[error("another global tracing subscriber is already installed")]
    GlobalDefault,

    #[error("couldn't swap the global logger: {0}")]
    Reload(#[source] tracing_subscriber::reload::Error),
}

/// Result type for logger initialization.
pub type LogResult<T> = Result<T, LogError>;
