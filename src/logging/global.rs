//! Process-wide logger.
//!
//! # Responsibilities
//! - Own the single global [`LoggerHandle`]
//! - Route the `tracing` macros to whichever logger is installed
//! - Re-initialize from configuration
//!
//! # Design Decisions
//! - One registry is installed as tracing's global default on the first
//!   successful init; later inits swap its layer through a reload handle
//! - Spans live in that registry, so they outlast the logger that was
//!   installed when they were created
//! - Initializations are serialized so the handle and the installed layer
//!   always agree

use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{reload, Registry};

use crate::config::LogConfig;
use crate::logging::error::{BuildError, LogError};
use crate::logging::handle::LoggerHandle;
use crate::logging::layer::BoxedLayer;
use crate::logging::logger::Logger;

type ReloadHandle = reload::Handle<BoxedLayer, Registry>;

static GLOBAL: LazyLock<LoggerHandle> = LazyLock::new(LoggerHandle::new);
static RELOAD: Mutex<Option<ReloadHandle>> = Mutex::new(None);

/// The process-wide logger handle.
pub fn global() -> &'static LoggerHandle {
    &GLOBAL
}

/// Snapshot of the process-wide logger.
pub fn current() -> Arc<Logger> {
    GLOBAL.current()
}

/// Build a logger from `config` and make it the process-wide logger.
///
/// The first successful call registers a registry as tracing's global
/// default. Errors leave the previously installed logger untouched.
pub fn init_logger(config: &LogConfig) -> Result<(), LogError> {
    let logger = Logger::build(config)?;

    {
        let mut reload = RELOAD.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = reload.as_ref() {
            handle
                .reload(logger.layer())
                .map_err(BuildError::Reload)?;
        } else {
            *reload = Some(install(logger.layer())?);
        }
        GLOBAL.replace(logger);
    }

    tracing::debug!(
        level = %config.level,
        encoding = %config.encoding,
        "logger initialized"
    );
    Ok(())
}

fn install(layer: BoxedLayer) -> Result<ReloadHandle, BuildError> {
    let (layer, handle) = reload::Layer::new(layer);
    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer))
        .map_err(|_| BuildError::GlobalDefault)?;
    Ok(handle)
}
