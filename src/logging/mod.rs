//! Logger setup.
//!
//! # Data Flow
//! ```text
//! LogConfig
//!     → options.rs (parse level/encoding, pick renderers and keys)
//!     → logger.rs  (open sinks, level filter + fmt layer on a registry)
//!     → handle.rs  (atomic swap into a LoggerHandle)
//!     → global.rs  (reload the layer of tracing's global registry)
//!
//! Each tracing event:
//!     → layer.rs   (span + event fields, caller, stack)
//!     → encoder.rs (JSON object or console line)
//!     → sink.rs    (stdout / stderr / files, write errors to error outputs)
//! ```
//!
//! # Design Decisions
//! - Every init builds from scratch; nothing carries over between calls
//! - A failed init never touches the installed logger
//! - The global logger is a no-op until the first successful init

pub mod encoder;
pub mod error;
pub mod global;
pub mod handle;
mod layer;
pub mod level;
pub mod logger;
pub mod options;
pub mod sink;

pub use error::{BuildError, LogError, LogResult};
pub use global::{current, global, init_logger};
pub use handle::LoggerHandle;
pub use logger::Logger;
pub use options::{EncoderConfig, Encoding, LevelStyle, LoggerOptions, TimeStyle};
