//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, [logger] table)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LogConfig (validated, immutable)
//!     → logging::init_logger
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → apply_updates re-initializes the logger
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{FileConfig, LogConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::{apply_updates, ConfigWatcher};
