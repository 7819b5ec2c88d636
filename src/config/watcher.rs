//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by renaming a temporary file over the original keep working.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::LogConfig;
use crate::logging::LogError;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<LogConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<LogConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// Only changes that load into a configuration different from the last
    /// one seen are sent. The returned watcher must be kept alive for events
    /// to flow.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let mut changes = ChangeFilter::new(self.path.clone());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Some(config) = changes.accept(&event) {
                        if let Err(e) = tx.send(config) {
                            tracing::warn!(error = %e, "Logger config receiver dropped, update lost");
                        }
                    }
                }
                Err(e) => tracing::error!(error = %e, "Logger config watch error"),
            },
            Config::default(),
        )?;

        watcher.watch(watch_dir(&self.path), RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Logger config watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Turns raw file system events into configuration updates.
struct ChangeFilter {
    path: PathBuf,
    last: Option<LogConfig>,
}

impl ChangeFilter {
    fn new(path: PathBuf) -> Self {
        let last = load_config(&path).ok();
        Self { path, last }
    }

    /// The new configuration, if `event` changed the watched file's content.
    ///
    /// One save usually produces several events; all but the first that
    /// yields a new configuration are dropped.
    fn accept(&mut self, event: &Event) -> Option<LogConfig> {
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return None;
        }
        let name = self.path.file_name()?;
        if !event.paths.iter().any(|p| p.file_name() == Some(name)) {
            return None;
        }

        match load_config(&self.path) {
            Ok(config) if self.last.as_ref() == Some(&config) => None,
            Ok(config) => {
                tracing::info!(path = ?self.path, "Logger config change detected, reloading");
                self.last = Some(config.clone());
                Some(config)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to reload logger config: {}. Keeping current logger.",
                    e
                );
                None
            }
        }
    }
}

/// Apply every configuration received on `updates` until the channel closes.
///
/// A failed initialization keeps the previous logger; the error is logged
/// through whichever logger is still installed. Returns how many updates
/// were applied successfully.
pub async fn apply_updates<F>(mut updates: mpsc::UnboundedReceiver<LogConfig>, mut init: F) -> usize
where
    F: FnMut(&LogConfig) -> Result<(), LogError>,
{
    let mut applied = 0;
    while let Some(config) = updates.recv().await {
        match init(&config) {
            Ok(()) => {
                applied += 1;
                tracing::info!(level = %config.level, encoding = %config.encoding, "Logger reconfigured");
            }
            Err(e) => tracing::error!(error = %e, "Rejected logger config update"),
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LoggerHandle;
    use notify::event::{AccessKind, DataChange, EventKind, ModifyKind};

    fn write_level(path: &Path, level: &str) {
        std::fs::write(path, format!("[logger]\nlevel = \"{level}\"\n")).unwrap();
    }

    fn modified(path: &Path) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(path.to_path_buf())
    }

    #[test]
    fn test_change_filter_collapses_repeats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logsetup.toml");
        write_level(&path, "info");
        let mut changes = ChangeFilter::new(path.clone());

        // Unchanged content.
        assert!(changes.accept(&modified(&path)).is_none());

        write_level(&path, "debug");
        let config = changes.accept(&modified(&path)).unwrap();
        assert_eq!(config.level, "debug");
        assert!(changes.accept(&modified(&path)).is_none());
    }

    #[test]
    fn test_change_filter_ignores_unrelated_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logsetup.toml");
        write_level(&path, "info");
        let mut changes = ChangeFilter::new(path.clone());
        write_level(&path, "warn");

        assert!(changes.accept(&modified(&dir.path().join("other.toml"))).is_none());
        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path(path.clone());
        assert!(changes.accept(&access).is_none());

        assert_eq!(changes.accept(&modified(&path)).unwrap().level, "warn");
    }

    #[test]
    fn test_change_filter_skips_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logsetup.toml");
        write_level(&path, "info");
        let mut changes = ChangeFilter::new(path.clone());

        write_level(&path, "verbose");
        assert!(changes.accept(&modified(&path)).is_none());

        write_level(&path, "error");
        assert_eq!(changes.accept(&modified(&path)).unwrap().level, "error");
    }

    #[tokio::test]
    async fn test_watcher_delivers_changed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logsetup.toml");
        write_level(&path, "info");

        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let _watcher = watcher.run().unwrap();

        write_level(&path, "debug");

        let config = tokio::time::timeout(Duration::from_secs(10), updates.recv())
            .await
            .expect("no config update within 10s")
            .unwrap();
        assert_eq!(config.level, "debug");
    }

    #[tokio::test]
    async fn test_apply_updates_skips_failures() {
        let handle = LoggerHandle::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let good = LogConfig {
            level: "debug".into(),
            output_paths: vec![],
            error_output_paths: vec![],
            ..LogConfig::default()
        };
        let bad = LogConfig {
            level: "verbose".into(),
            ..good.clone()
        };

        tx.send(good).unwrap();
        tx.send(bad).unwrap();
        drop(tx);

        let applied = apply_updates(rx, |config| handle.init(config)).await;
        assert_eq!(applied, 1);
        assert!(handle.current().enabled(tracing::Level::DEBUG));
    }
}
