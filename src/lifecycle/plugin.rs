//! Startup, shutdown and main-context dispatch.

use std::path::PathBuf;

use crate::command::{self, CommandOutcome, COMMAND_NAME};
use crate::config::{ConfigFile, ConfigStore, FileWatcher, FrameLimit, ReadError, WatcherState};
use crate::enforcement::{self, Decision};
use crate::host::{Chunk, CommandSender, HangingPlaceEvent};
use crate::lifecycle::scheduler::{ConfigSignal, Scheduler};
use crate::observability::metrics;

/// The frame limit as the host sees it.
///
/// Must live on the host's main execution context; every method here runs
/// there. Only the watcher thread runs elsewhere, and it reaches this type
/// solely through the scheduler passed to [`FrameChunkLimit::on_enable`].
pub struct FrameChunkLimit {
    store: ConfigStore,
    watcher: FileWatcher,
    enabled: bool,
}

impl FrameChunkLimit {
    /// Create the config if absent, read the limit and start watching the
    /// data directory.
    ///
    /// Never fails: an unwritable data directory leaves the limit unlimited
    /// and the watcher stopped, with the cause logged.
    pub fn on_enable<S: Scheduler>(data_dir: impl Into<PathBuf>, scheduler: S) -> Self {
        let file = ConfigFile::new(data_dir);
        if let Err(e) = file.save_default() {
            tracing::error!(
                error = %e,
                path = %file.path().display(),
                "Could not write default configuration"
            );
        }

        let store = ConfigStore::load(file);
        metrics::record_limit(store.get());

        let mut watcher = FileWatcher::new(store.file().dir(), store.file().file_name());
        if let Err(e) = watcher.start(scheduler) {
            tracing::error!(
                error = %e,
                "Could not start config watcher; edits to the config file will not be picked up"
            );
        }

        tracing::info!(limit = %store.get(), "FrameChunkLimit enabled");
        Self {
            store,
            watcher,
            enabled: true,
        }
    }

    /// Stop the watcher. Safe to call more than once.
    pub fn on_disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        self.watcher.stop();
        tracing::info!("FrameChunkLimit disabled");
    }

    pub fn limit(&self) -> FrameLimit {
        self.store.get()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn watcher_state(&self) -> WatcherState {
        self.watcher.state()
    }

    /// Apply a signal scheduled by the watcher.
    pub fn handle_signal(&mut self, signal: ConfigSignal) {
        if !self.enabled {
            tracing::debug!(signal = ?signal, "Ignoring config signal after disable");
            return;
        }

        match signal {
            ConfigSignal::Reload { path } => match self.store.reload_from_disk() {
                Ok(reloaded) if reloaded.changed() => {
                    metrics::record_reload("changed");
                    metrics::record_limit(reloaded.current);
                    tracing::info!(
                        old = %reloaded.previous,
                        new = %reloaded.current,
                        path = %path.display(),
                        "Auto-reloaded frame limit from config"
                    );
                }
                Ok(_) => {
                    metrics::record_reload("unchanged");
                    tracing::debug!(path = %path.display(), "Config reloaded, frame limit unchanged");
                }
                Err(ReadError::Missing { .. }) => {
                    metrics::record_reload("missing");
                    tracing::warn!(
                        limit = %self.store.get(),
                        path = %path.display(),
                        "Config file is gone; keeping last known frame limit"
                    );
                }
                Err(e) => {
                    metrics::record_reload("failed");
                    tracing::warn!(
                        error = %e,
                        limit = %self.store.get(),
                        "Failed to reload config; keeping current frame limit"
                    );
                }
            },
            ConfigSignal::Removed { path } => {
                tracing::warn!(
                    limit = %self.store.get(),
                    path = %path.display(),
                    "Config file removed; keeping last known frame limit"
                );
            }
        }
    }

    /// Placement event hook.
    pub fn on_hanging_place<C: Chunk>(&self, event: &mut HangingPlaceEvent<'_, C>) -> Decision {
        enforcement::on_hanging_place(self.store.get(), event)
    }

    /// Command hook. Returns `false` when `label` is not ours.
    pub fn on_command(&mut self, sender: &dyn CommandSender, label: &str, args: &[&str]) -> bool {
        if !label.eq_ignore_ascii_case(COMMAND_NAME) {
            return false;
        }
        if let CommandOutcome::Updated(limit) = command::execute(&mut self.store, sender, args) {
            metrics::record_limit(limit);
        }
        true
    }
}

impl Drop for FrameChunkLimit {
    fn drop(&mut self) {
        self.on_disable();
    }
}
