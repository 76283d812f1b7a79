//! Configuration file watcher for hot reload.
//!
//! # State Machine
//! ```text
//! Stopped → Starting: start() called, data directory exists
//! Starting → Running: directory registered, watcher thread spawned
//! Starting → Stopped: watch handle could not be acquired (non-fatal)
//! Running → Stopping: stop() called, or the notification channel closed
//! Stopping → Stopped: watcher thread exited
//! ```
//!
//! The watcher thread blocks on the notification channel, filters events for
//! the config file name and schedules a [`ConfigSignal`] for every qualifying
//! event. It never reads or writes the limit itself.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

use crate::lifecycle::scheduler::{ConfigSignal, Scheduler};
use crate::observability::metrics;

const THREAD_NAME: &str = "frame-limit-watcher";

/// Errors raised while establishing the filesystem observation.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("config directory {} is not accessible: {source}", path.display())]
    MissingDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not create filesystem watcher: {0}")]
    Startup(#[from] notify::Error),

    #[error("could not spawn watcher thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("config watcher is already running")]
    AlreadyRunning,
}

/// Lifecycle state of a [`FileWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

enum WatchMessage {
    Notify(notify::Result<Event>),
    Interrupt,
}

/// Why the watcher loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopExit {
    Interrupted,
    ChannelClosed,
    ConsumerGone,
}

/// Which directory and file name the loop cares about.
#[derive(Debug, Clone)]
struct WatchTarget {
    dir: PathBuf,
    file_name: OsString,
}

impl WatchTarget {
    fn matches(&self, path: &Path) -> bool {
        path.file_name() == Some(self.file_name.as_os_str())
    }

    /// The watched directory itself went away; no further events will arrive.
    fn directory_removed(&self, event: &Event) -> bool {
        event.kind.is_remove() && event.paths.iter().any(|p| p == &self.dir)
    }

    fn signals_for(&self, event: &Event) -> Vec<ConfigSignal> {
        event
            .paths
            .iter()
            .enumerate()
            .filter(|(_, path)| self.matches(path))
            .filter_map(|(index, path)| {
                let path = path.clone();
                match event.kind {
                    EventKind::Create(_) | EventKind::Any => Some(ConfigSignal::Reload { path }),
                    EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                        Some(ConfigSignal::Removed { path })
                    }
                    // Both carries [from, to]
                    EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if index == 0 => {
                        Some(ConfigSignal::Removed { path })
                    }
                    EventKind::Modify(_) => Some(ConfigSignal::Reload { path }),
                    EventKind::Remove(_) => Some(ConfigSignal::Removed { path }),
                    EventKind::Access(_) | EventKind::Other => None,
                }
            })
            .collect()
    }
}

/// A running subscription: the notify handle plus the thread draining it.
struct Subscription {
    watcher: RecommendedWatcher,
    interrupt: Sender<WatchMessage>,
    thread: JoinHandle<()>,
}

/// Watches the data directory and schedules reloads of the config file.
pub struct FileWatcher {
    dir: PathBuf,
    file_name: OsString,
    state: Arc<Mutex<WatcherState>>,
    subscription: Option<Subscription>,
}

impl FileWatcher {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl AsRef<OsStr>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.as_ref().to_os_string(),
            state: Arc::new(Mutex::new(WatcherState::Stopped)),
            subscription: None,
        }
    }

    pub fn state(&self) -> WatcherState {
        *self.state.lock().expect("watcher state mutex poisoned")
    }

    fn set_state(&self, state: WatcherState) {
        set_state(&self.state, state);
    }

    /// Register interest in the data directory and spawn the watcher thread.
    ///
    /// On failure the watcher is left `Stopped`; the caller decides whether
    /// that is fatal. A watcher whose thread already exited on its own can be
    /// started again.
    pub fn start<S: Scheduler>(&mut self, scheduler: S) -> Result<(), WatchError> {
        if self.subscription.is_some() {
            if self.state() != WatcherState::Stopped {
                return Err(WatchError::AlreadyRunning);
            }
            // Thread is gone but the notify handle is still held
            self.release();
        }

        self.set_state(WatcherState::Starting);
        match self.subscribe(scheduler) {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                tracing::info!(path = %self.dir.display(), "Config watcher started");
                Ok(())
            }
            Err(e) => {
                self.set_state(WatcherState::Stopped);
                Err(e)
            }
        }
    }

    fn subscribe<S: Scheduler>(&self, scheduler: S) -> Result<Subscription, WatchError> {
        let dir = fs::canonicalize(&self.dir).map_err(|source| WatchError::MissingDirectory {
            path: self.dir.clone(),
            source,
        })?;

        let (tx, rx) = mpsc::channel();
        let notify_tx = tx.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = notify_tx.send(WatchMessage::Notify(res));
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let target = WatchTarget {
            dir,
            file_name: self.file_name.clone(),
        };
        let state = Arc::clone(&self.state);

        // Running before spawn so the thread's own exit transition always wins
        self.set_state(WatcherState::Running);
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let exit = run_loop(&rx, &target, &scheduler);
                set_state(&state, WatcherState::Stopping);
                match exit {
                    LoopExit::Interrupted => tracing::debug!("Config watcher interrupted"),
                    LoopExit::ChannelClosed => {
                        tracing::warn!("Config watch channel closed; hot reload disabled")
                    }
                    LoopExit::ConsumerGone => {
                        tracing::warn!("Main task queue closed; stopping config watcher")
                    }
                }
                set_state(&state, WatcherState::Stopped);
            })
            .map_err(WatchError::Spawn)?;

        Ok(Subscription {
            watcher,
            interrupt: tx,
            thread,
        })
    }

    /// Interrupt the watcher thread, release the notify watch handle and wait
    /// for the thread to exit. Calling this again, or without a successful
    /// start, is a no-op.
    pub fn stop(&mut self) {
        if self.release() {
            tracing::info!("Config watcher stopped");
        }
    }

    /// Tear down the current subscription, if any. Returns whether there was
    /// one.
    fn release(&mut self) -> bool {
        let Some(subscription) = self.subscription.take() else {
            return false;
        };

        if self.state() != WatcherState::Stopped {
            self.set_state(WatcherState::Stopping);
        }
        let Subscription {
            watcher,
            interrupt,
            thread,
        } = subscription;

        // The thread may already have exited on its own
        let _ = interrupt.send(WatchMessage::Interrupt);
        drop(interrupt);
        drop(watcher);

        if thread.join().is_err() {
            tracing::error!("Config watcher thread panicked");
        }
        self.set_state(WatcherState::Stopped);
        true
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn set_state(state: &Mutex<WatcherState>, next: WatcherState) {
    *state.lock().expect("watcher state mutex poisoned") = next;
}

/// Block on the channel, process each batch in full, then check for exit.
fn run_loop<S: Scheduler>(rx: &Receiver<WatchMessage>, target: &WatchTarget, scheduler: &S) -> LoopExit {
    loop {
        let first = match rx.recv() {
            Ok(message) => message,
            Err(_) => return LoopExit::ChannelClosed,
        };
        let batch: Vec<WatchMessage> = std::iter::once(first).chain(rx.try_iter()).collect();

        let mut exit = None;
        // One rename can surface as both From and Both events
        let mut removed: HashSet<PathBuf> = HashSet::new();
        for message in batch {
            match message {
                WatchMessage::Interrupt => {
                    exit.get_or_insert(LoopExit::Interrupted);
                }
                WatchMessage::Notify(Ok(event)) => {
                    if target.directory_removed(&event) {
                        exit.get_or_insert(LoopExit::ChannelClosed);
                        continue;
                    }
                    for signal in target.signals_for(&event) {
                        match &signal {
                            ConfigSignal::Reload { path } => {
                                removed.remove(path);
                            }
                            ConfigSignal::Removed { path } => {
                                if !removed.insert(path.clone()) {
                                    continue;
                                }
                            }
                        }
                        tracing::debug!(signal = ?signal, "Config file change detected");
                        metrics::record_watcher_signal(&signal);
                        if scheduler.schedule(signal).is_err() {
                            exit.get_or_insert(LoopExit::ConsumerGone);
                        }
                    }
                }
                WatchMessage::Notify(Err(e)) => {
                    tracing::warn!(error = %e, "Filesystem watch error");
                }
            }
        }

        if let Some(exit) = exit {
            return exit;
        }
    }
}
