//! Shared utilities for integration tests.

use std::fs;
use std::path::Path;
use std::time::Duration;

use frame_chunk_limit::{ConfigSignal, FrameChunkLimit};
use tokio::sync::mpsc;

/// How long to wait for the OS to report a file change.
#[allow(dead_code)]
pub const WATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Enable the limit in a fresh data directory.
pub fn enable_in(
    dir: &Path,
) -> (FrameChunkLimit, mpsc::UnboundedReceiver<ConfigSignal>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let plugin = FrameChunkLimit::on_enable(dir, tx);
    (plugin, rx)
}

/// Overwrite config.toml the way an operator's editor would.
#[allow(dead_code)]
pub fn write_config(dir: &Path, content: &str) {
    fs::write(dir.join("config.toml"), content).expect("write config");
}

/// Drain signals on the calling task, the way a host main loop does, until
/// `done` holds or the timeout expires.
#[allow(dead_code)]
pub async fn drive_until<F>(
    plugin: &mut FrameChunkLimit,
    rx: &mut mpsc::UnboundedReceiver<ConfigSignal>,
    mut done: F,
) -> bool
where
    F: FnMut(&FrameChunkLimit, &ConfigSignal) -> bool,
{
    let deadline = tokio::time::Instant::now() + WATCH_TIMEOUT;
    loop {
        let signal = match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Some(signal)) => signal,
            Ok(None) | Err(_) => return false,
        };
        plugin.handle_signal(signal.clone());
        if done(plugin, &signal) {
            return true;
        }
    }
}
