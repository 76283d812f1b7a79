//! Per-chunk item frame limit with live configuration reload.
//!
//! A host embeds [`FrameChunkLimit`], drives it from its single-threaded
//! main context, and drains the [`ConfigSignal`]s produced by the background
//! config watcher on that same context.

pub mod command;
pub mod config;
pub mod enforcement;
pub mod host;
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigStore, FrameLimit};
pub use enforcement::Decision;
pub use lifecycle::{ConfigSignal, FrameChunkLimit, Scheduler};
