//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! on_enable (plugin.rs):
//!     write default config → load limit → start watcher (failure is non-fatal)
//!
//! main context (host loop):
//!     ConfigSignal from scheduler.rs → FrameChunkLimit::handle_signal
//!     placement events             → FrameChunkLimit::on_hanging_place
//!     /framechunk                  → FrameChunkLimit::on_command
//!
//! on_disable (plugin.rs):
//!     interrupt watcher → close watch handle → join thread
//! ```

pub mod plugin;
pub mod scheduler;

pub use plugin::FrameChunkLimit;
pub use scheduler::{ConfigSignal, Scheduler, SchedulerClosed};
