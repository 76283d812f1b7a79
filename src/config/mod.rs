//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config.toml (data directory)
//!     → loader.rs (read, parse, write, create defaults)
//!     → store.rs (ConfigStore: the one held FrameLimit, main context only)
//!
//! On external edit:
//!     watcher.rs (background thread) detects change to config.toml
//!     → ConfigSignal::Reload scheduled onto the main context
//!     → main context calls ConfigStore::reload_from_disk
//!
//! On /framechunk <n>:
//!     → ConfigStore::set_and_persist (main context)
//! ```
//!
//! # Design Decisions
//! - The limit is owned by a single ConfigStore; no locks, no shared globals
//! - The watcher thread never reads or writes the limit, it only schedules
//! - Absent or malformed `frame-limit` falls back to -1 (unlimited)
//! - Unreadable files keep the previous value

pub mod loader;
pub mod schema;
pub mod store;
pub mod watcher;

pub use loader::{ConfigFile, PersistError, ReadError};
pub use schema::{FrameLimit, InvalidLimit, CONFIG_FILE_NAME, FRAME_LIMIT_KEY};
pub use store::{ConfigStore, Reloaded, SetLimitError};
pub use watcher::{FileWatcher, WatchError, WatcherState};
