//! The single owner of the current frame limit.
//!
//! A `ConfigStore` lives on the main execution context and is never shared
//! with the watcher thread. Reads and writes therefore need no locking; the
//! watcher only asks the main context to call [`ConfigStore::reload_from_disk`].

use thiserror::Error;

use crate::config::loader::{ConfigFile, PersistError, ReadError};
use crate::config::schema::{FrameLimit, InvalidLimit, LimitField};

/// Error returned by [`ConfigStore::set_and_persist`].
#[derive(Debug, Error)]
pub enum SetLimitError {
    #[error("invalid limit: {0}")]
    Invalid(#[from] InvalidLimit),

    #[error("limit was not saved: {0}")]
    Persist(#[from] PersistError),
}

/// Result of a reload: the value held before and after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reloaded {
    pub previous: FrameLimit,
    pub current: FrameLimit,
}

impl Reloaded {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

#[derive(Debug)]
pub struct ConfigStore {
    file: ConfigFile,
    limit: FrameLimit,
}

impl ConfigStore {
    /// Read the initial limit. A missing or unreadable file yields unlimited.
    pub fn load(file: ConfigFile) -> Self {
        let limit = match file.read_limit() {
            Ok(field) => {
                warn_if_malformed(&field);
                field.limit()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read config; starting with no frame limit");
                FrameLimit::UNLIMITED
            }
        };
        Self { file, limit }
    }

    /// Current limit. Never blocks.
    pub fn get(&self) -> FrameLimit {
        self.limit
    }

    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    /// Validate, store and write a new limit.
    ///
    /// When the write fails the previous value is restored, so `get()` never
    /// reports a limit that is not on disk.
    pub fn set_and_persist(&mut self, value: i64) -> Result<FrameLimit, SetLimitError> {
        let limit = FrameLimit::new(value)?;
        let previous = std::mem::replace(&mut self.limit, limit);

        if let Err(e) = self.file.write_limit(limit) {
            self.limit = previous;
            return Err(e.into());
        }
        Ok(limit)
    }

    /// Re-read the file and replace the held value.
    ///
    /// On error the held value is left unchanged.
    pub fn reload_from_disk(&mut self) -> Result<Reloaded, ReadError> {
        let field = self.file.read_limit()?;
        warn_if_malformed(&field);

        let previous = std::mem::replace(&mut self.limit, field.limit());
        Ok(Reloaded {
            previous,
            current: self.limit,
        })
    }
}

fn warn_if_malformed(field: &LimitField) {
    if let LimitField::Malformed(value) = field {
        tracing::warn!(value = %value, "frame-limit is not a valid limit; using -1 (unlimited)");
    }
}
