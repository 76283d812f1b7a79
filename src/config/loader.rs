//! Configuration file access on disk.
//!
//! Only [`ConfigStore`](crate::config::store::ConfigStore) talks to this
//! module; nothing else reads or writes the file directly.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{DefaultConfig, FrameLimit, LimitField, CONFIG_FILE_NAME, FRAME_LIMIT_KEY};

/// Error type for reading the configuration file.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("config file {} does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Error type for writing the configuration file.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Location of the configuration file inside a data directory.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    dir: PathBuf,
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let dir = data_dir.into();
        let path = dir.join(CONFIG_FILE_NAME);
        Self { dir, path }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &OsStr {
        OsStr::new(CONFIG_FILE_NAME)
    }

    /// Create the data directory and write the default document if the file
    /// does not exist yet. Returns `true` when defaults were written.
    pub fn save_default(&self) -> Result<bool, PersistError> {
        if self.path.exists() {
            return Ok(false);
        }
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let content = toml::to_string(&DefaultConfig::default())?;
        self.write_content(&content)?;
        tracing::info!(path = %self.path.display(), "Wrote default configuration");
        Ok(true)
    }

    /// Read and parse the whole document.
    pub fn read_table(&self) -> Result<toml::Table, ReadError> {
        let content = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ReadError::Missing {
                    path: self.path.clone(),
                }
            } else {
                ReadError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        toml::from_str(&content).map_err(|source| ReadError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Read the document and extract the limit field.
    pub fn read_limit(&self) -> Result<LimitField, ReadError> {
        self.read_table().map(|table| LimitField::from_table(&table))
    }

    /// Write `limit` under `frame-limit`, keeping every other key in the file.
    pub fn write_limit(&self, limit: FrameLimit) -> Result<(), PersistError> {
        let mut table = match self.read_table() {
            Ok(table) => table,
            Err(ReadError::Missing { .. }) => toml::Table::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Existing config could not be read; rewriting it");
                toml::Table::new()
            }
        };
        table.insert(
            FRAME_LIMIT_KEY.to_string(),
            toml::Value::Integer(i64::from(limit.get())),
        );

        let content = toml::to_string(&table)?;
        self.write_content(&content)
    }

    fn write_content(&self, content: &str) -> Result<(), PersistError> {
        let io_err = |source| PersistError::Io {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&self.path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes()).map_err(io_err)?;
        writer.flush().map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_default_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(root.path().join("plugins").join("FrameChunkLimit"));

        assert!(file.save_default().unwrap());
        assert!(file.path().exists());
        assert_eq!(file.read_limit().unwrap(), LimitField::Present(FrameLimit::UNLIMITED));

        // Second call leaves the existing file alone
        fs::write(file.path(), "frame-limit = 9\n").unwrap();
        assert!(!file.save_default().unwrap());
        assert_eq!(file.read_limit().unwrap().limit().get(), 9);
    }

    #[test]
    fn test_read_missing_file() {
        let root = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(root.path());
        assert!(matches!(file.read_table(), Err(ReadError::Missing { .. })));
    }

    #[test]
    fn test_read_unparseable_file() {
        let root = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(root.path());
        fs::write(file.path(), "frame-limit = = 3").unwrap();
        assert!(matches!(file.read_table(), Err(ReadError::Parse { .. })));
    }

    #[test]
    fn test_write_limit_preserves_other_keys() {
        let root = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(root.path());
        fs::write(file.path(), "frame-limit = 1\nmotd = \"hello\"\n").unwrap();

        file.write_limit(FrameLimit::new(6).unwrap()).unwrap();

        let table = file.read_table().unwrap();
        assert_eq!(table.get("frame-limit"), Some(&toml::Value::Integer(6)));
        assert_eq!(table.get("motd"), Some(&toml::Value::String("hello".into())));
    }

    #[test]
    fn test_write_limit_into_directory_fails() {
        let root = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(root.path());
        fs::create_dir(file.path()).unwrap();

        let err = file.write_limit(FrameLimit::new(2).unwrap()).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }
}
