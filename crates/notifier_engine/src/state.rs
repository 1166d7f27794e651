use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use notifier_core::OfferSet;
use notifier_logging::{notifier_debug, notifier_info};

use crate::{AtomicFileWriter, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read state from {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("persisted state in {path:?} is malformed: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write state to {path:?}: {source}")]
    Write { path: PathBuf, source: PersistError },
}

impl StorageError {
    /// True for load-side failures, false for save-side ones.
    pub fn is_read(&self) -> bool {
        matches!(self, StorageError::Read { .. } | StorageError::Corrupt { .. })
    }
}

/// Owner of the last notified offer snapshot.
pub trait StateStore: Send + Sync {
    /// Returns the persisted snapshot, or an empty one if nothing was saved yet.
    fn load(&self) -> Result<OfferSet, StorageError>;
    /// Replaces the persisted snapshot in full.
    fn save(&self, offers: &OfferSet) -> Result<(), StorageError>;
}

/// Pretty-printed JSON array on disk, replaced atomically on save.
pub struct JsonFileStateStore {
    writer: AtomicFileWriter,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        self.writer.target()
    }
}

impl StateStore for JsonFileStateStore {
    fn load(&self) -> Result<OfferSet, StorageError> {
        let path = self.path();
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                notifier_debug!("No persisted state at {:?}; starting empty", path);
                return Ok(OfferSet::default());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let offers: OfferSet =
            serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;
        notifier_debug!("Loaded {} persisted offer(s) from {:?}", offers.len(), path);
        Ok(offers)
    }

    fn save(&self, offers: &OfferSet) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(offers).map_err(StorageError::Serialize)?;
        self.writer
            .write(&content)
            .map_err(|source| StorageError::Write {
                path: self.path().to_path_buf(),
                source,
            })?;
        notifier_info!("Persisted {} offer(s) to {:?}", offers.len(), self.path());
        Ok(())
    }
}
