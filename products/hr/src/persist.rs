//! Durable projection of the store: only the bookmark set survives a restart.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::EmployeeId;

/// Fixed key the durable record is stored under.
pub const STORAGE_KEY: &str = "hr-dashboard-storage";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode persisted state: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// The persisted shape. Everything else in the store is transient.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub bookmarked_ids: Vec<EmployeeId>,
}

impl PersistedState {
    pub fn encode(&self) -> StorageResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Key/value slot holding the raw persisted record.
pub trait StateStorage: Send + Sync {
    /// `Ok(None)` when nothing has been written yet.
    fn load(&self) -> StorageResult<Option<String>>;
    fn save(&self, raw: &str) -> StorageResult<()>;
}

/// JSON file named after [`STORAGE_KEY`] inside a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStorage for FileStorage {
    fn load(&self) -> StorageResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_err(err)),
        }
    }

    fn save(&self, raw: &str) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_err(err))?;
        }
        // Write-then-rename so a crash never leaves a half-written record.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|err| self.io_err(err))?;
        fs::rename(&tmp, &self.path).map_err(|err| self.io_err(err))
    }
}

/// In-process slot for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.contents())
    }

    fn save(&self, raw: &str) -> StorageResult<()> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(raw.to_string());
        Ok(())
    }
}
