//! Flat JSON schedule stores.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{data_dir, Config, ScheduleStore};
use crate::error::{Result, StorageError};
use crate::schedule::ScheduleItem;

/// Bare JSON array of items in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `<data_dir>/<storage.file_name>`.
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self::at(data_dir()?.join(&config.storage.file_name)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleStore for JsonFileStore {
    /// A missing file is an empty schedule.
    fn load(&self) -> Result<Vec<ScheduleItem>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items = serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(items)
    }

    /// Writes to a sibling temp file, then renames over the store.
    fn save(&self, items: &[ScheduleItem]) -> Result<()> {
        let content = serde_json::to_string_pretty(items)?;
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "schedules saved");
        Ok(())
    }
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Vec<ScheduleItem>>,
}

impl MemoryStore {
    pub fn new(items: Vec<ScheduleItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

impl ScheduleStore for MemoryStore {
    fn load(&self) -> Result<Vec<ScheduleItem>> {
        Ok(self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, items: &[ScheduleItem]) -> Result<()> {
        *self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = items.to_vec();
        Ok(())
    }
}
