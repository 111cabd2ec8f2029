mod config;
mod json_store;

pub use config::{BackupConfig, Config, EntryConfig, ServerConfig, StorageConfig};
pub use json_store::{JsonFileStore, MemoryStore};

use std::path::PathBuf;

use crate::error::{Result, StorageError};
use crate::schedule::ScheduleItem;

/// Load/save of the full schedule list.
///
/// The store only ever sees whole lists; every change is computed by the
/// caller and written back in one `save`.
pub trait ScheduleStore {
    fn load(&self) -> Result<Vec<ScheduleItem>>;
    fn save(&self, items: &[ScheduleItem]) -> Result<()>;
}

/// Returns the data directory, creating it if needed.
///
/// `TIMETABLE_DATA_DIR` wins when set. Otherwise `~/.config/timetable`,
/// or `~/.config/timetable-dev` with `TIMETABLE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TIMETABLE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TIMETABLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("timetable-dev")
            } else {
                base_dir.join("timetable")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
