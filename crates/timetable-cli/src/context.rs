//! Per-invocation state: the data directory, its config and the store.

use std::path::PathBuf;

use timetable_core::storage::data_dir;
use timetable_core::{Config, JsonFileStore};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub struct Context {
    dir: PathBuf,
    pub config: Config,
    pub store: JsonFileStore,
}

impl Context {
    /// Use `dir` if given, otherwise the default data directory.
    pub fn open(dir: Option<PathBuf>) -> CliResult<Self> {
        let dir = match dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                dir
            }
            None => data_dir()?,
        };
        let config = Config::load_from(&dir.join("config.toml"))?;
        let store = JsonFileStore::at(dir.join(&config.storage.file_name));
        tracing::debug!(dir = %dir.display(), store = %store.path().display(), "context opened");
        Ok(Self { dir, config, store })
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join("config.toml")
    }
}
