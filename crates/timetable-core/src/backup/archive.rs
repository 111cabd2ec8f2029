//! Directory of timestamped backup files, as kept by the backup server.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// `backup_<epoch-millis>.json` files in one directory.
#[derive(Debug, Clone)]
pub struct BackupArchive {
    dir: PathBuf,
}

impl BackupArchive {
    /// Open the archive, creating the directory on first use.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name_for(millis: i64) -> String {
        format!("backup_{millis}.json")
    }

    /// Write `payload` stamped with the current time. Returns the file name.
    pub fn write<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String> {
        self.write_at(payload, chrono::Utc::now().timestamp_millis())
    }

    /// Write `payload` as pretty-printed JSON under the name for `millis`.
    ///
    /// Existing backups are never overwritten: if the name is taken, the
    /// next free millisecond is used. Returns the name actually written.
    pub fn write_at<T: Serialize + ?Sized>(&self, payload: &T, millis: i64) -> Result<String> {
        let content = serde_json::to_string_pretty(payload)?;
        let mut millis = millis;
        loop {
            let file_name = Self::file_name_for(millis);
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&file_name));
            match opened {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())?;
                    tracing::info!(file = %file_name, dir = %self.dir.display(), "backup written");
                    return Ok(file_name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Names of all `.json` files in the archive, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".json") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
