//! TOML-based application configuration.
//!
//! Stores:
//! - where the schedule list lives
//! - defaults for interactive entry
//! - the backup server the CLI uploads to
//! - bind address and backup directory for the backup server
//!
//! Configuration is stored at `~/.config/timetable/config.toml`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::schedule::{
    ItemKind, MinuteOfDay, Weekday, DEFAULT_DURATION, DEFAULT_REMINDER, MAX_DURATION,
    MIN_ENTRY_DURATION,
};

/// Schedule store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

/// Defaults used when a new item is entered without every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryConfig {
    #[serde(default = "default_day")]
    pub default_day: Weekday,
    #[serde(default = "default_time")]
    pub default_time: MinuteOfDay,
    #[serde(default = "default_duration")]
    pub default_duration: u32,
    #[serde(default = "default_reminder")]
    pub default_reminder: u32,
    #[serde(default)]
    pub default_kind: ItemKind,
}

/// Backup client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Backup server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Relative paths resolve against the data directory.
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timetable/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub entry: EntryConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_file_name() -> String {
    "schedules.json".into()
}
fn default_day() -> Weekday {
    Weekday::Sunday
}
fn default_time() -> MinuteOfDay {
    MinuteOfDay::from_hm(8, 0).unwrap_or_default()
}
fn default_duration() -> u32 {
    DEFAULT_DURATION
}
fn default_reminder() -> u32 {
    DEFAULT_REMINDER
}
fn default_server_url() -> String {
    "http://localhost:4000".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    4000
}
fn default_backup_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_body_limit() -> usize {
    5 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            default_day: default_day(),
            default_time: default_time(),
            default_duration: default_duration(),
            default_reminder: default_reminder(),
            default_kind: ItemKind::default(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            backup_dir: default_backup_dir(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location, `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field (a bad weekday, time or number).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Reject values that parse but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ENTRY_DURATION..=MAX_DURATION).contains(&self.entry.default_duration) {
            return Err(ConfigError::InvalidValue {
                key: "entry.default_duration".into(),
                message: format!("must be between {MIN_ENTRY_DURATION} and {MAX_DURATION}"),
            });
        }
        if self.storage.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "storage.file_name".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Backup directory with relative paths resolved against `base`.
    pub fn backup_dir_in(&self, base: &Path) -> PathBuf {
        if self.server.backup_dir.is_absolute() {
            self.server.backup_dir.clone()
        } else {
            base.join(&self.server.backup_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.entry.default_day, Weekday::Sunday);
        assert_eq!(parsed.entry.default_time.to_string(), "08:00");
        assert_eq!(parsed.server.port, 4000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: Config = toml::from_str("[backup]\nserver_url = \"http://backup:9000\"\n").unwrap();
        assert_eq!(parsed.backup.server_url, "http://backup:9000");
        assert_eq!(parsed.backup.timeout_secs, 30);
        assert_eq!(parsed.storage.file_name, "schedules.json");
        assert_eq!(parsed.server.body_limit_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("entry.default_day").as_deref(), Some("Sunday"));
        assert_eq!(cfg.get("entry.default_duration").as_deref(), Some("60"));
        assert_eq!(cfg.get("backup.server_url").as_deref(), Some("http://localhost:4000"));
        assert!(cfg.get("entry.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("server.port", "8080").unwrap();
        cfg.set("entry.default_day", "Wednesday").unwrap();
        cfg.set("entry.default_time", "10:30").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.entry.default_day, Weekday::Wednesday);
        assert_eq!(cfg.entry.default_time.to_string(), "10:30");
    }

    #[test]
    fn set_rejects_unknown_keys() {
        let mut cfg = Config::default();
        assert!(cfg.set("entry.nonexistent_key", "1").is_err());
        assert!(cfg.set("nope", "1").is_err());
    }

    #[test]
    fn set_rejects_ill_typed_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("server.port", "not_a_port").is_err());
        assert!(cfg.set("entry.default_time", "25:00").is_err());
        assert!(cfg.set("entry.default_day", "Someday").is_err());
        assert!(cfg.set("entry.default_duration", "2").is_err());
        assert!(cfg.set("entry.default_duration", "4294967295").is_err());
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.entry.default_duration, 60);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.server.port, 4000);
        assert!(path.exists());

        let mut changed = cfg;
        changed.set("backup.timeout_secs", "5").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().backup.timeout_secs, 5);
    }

    #[test]
    fn unreadable_file_is_an_error_and_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut content = b"[backup]\nserver_url = \"http://my-backup:9000\"\n# caf".to_vec();
        content.push(0xE9);
        std::fs::write(&path, &content).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })), "{err:?}");
        assert_eq!(std::fs::read(&path).unwrap(), content);
    }

    #[test]
    fn unparseable_file_is_an_error_and_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backup\nserver_url = 1").unwrap();
        assert!(Config::load_from(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[backup\nserver_url = 1");
    }

    #[test]
    fn backup_dir_resolves_relative_paths() {
        let cfg = Config::default();
        assert_eq!(
            cfg.backup_dir_in(Path::new("/srv/timetable")),
            PathBuf::from("/srv/timetable/data")
        );
    }
}
