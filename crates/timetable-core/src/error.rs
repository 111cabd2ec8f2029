//! Core error types for timetable-core.
//!
//! Every error here is recoverable: an operation that fails leaves the
//! caller's schedule list exactly as it was.

use std::path::PathBuf;
use thiserror::Error;

use crate::schedule::{MinuteOfDay, Weekday};

/// Core error type for timetable-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A required field is missing or a value is out of range
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Interactive add hit an item starting at the same minute on the same day
    #[error("Conflict: another item already starts at the same minute on that day ({day} {time}, item {existing_id}).")]
    Collision {
        day: Weekday,
        time: MinuteOfDay,
        existing_id: String,
    },

    /// No item with the given id
    #[error("No schedule item with id '{id}'")]
    NotFound { id: String },

    /// Import document could not be parsed or merged
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Backup upload or listing failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Schedule store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors raised at entry time.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Required field left empty
    #[error("{} required", capitalize(.field))]
    MissingField { field: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Time string that is not a valid HH:MM wall-clock time
    #[error("Invalid time '{0}': expected HH:MM between 00:00 and 23:59")]
    InvalidTime(String),
}

/// Import-specific errors. Raised before anything is merged.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Document is not valid JSON
    #[error("Invalid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Valid JSON, but neither an array nor an object with `schedules`
    #[error("Invalid JSON: expected an array of items or an object with 'schedules', got {0}")]
    UnexpectedShape(String),

    /// A single record could not be turned into a schedule item
    #[error("Invalid JSON: record {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    /// Every minute of the day is already taken
    #[error("No free start minute left on {day}")]
    DayFull { day: Weekday },
}

/// Backup transport errors.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Request could not be sent or the connection failed
    #[error("Upload failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Upload failed: server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Server answered with something that is not a backup acknowledgment
    #[error("Upload failed: invalid response: {0}")]
    InvalidResponse(String),

    /// Configured server URL cannot be used
    #[error("Invalid backup server URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// Schedule store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read the store
    #[error("Failed to read schedules from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the store
    #[error("Failed to write schedules to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store exists but does not hold a schedule list
    #[error("Schedule store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Data directory cannot be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not name a configuration value
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_reads_like_a_form_message() {
        let err = ValidationError::MissingField {
            field: "subject".into(),
        };
        assert_eq!(err.to_string(), "Subject required");
    }

    #[test]
    fn collision_message_mentions_same_minute() {
        let err = CoreError::Collision {
            day: Weekday::Monday,
            time: MinuteOfDay::from_hm(9, 0).unwrap(),
            existing_id: "a".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Conflict: another item already starts at the same minute"));
        assert!(msg.contains("Monday 09:00"));
    }
}
