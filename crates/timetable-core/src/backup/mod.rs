//! Backups: snapshots of the full schedule list kept by a backup server.
//!
//! The client side ([`HttpBackupClient`]) posts a [`BackupPayload`] and gets
//! back the name of the file the server wrote. The server side
//! ([`BackupArchive`]) owns the directory those files live in.

mod archive;
mod client;

pub use archive::BackupArchive;
pub use client::HttpBackupClient;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::schedule::ScheduleItem;

/// Body of an upload: the whole list plus the client's timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupPayload {
    pub schedules: Vec<ScheduleItem>,
    /// Epoch milliseconds
    pub ts: i64,
}

impl BackupPayload {
    pub fn new(schedules: Vec<ScheduleItem>, ts: i64) -> Self {
        Self { schedules, ts }
    }

    /// Payload stamped with the current time.
    pub fn now(schedules: Vec<ScheduleItem>) -> Self {
        Self::new(schedules, chrono::Utc::now().timestamp_millis())
    }
}

/// Server acknowledgment of an upload. `file` is opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupAck {
    pub ok: bool,
    pub file: String,
}

/// Response of the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackupListing {
    pub backups: Vec<String>,
}

/// Response of the ping endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    pub ok: bool,
    pub ts: i64,
}

/// Where backups are sent.
///
/// Uploads are a side channel: a failure never affects the local store.
pub trait BackupTransport {
    fn upload(
        &self,
        payload: &BackupPayload,
    ) -> impl Future<Output = Result<BackupAck, TransportError>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<String>, TransportError>> + Send;
}
