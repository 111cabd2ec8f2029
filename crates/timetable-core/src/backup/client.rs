//! HTTP client for the backup server.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::{BackupAck, BackupListing, BackupPayload, BackupTransport, Ping};
use crate::error::TransportError;
use crate::storage::BackupConfig;

#[derive(Debug, Clone)]
pub struct HttpBackupClient {
    client: Client,
    base: Url,
}

impl HttpBackupClient {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let invalid = |message: String| TransportError::InvalidUrl {
            url: server_url.to_string(),
            message,
        };
        let mut base = Url::parse(server_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL".into()));
        }
        // Url::join drops the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn from_config(config: &BackupConfig) -> Result<Self, TransportError> {
        Self::new(&config.server_url, Duration::from_secs(config.timeout_secs))
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path)
            .map_err(|e| TransportError::InvalidUrl {
                url: format!("{}{path}", self.base),
                message: e.to_string(),
            })
    }

    /// Check that the server is reachable.
    pub async fn ping(&self) -> Result<Ping, TransportError> {
        let resp = self.client.get(self.endpoint("api/ping")?).send().await?;
        read_json(resp).await
    }
}

impl BackupTransport for HttpBackupClient {
    async fn upload(&self, payload: &BackupPayload) -> Result<BackupAck, TransportError> {
        let url = self.endpoint("api/upload-backup")?;
        tracing::debug!(%url, items = payload.schedules.len(), "uploading backup");
        let resp = self.client.post(url).json(payload).send().await?;
        let ack: BackupAck = read_json(resp).await?;
        if !ack.ok {
            return Err(TransportError::InvalidResponse(
                "server did not acknowledge the backup".into(),
            ));
        }
        tracing::info!(file = %ack.file, "backup uploaded");
        Ok(ack)
    }

    async fn list(&self) -> Result<Vec<String>, TransportError> {
        let resp = self.client.get(self.endpoint("api/backups")?).send().await?;
        let listing: BackupListing = read_json(resp).await?;
        Ok(listing.backups)
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, TransportError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| TransportError::InvalidResponse(e.to_string()))
}
