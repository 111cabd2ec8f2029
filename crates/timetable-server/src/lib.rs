//! Backup server for the timetable.
//!
//! Accepts whole-list snapshots over HTTP and writes each one to its own
//! `backup_<epoch-millis>.json` file in a [`BackupArchive`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use timetable_core::backup::{BackupAck, BackupListing, Ping};
use timetable_core::BackupArchive;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    archive: Arc<BackupArchive>,
}

impl AppState {
    pub fn new(archive: BackupArchive) -> Self {
        Self {
            archive: Arc::new(archive),
        }
    }
}

/// Errors returned to clients as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    NoBody,
    InvalidJson,
    SaveFailed,
    ListFailed,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NoBody | ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::SaveFailed | ApiError::ListFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::NoBody => "No JSON body provided",
            ApiError::InvalidJson => "Invalid JSON body",
            ApiError::SaveFailed => "Failed to save backup",
            ApiError::ListFailed => "Failed to list backups",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

async fn ping() -> Json<Ping> {
    Json(Ping {
        ok: true,
        ts: chrono::Utc::now().timestamp_millis(),
    })
}

/// Stores any JSON document as-is; the payload shape is the client's business.
async fn upload_backup(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BackupAck>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::NoBody);
    }
    let payload: Value = serde_json::from_slice(&body).map_err(|_| ApiError::InvalidJson)?;
    if payload.is_null() {
        return Err(ApiError::NoBody);
    }

    let archive = Arc::clone(&state.archive);
    let file = match tokio::task::spawn_blocking(move || archive.write(&payload)).await {
        Ok(Ok(file)) => file,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "failed to save backup");
            return Err(ApiError::SaveFailed);
        }
        Err(e) => {
            tracing::error!(error = %e, "backup write task failed");
            return Err(ApiError::SaveFailed);
        }
    };
    tracing::debug!(%file, bytes = body.len(), "upload accepted");
    Ok(Json(BackupAck { ok: true, file }))
}

async fn list_backups(State(state): State<AppState>) -> Result<Json<BackupListing>, ApiError> {
    let archive = Arc::clone(&state.archive);
    let backups = match tokio::task::spawn_blocking(move || archive.list()).await {
        Ok(Ok(backups)) => backups,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "failed to list backups");
            return Err(ApiError::ListFailed);
        }
        Err(e) => {
            tracing::error!(error = %e, "backup list task failed");
            return Err(ApiError::ListFailed);
        }
    };
    Ok(Json(BackupListing { backups }))
}

pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/upload-backup", post(upload_backup))
        .route("/api/backups", get(list_backups))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
