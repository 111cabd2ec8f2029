use timetable_core::storage::data_dir;
use timetable_core::{BackupArchive, Config};
use timetable_server::{router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let base = data_dir()?;
    let config = Config::load_from(&base.join("config.toml"))?;

    let port = match std::env::var("PORT") {
        Ok(raw) => raw.parse::<u16>().map_err(|e| format!("invalid PORT '{raw}': {e}"))?,
        Err(_) => config.server.port,
    };
    let archive = BackupArchive::open(config.backup_dir_in(&base))?;
    tracing::info!(dir = %archive.dir().display(), "backup directory ready");

    let app = router(AppState::new(archive), config.server.body_limit_bytes);
    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), port)).await?;
    tracing::info!("Server started on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
