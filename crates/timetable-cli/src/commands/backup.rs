use std::time::Duration;

use clap::Subcommand;
use timetable_core::backup::BackupPayload;
use timetable_core::{BackupTransport, HttpBackupClient, ScheduleStore};

use crate::context::{CliResult, Context};

#[derive(Subcommand)]
pub enum BackupAction {
    /// Upload the whole schedule list to the backup server
    Upload {
        /// Server URL (overrides backup.server_url)
        #[arg(long)]
        server: Option<String>,
    },
    /// List backups kept by the server
    List {
        #[arg(long)]
        server: Option<String>,
    },
    /// Check that the server is reachable
    Ping {
        #[arg(long)]
        server: Option<String>,
    },
}

fn client(ctx: &Context, server: Option<&str>) -> CliResult<HttpBackupClient> {
    let backup = &ctx.config.backup;
    let client = match server {
        Some(url) => HttpBackupClient::new(url, Duration::from_secs(backup.timeout_secs))?,
        None => HttpBackupClient::from_config(backup)?,
    };
    Ok(client)
}

pub fn run(ctx: &Context, action: BackupAction) -> CliResult {
    let runtime = tokio::runtime::Runtime::new()?;
    match action {
        BackupAction::Upload { server } => {
            let client = client(ctx, server.as_deref())?;
            let payload = BackupPayload::now(ctx.store.load()?);
            let count = payload.schedules.len();
            let ack = runtime.block_on(client.upload(&payload))?;
            println!("Backup uploaded: {} ({count} items)", ack.file);
        }
        BackupAction::List { server } => {
            let client = client(ctx, server.as_deref())?;
            let backups = runtime.block_on(client.list())?;
            if backups.is_empty() {
                println!("No backups.");
            }
            for name in backups {
                println!("{name}");
            }
        }
        BackupAction::Ping { server } => {
            let client = client(ctx, server.as_deref())?;
            let ping = runtime.block_on(client.ping())?;
            let at = chrono::DateTime::from_timestamp_millis(ping.ts)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| ping.ts.to_string());
            println!("ok (server time {at})");
        }
    }
    Ok(())
}
