use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "timetable", version, about = "Weekly class and exam timetable")]
struct Cli {
    /// Directory holding config.toml and the schedule store
    #[arg(long, global = true, env = "TIMETABLE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a schedule item
    Add(commands::schedule::ItemArgs),
    /// List schedule items
    List {
        /// Only this day
        #[arg(long)]
        day: Option<timetable_core::Weekday>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Delete a schedule item
    Remove {
        /// Item ID
        id: String,
    },
    /// Replace a schedule item, keeping its ID
    Replace {
        /// Item ID
        id: String,
        #[command(flatten)]
        item: commands::schedule::ItemArgs,
    },
    /// Show the weekly timetable with side-by-side columns
    Show {
        #[command(flatten)]
        args: commands::timetable::ShowArgs,
    },
    /// Export all items as JSON
    Export {
        /// Output file, or '-' for stdout
        #[arg(long, short, default_value = timetable_core::transfer::EXPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// Import items from a JSON file and merge them
    Import {
        /// File with an array of items or {"schedules": [...]}
        path: PathBuf,
    },
    /// Backup server operations
    Backup {
        #[command(subcommand)]
        action: commands::backup::BackupAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = context::Context::open(cli.data_dir).and_then(|ctx| match cli.command {
        Commands::Add(item) => commands::schedule::add(&ctx, item),
        Commands::List { day, json } => commands::schedule::list(&ctx, day, json),
        Commands::Remove { id } => commands::schedule::remove(&ctx, &id),
        Commands::Replace { id, item } => commands::schedule::replace(&ctx, &id, item),
        Commands::Show { args } => commands::timetable::show(&ctx, args),
        Commands::Export { out } => commands::transfer::export(&ctx, &out),
        Commands::Import { path } => commands::transfer::import(&ctx, &path),
        Commands::Backup { action } => commands::backup::run(&ctx, action),
        Commands::Config { action } => commands::config::run(&ctx, action),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
