/// habit-streaks binary: serves the habit tools over MCP on stdin/stdout

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use habit_streaks::HabitTrackerServer;

const DB_FILE_NAME: &str = "habits.db";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database file (defaults to ~/.habit_streaks/habits.db)
    #[arg(long, env = "HABIT_STREAKS_DB")]
    database: Option<PathBuf>,

    /// Log store operations at info level
    #[arg(short, long)]
    debug: bool,

    /// Log every store write and streak recomputation
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn log_filter(&self) -> String {
        let level = match (self.verbose, self.debug) {
            (true, _) => "debug",
            (false, true) => "info",
            (false, false) => "warn",
        };
        format!("habit_streaks={}", level)
    }
}

/// Directories tried, in order, when no database path is given
fn candidate_dirs() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|home| home.join(".habit_streaks")),
        dirs::data_dir().map(|data| data.join("habit_streaks")),
        dirs::config_dir().map(|config| config.join("habit_streaks")),
        std::env::current_dir().ok().map(|cwd| cwd.join(".habit_streaks")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn usable_dir(dir: &Path) -> bool {
    std::fs::create_dir_all(dir).is_ok()
        && std::fs::metadata(dir)
            .map(|meta| meta.is_dir() && !meta.permissions().readonly())
            .unwrap_or(false)
}

fn default_database_path() -> std::io::Result<PathBuf> {
    if let Some(dir) = candidate_dirs().into_iter().find(|dir| usable_dir(dir)) {
        return Ok(dir.join(DB_FILE_NAME));
    }

    let fallback = std::env::temp_dir().join("habit_streaks");
    std::fs::create_dir_all(&fallback)?;
    warn!("No writable home, data or config directory; database goes in {}", fallback.display());

    Ok(fallback.join(DB_FILE_NAME))
}

fn resolve_database_path(explicit: Option<PathBuf>) -> std::io::Result<PathBuf> {
    let Some(path) = explicit else {
        return default_database_path();
    };

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)?,
        _ => {}
    }

    Ok(path)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // stdout carries the JSON-RPC stream
    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let db_path = resolve_database_path(args.database)?;
    info!("habit-streaks {} using {}", env!("CARGO_PKG_VERSION"), db_path.display());

    HabitTrackerServer::new(db_path).await?.run().await?;

    info!("Input closed, exiting");
    Ok(())
}
