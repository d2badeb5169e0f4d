//! # Rail Counter
//!
//! Command line ticket counter over the rail database.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Counter Startup                                   │
//! │                                                                         │
//! │  1. Initialize Logging (stderr)                                         │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,rail=debug,sqlx=warn; override with RUST_LOG        │
//! │                                                                         │
//! │  2. Load Configuration                                                  │
//! │     • RAIL_DB_PATH, RAIL_DB_MAX_CONNECTIONS,                            │
//! │       RAIL_DB_ACQUIRE_TIMEOUT_SECS; --db wins over RAIL_DB_PATH         │
//! │                                                                         │
//! │  3. Connect to Database                                                 │
//! │     • SQLite with WAL mode, pending migrations applied                  │
//! │                                                                         │
//! │  4. Run the Subcommand                                                  │
//! │     • JSON result on stdout, exit 0                                     │
//! │     • JSON error on stderr, exit with the booking code (1-4)            │
//! │       or a sysexits status for everything else                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod commands;
mod config;
mod error;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::CounterConfig;
use crate::error::CounterError;
use rail_db::Database;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    match execute(cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "Could not render output");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            report(&err);
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}

async fn execute(cli: Cli) -> Result<serde_json::Value, CounterError> {
    let mut config = CounterConfig::load()?;
    if let Some(path) = cli.db {
        config.db_path = path;
    }

    info!(path = %config.db_path.display(), "Opening counter database");
    let db = Database::new(config.db_config()).await?;

    let result = commands::run(&db, &cli.command).await;
    db.close().await;
    result
}

fn report(err: &CounterError) {
    match serde_json::to_string_pretty(err) {
        Ok(text) => eprintln!("{text}"),
        Err(_) => eprintln!("{err}"),
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rail=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
