//! # Rental CLI
//!
//! Command line front end for the car rental backend.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        rental <subcommand>                              │
//! │                                                                         │
//! │  1. Initialize Logging                                                 │
//! │     • tracing-subscriber with env filter, written to stderr            │
//! │     • Default: info,rental=debug,sqlx=warn; override with RUST_LOG     │
//! │                                                                         │
//! │  2. Load Configuration                                                 │
//! │     • RENTAL_DB_PATH / RENTAL_DB_MAX_CONNECTIONS /                     │
//! │       RENTAL_DB_CONNECT_TIMEOUT_SECS, then --db                        │
//! │                                                                         │
//! │  3. Open Database                                                      │
//! │     • Create file if missing, run embedded migrations                  │
//! │                                                                         │
//! │  4. Execute Subcommand                                                 │
//! │     • Success: pretty JSON on stdout, exit 0                           │
//! │     • Failure: "[CODE] message" on stderr, exit 1                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod config;
mod error;

use std::process::ExitCode;

use rental_db::Database;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::commands::CommandLine;
use crate::config::AppConfig;
use crate::error::{CliError, ErrorCode};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = CommandLine::parse_args();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: CommandLine) -> Result<String, CliError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.db {
        config = config.with_database_path(path);
    }

    info!(
        path = %config.database_path.display(),
        max_connections = config.max_connections,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config()).await?;

    debug!(command = ?cli.command, "Executing command");
    let result = commands::execute(&db, cli.command).await;
    db.close().await;

    serde_json::to_string_pretty(&result?)
        .map_err(|e| CliError::new(ErrorCode::Internal, e.to_string()))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=rental_db=trace` - Trace the database layer
///
/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rental=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
