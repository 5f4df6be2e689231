//! # ticker: Company Listings CLI
//!
//! Command-line front end for the listing cache.
//!
//! ## Module Organization
//! - [`cli`] - Argument definitions (clap)
//! - [`commands`] - One module per subcommand
//! - [`state`] - Config, database and listing screen state
//! - [`error`] - `CliError` and exit codes
//!
//! ## Example
//! ```text
//! $ ticker listings micro
//! Loading...
//! 1 listing(s)
//! Done.
//! SYMBOL  EXCHANGE  NAME
//! MSFT    NASDAQ    Microsoft Corporation
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use error::CliResult;
use state::{open_database, ConfigState};

/// Runs the CLI and returns the process exit code.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse Arguments ──────────────────────────────────────────────────► │
/// │     • clap exits with code 2 on usage errors                            │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber to stderr, env filter                          │
/// │     • Default: INFO (DEBUG for ticker crates), override with RUST_LOG   │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → ticker.toml → TICKER_* env → --db                      │
/// │                                                                         │
/// │  4. Open Listing Cache (listings, browse, status) ────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  5. Dispatch Command ─────────────────────────────────────────────────► │
/// │     • stdout: results      stderr: logs and errors                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(code = ?err.code, "Command failed");
            eprintln!("error: {}", err);
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let config = ConfigState::load(cli.config, cli.db)?;

    match cli.command {
        Command::Config(args) => {
            let mut stdout = io::stdout().lock();
            commands::config::execute(&config, &args, &mut stdout)
        }
        Command::Status(args) => {
            let db = open_database(config.config()).await?;
            let status = commands::status::collect(&db).await;
            db.close().await;

            let mut stdout = io::stdout().lock();
            commands::status::print(&mut stdout, &status?, &args)
        }
        Command::Listings(args) => {
            let db = open_database(config.config()).await?;
            let repo = commands::build_repository(config.config(), db.clone())?;

            let mut stdout = io::stdout();
            let result = commands::listings::execute(&repo, &args, &mut stdout).await;
            stdout.flush()?;
            db.close().await;

            result.map(|screen| info!(listings = screen.companies.len(), "Listings loaded"))
        }
        Command::Browse => {
            let db = open_database(config.config()).await?;
            let repo = commands::build_repository(config.config(), db.clone())?;

            let stdin = BufReader::new(tokio::io::stdin());
            let stdout = Arc::new(Mutex::new(io::stdout()));
            let result = commands::browse::execute(&repo, stdin, stdout).await;
            db.close().await;

            result.map(|_| ())
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=ticker_sync=trace` - Trace the refresh policy only
/// - Default: INFO, DEBUG for `ticker*` targets; always on stderr
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ticker=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
