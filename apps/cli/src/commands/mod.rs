//! # Commands Module
//!
//! One module per `ticker` subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports, shared rendering)
//! ├── listings.rs  ◄─── One refresh, printed
//! ├── browse.rs    ◄─── Interactive search loop over stdin
//! ├── status.rs    ◄─── Cache size and last refresh
//! └── config.rs    ◄─── Effective configuration
//! ```
//!
//! Commands write to a caller-supplied `io::Write` so tests can capture
//! output; `lib.rs` passes stdout.

pub mod browse;
pub mod config;
pub mod listings;
pub mod status;

use std::io::{self, Write};
use std::sync::Arc;

use ticker_core::{CompanyListing, Resource};
use ticker_db::Database;
use ticker_sync::{AlphaVantageSource, StockRepository, SyncConfig};

use crate::error::CliResult;
use crate::state::ListingsState;

/// Builds the repository over `db` using the configured remote source.
pub fn build_repository(config: &SyncConfig, db: Database) -> CliResult<StockRepository> {
    let source = AlphaVantageSource::new(&config.api)?;
    Ok(StockRepository::new(db, Arc::new(source)))
}

/// One-line description of a refresh state, for human output.
pub fn describe(state: &Resource<Vec<CompanyListing>>) -> String {
    match state {
        Resource::Loading { is_active: true } => "Loading...".to_string(),
        Resource::Loading { is_active: false } => "Done.".to_string(),
        Resource::Success { data } => format!("{} listing(s)", data.len()),
        Resource::Error { message } => format!("Error: {}", message),
    }
}

/// Prints the listing table for `state`.
pub fn print_companies<W: Write>(out: &mut W, state: &ListingsState) -> io::Result<()> {
    if state.companies.is_empty() {
        return writeln!(out, "No listings.");
    }

    let symbol_width = state
        .companies
        .iter()
        .map(|c| c.symbol().len())
        .max()
        .unwrap_or(0)
        .max("SYMBOL".len());

    writeln!(out, "{:<symbol_width$}  {:<8}  NAME", "SYMBOL", "EXCHANGE")?;
    for company in &state.companies {
        writeln!(
            out,
            "{:<symbol_width$}  {:<8}  {}",
            company.symbol(),
            company.exchange(),
            company.name()
        )?;
    }

    Ok(())
}
