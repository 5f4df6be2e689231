//! # `ticker listings`
//!
//! Runs one refresh and prints what the listing screen would show.
//!
//! ## Output
//! ```text
//! human (default)                 --json (NDJSON, one state per line)
//! ───────────────                 ───────────────────────────────────
//! Loading...                      {"status":"loading","is_active":true}
//! 0 listing(s)                    {"status":"success","data":[]}
//! 2 listing(s)                    {"status":"success","data":[...]}
//! Done.                           {"status":"loading","is_active":false}
//! SYMBOL  EXCHANGE  NAME
//! AAPL    NASDAQ    Apple Inc
//! ```
//!
//! A refresh that ends in an error still prints the listings it had, then
//! fails with [`ErrorCode::RefreshFailed`](crate::error::ErrorCode).

use std::io::Write;
use tokio_stream::StreamExt;
use tracing::debug;

use ticker_sync::StockRepository;

use crate::cli::ListingsArgs;
use crate::commands::{describe, print_companies};
use crate::error::{CliError, CliResult};
use crate::state::{ListingsEvent, ListingsState};

/// Runs the refresh described by `args`, writing progress to `out`.
pub async fn execute<W: Write>(
    repo: &StockRepository,
    args: &ListingsArgs,
    out: &mut W,
) -> CliResult<ListingsState> {
    let mut screen = ListingsState::new();

    let mut request = screen.handle(ListingsEvent::SearchQueryChanged(args.query.clone()));
    if args.refresh {
        request = screen.handle(ListingsEvent::Refresh);
    }
    debug!(?request, "Starting listings refresh");

    let mut states = repo.refresh(request.force_remote, &request.query);
    while let Some(state) = states.next().await {
        if args.json {
            serde_json::to_writer(&mut *out, &state)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", describe(&state))?;
        }
        screen.apply(state);
    }

    if !args.json {
        print_companies(out, &screen)?;
    }

    match &screen.error {
        Some(message) => Err(CliError::refresh(message)),
        None => Ok(screen),
    }
}
