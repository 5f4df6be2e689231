//! # `ticker browse`
//!
//! Interactive listing screen driven by stdin.
//!
//! ## Event Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  startup ──► SearchQueryChanged("") ──► refresh task #1                 │
//! │                                                                         │
//! │  stdin line                                                             │
//! │     ├── ":q"      quit (abort the running task)                         │
//! │     ├── ":r"      ListingsEvent::Refresh                                │
//! │     └── <text>    ListingsEvent::SearchQueryChanged(text)               │
//! │                        │                                                │
//! │                        ▼                                                │
//! │           abort task #n ──► its ListingStream is dropped,               │
//! │                             the refresh behind it is abandoned          │
//! │                        │                                                │
//! │                        ▼                                                │
//! │           spawn task #n+1: fold states into ListingsState, render       │
//! │                                                                         │
//! │  EOF ──► wait for the running task, then return the final screen        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the most recent request drives the screen.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use ticker_sync::StockRepository;

use crate::commands::{describe, print_companies};
use crate::error::CliResult;
use crate::state::{ListingsEvent, ListingsState, RefreshRequest};

const QUIT: &str = ":q";
const REFRESH: &str = ":r";

const HELP: &str = "Type to search, :r to refresh from the server, :q to quit.";

/// Runs the loop until `:q` or end of input.
pub async fn execute<R, W>(
    repo: &StockRepository,
    input: R,
    out: Arc<Mutex<W>>,
) -> CliResult<ListingsState>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    {
        let mut out = out.lock().await;
        writeln!(out, "{}", HELP)?;
    }

    let screen = Arc::new(Mutex::new(ListingsState::new()));

    let request = screen
        .lock()
        .await
        .handle(ListingsEvent::SearchQueryChanged(String::new()));
    let mut current = spawn_refresh(repo, request, &screen, &out);

    let mut lines = input.lines();
    let quit = loop {
        let Some(line) = lines.next_line().await? else {
            break false;
        };

        let event = match line.trim() {
            QUIT => break true,
            REFRESH => ListingsEvent::Refresh,
            query => ListingsEvent::SearchQueryChanged(query.to_string()),
        };

        let request = screen.lock().await.handle(event);

        current.abort();
        current = spawn_refresh(repo, request, &screen, &out);
    };

    if quit {
        current.abort();
    } else if let Err(e) = current.await {
        warn!(error = %e, "Refresh task did not complete");
    }

    let final_screen = screen.lock().await.clone();
    Ok(final_screen)
}

/// Starts a refresh and a task that renders each state it emits.
fn spawn_refresh<W>(
    repo: &StockRepository,
    request: RefreshRequest,
    screen: &Arc<Mutex<ListingsState>>,
    out: &Arc<Mutex<W>>,
) -> JoinHandle<()>
where
    W: Write + Send + 'static,
{
    debug!(?request, "Dispatching refresh");

    let mut states = repo.refresh(request.force_remote, &request.query);
    let screen = Arc::clone(screen);
    let out = Arc::clone(out);

    tokio::spawn(async move {
        while let Some(state) = states.next().await {
            let line = describe(&state);

            let mut screen = screen.lock().await;
            screen.apply(state);

            let mut out = out.lock().await;
            if let Err(e) = render(&mut *out, &line, &screen) {
                warn!(error = %e, "Failed to write listing screen");
                break;
            }
        }
    })
}

fn render<W: Write>(out: &mut W, line: &str, screen: &ListingsState) -> std::io::Result<()> {
    writeln!(out, "{}", line)?;
    if !screen.is_loading {
        print_companies(out, screen)?;
    }
    out.flush()
}
