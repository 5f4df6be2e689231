//! # Stock Repository
//!
//! Reconciles the local listing cache with the remote source and reports
//! progress as a stream of [`Resource`] snapshots.
//!
//! ## Refresh Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         refresh(force_remote, query)                    │
//! │                                                                         │
//! │  emit Loading(true)                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  local = store.search(query)  ──────────► emit Success(local)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store_empty = local.is_empty() && query == ""                          │
//! │       │                                                                 │
//! │       ├── !store_empty && !force_remote ──► emit Loading(false)   DONE │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fetch ◄──── raced against consumer drop ───► abandon          DONE    │
//! │       │                                                                 │
//! │       ├── error ──────────────────────────► emit Error(msg)       DONE │
//! │       ▼                                                                 │
//! │  parse ──── bad header ───────────────────► emit Error(msg)       DONE │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.replace_all(parsed)      (one transaction)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  emit Success(store.search(""))                                        │
//! │  emit Loading(false)                                            DONE   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Task Model
//! Each call spawns one Tokio task that feeds a bounded channel; the
//! returned [`ListingStream`] is the receiving end. Dropping the stream
//! closes the channel: an in-flight fetch is abandoned, and the store is
//! never written after the drop has been observed. A `replace_all` that has
//! already started runs to completion.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use ticker_core::{CompanyListing, ListingCsvParser, Resource};
use ticker_db::{Database, DbResult, ListingEntity};

use crate::error::{SyncError, SyncResult};
use crate::remote::ListingSource;

/// Listing snapshots emitted by a refresh.
pub type ListingResource = Resource<Vec<CompanyListing>>;

/// Stream returned by [`StockRepository::refresh`].
pub type ListingStream = ReceiverStream<ListingResource>;

/// A refresh emits at most four states; the channel never applies backpressure.
const CHANNEL_CAPACITY: usize = 8;

// =============================================================================
// Repository
// =============================================================================

/// Entry point for loading company listings.
///
/// ## Example
/// ```rust,ignore
/// use tokio_stream::StreamExt;
///
/// let repo = StockRepository::new(db, Arc::new(AlphaVantageSource::new(&config.api)?));
/// let mut states = repo.refresh(false, "");
/// while let Some(state) = states.next().await {
///     println!("{:?}", state);
/// }
/// ```
#[derive(Clone)]
pub struct StockRepository {
    db: Database,
    source: Arc<dyn ListingSource>,
    parser: ListingCsvParser,
}

impl StockRepository {
    /// Creates a repository over `db` that fetches from `source`.
    pub fn new(db: Database, source: Arc<dyn ListingSource>) -> Self {
        StockRepository {
            db,
            source,
            parser: ListingCsvParser::new(),
        }
    }

    /// Starts a refresh and returns the stream of states it emits.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn refresh(&self, force_remote: bool, query: &str) -> ListingStream {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let refresh_id = Uuid::new_v4();
        let span = info_span!("refresh", id = %refresh_id, query = %query, force_remote);

        let task = RefreshTask {
            db: self.db.clone(),
            source: Arc::clone(&self.source),
            parser: self.parser,
            tx,
            force_remote,
            query: query.to_string(),
        };

        tokio::spawn(
            async move {
                let outcome = task.run().await;
                info!(%outcome, "Refresh finished");
            }
            .instrument(span),
        );

        ReceiverStream::new(rx)
    }
}

impl fmt::Debug for StockRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StockRepository")
            .field("db", &self.db)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Refresh Task
// =============================================================================

/// How a refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The cache was trusted; no fetch happened.
    CacheHit,
    /// The cache was replaced with `count` listings.
    Refreshed { count: u64 },
    /// An error state was emitted.
    Failed,
    /// The consumer dropped the stream before the refresh finished.
    Cancelled,
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshOutcome::CacheHit => write!(f, "cache_hit"),
            RefreshOutcome::Refreshed { count } => write!(f, "refreshed({})", count),
            RefreshOutcome::Failed => write!(f, "failed"),
            RefreshOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

struct RefreshTask {
    db: Database,
    source: Arc<dyn ListingSource>,
    parser: ListingCsvParser,
    tx: mpsc::Sender<ListingResource>,
    force_remote: bool,
    query: String,
}

impl RefreshTask {
    async fn run(self) -> RefreshOutcome {
        if !self.emit(Resource::loading(true)).await {
            return RefreshOutcome::Cancelled;
        }

        let local = match self.search(&self.query).await {
            Ok(local) => local,
            Err(e) => return self.fail(e.into()).await,
        };

        let is_store_empty = local.is_empty() && self.query.is_empty();
        debug!(cached = local.len(), is_store_empty, "Local listings loaded");

        if !self.emit(Resource::success(local)).await {
            return RefreshOutcome::Cancelled;
        }

        if !is_store_empty && !self.force_remote {
            return self.finish(RefreshOutcome::CacheHit).await;
        }

        let fetched = tokio::select! {
            biased;
            _ = self.tx.closed() => {
                debug!("Consumer dropped the stream; abandoning fetch");
                return RefreshOutcome::Cancelled;
            }
            result = self.source.fetch_listings() => result,
        };

        let parsed = match fetched.and_then(|payload| self.parse(&payload)) {
            Ok(parsed) => parsed,
            Err(e) => return self.fail(e).await,
        };

        if self.tx.is_closed() {
            debug!("Consumer dropped the stream; leaving the cache untouched");
            return RefreshOutcome::Cancelled;
        }

        let count = match self.db.listings().replace_all(&parsed).await {
            Ok(count) => count,
            Err(e) => return self.fail(e.into()).await,
        };
        info!(count, "Listing cache replaced");

        let fresh = match self.search("").await {
            Ok(fresh) => fresh,
            Err(e) => return self.fail(e.into()).await,
        };

        if !self.emit(Resource::success(fresh)).await {
            return RefreshOutcome::Cancelled;
        }

        self.finish(RefreshOutcome::Refreshed { count }).await
    }

    async fn search(&self, query: &str) -> DbResult<Vec<CompanyListing>> {
        self.db
            .listings()
            .search(query)
            .await?
            .into_iter()
            .map(ListingEntity::into_listing)
            .collect()
    }

    fn parse(&self, payload: &[u8]) -> SyncResult<Vec<CompanyListing>> {
        let mut records = self.parser.parse(payload)?;
        let listings: Vec<CompanyListing> = records.by_ref().collect();

        if records.skipped() > 0 {
            debug!(skipped = records.skipped(), "Skipped malformed listing rows");
        }

        Ok(listings)
    }

    /// Sends one state; false once the consumer is gone.
    async fn emit(&self, state: ListingResource) -> bool {
        self.tx.send(state).await.is_ok()
    }

    async fn finish(&self, outcome: RefreshOutcome) -> RefreshOutcome {
        if self.emit(Resource::loading(false)).await {
            outcome
        } else {
            RefreshOutcome::Cancelled
        }
    }

    async fn fail(&self, err: SyncError) -> RefreshOutcome {
        warn!(error = %err, retryable = err.is_retryable(), "Refresh failed");

        if self.emit(Resource::error(err.user_message())).await {
            RefreshOutcome::Failed
        } else {
            RefreshOutcome::Cancelled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(RefreshOutcome::CacheHit.to_string(), "cache_hit");
        assert_eq!(
            RefreshOutcome::Refreshed { count: 42 }.to_string(),
            "refreshed(42)"
        );
    }
}
