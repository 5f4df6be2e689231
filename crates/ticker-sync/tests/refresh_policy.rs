use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};
use tokio_stream::StreamExt;

use ticker_core::{CompanyListing, Resource, StringKey, UiText};
use ticker_db::{Database, DbConfig};
use ticker_sync::{ListingResource, ListingSource, StockRepository, SyncError, SyncResult};

// ============================================================================
// Fake Source
// ============================================================================

const TWO_LISTINGS: &str = "\
symbol,name,exchange,assetType,ipoDate,delistingDate,status
AAPL,Apple Inc,NASDAQ,Stock,1980-12-12,null,Active
MSFT,Microsoft Corp,NASDAQ,Stock,1986-03-13,null,Active
";

enum Reply {
    Payload(&'static str),
    NetworkDown,
    Status(u16),
    SilentFailure,
    Hang,
}

/// Sends `()` when dropped.
struct DropSignal(Option<oneshot::Sender<()>>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

struct FakeSource {
    reply: Reply,
    calls: AtomicUsize,
    started: Notify,
    abandoned: Mutex<Option<oneshot::Sender<()>>>,
}

impl FakeSource {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(FakeSource {
            reply,
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            abandoned: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSource for FakeSource {
    async fn fetch_listings(&self) -> SyncResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.reply {
            Reply::Payload(body) => Ok(body.as_bytes().to_vec()),
            Reply::NetworkDown => Err(SyncError::Network("connection refused".into())),
            Reply::Status(code) => Err(SyncError::protocol_status(code)),
            Reply::SilentFailure => Err(SyncError::Protocol {
                status: Some(500),
                message: None,
            }),
            Reply::Hang => {
                let _guard = DropSignal(self.abandoned.lock().unwrap().take());
                self.started.notify_one();
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn listing(symbol: &str, name: &str) -> CompanyListing {
    CompanyListing::new(symbol, name, "NASDAQ").unwrap()
}

async fn seeded_db(listings: &[CompanyListing]) -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    db.listings().insert_all(listings).await.unwrap();
    db
}

async fn run(repo: &StockRepository, force_remote: bool, query: &str) -> Vec<ListingResource> {
    repo.refresh(force_remote, query).collect().await
}

async fn stored_symbols(db: &Database) -> Vec<String> {
    db.listings()
        .search("")
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.symbol)
        .collect()
}

// ============================================================================
// Cache Policy
// ============================================================================

#[tokio::test]
async fn test_cached_listings_skip_the_network() {
    let cached = vec![listing("IBM", "International Business Machines")];
    let db = seeded_db(&cached).await;
    let source = FakeSource::new(Reply::Payload(TWO_LISTINGS));
    let repo = StockRepository::new(db, source.clone());

    let states = run(&repo, false, "").await;

    assert_eq!(
        states,
        vec![
            Resource::loading(true),
            Resource::success(cached),
            Resource::loading(false),
        ]
    );
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_empty_store_fetches_without_force() {
    let db = seeded_db(&[]).await;
    let source = FakeSource::new(Reply::Payload(TWO_LISTINGS));
    let repo = StockRepository::new(db.clone(), source.clone());

    let states = run(&repo, false, "").await;

    assert_eq!(
        states,
        vec![
            Resource::loading(true),
            Resource::success(vec![]),
            Resource::success(vec![
                listing("AAPL", "Apple Inc"),
                listing("MSFT", "Microsoft Corp"),
            ]),
            Resource::loading(false),
        ]
    );
    assert_eq!(source.calls(), 1);
    assert!(db.refresh_state().last_refresh().await.unwrap().is_some());
}

#[tokio::test]
async fn test_unmatched_query_does_not_fetch() {
    let db = seeded_db(&[listing("IBM", "International Business Machines")]).await;
    let source = FakeSource::new(Reply::Payload(TWO_LISTINGS));
    let repo = StockRepository::new(db, source.clone());

    let states = run(&repo, false, "tesla").await;

    assert_eq!(
        states,
        vec![
            Resource::loading(true),
            Resource::success(vec![]),
            Resource::loading(false),
        ]
    );
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_whitespace_query_on_empty_store_does_not_fetch() {
    let db = seeded_db(&[]).await;
    let source = FakeSource::new(Reply::Payload(TWO_LISTINGS));
    let repo = StockRepository::new(db.clone(), source.clone());

    let states = run(&repo, false, " ").await;

    assert_eq!(
        states,
        vec![
            Resource::loading(true),
            Resource::success(vec![]),
            Resource::loading(false),
        ]
    );
    assert_eq!(source.calls(), 0);
    assert!(db.listings().is_empty().await.unwrap());
}

#[tokio::test]
async fn test_forced_refresh_replaces_every_listing() {
    let db = seeded_db(&[listing("OLD", "Delisted Holdings")]).await;
    let source = FakeSource::new(Reply::Payload(TWO_LISTINGS));
    let repo = StockRepository::new(db.clone(), source.clone());

    let states = run(&repo, true, "").await;

    assert_eq!(states.len(), 4);
    assert_eq!(states[1], Resource::success(vec![listing("OLD", "Delisted Holdings")]));
    assert_eq!(stored_symbols(&db).await, vec!["AAPL", "MSFT"]);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_refreshed_state_is_unfiltered() {
    let db = seeded_db(&[listing("MSFT", "Microsoft Corp")]).await;
    let source = FakeSource::new(Reply::Payload(TWO_LISTINGS));
    let repo = StockRepository::new(db, source);

    let states = run(&repo, true, "micro").await;

    assert_eq!(states[1], Resource::success(vec![listing("MSFT", "Microsoft Corp")]));
    assert_eq!(states[2].data().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_malformed_rows_are_dropped() {
    let db = seeded_db(&[]).await;
    let source = FakeSource::new(Reply::Payload(
        "symbol,name,exchange\nAAPL,Apple Inc,NASDAQ\nMSFT,Microsoft Corp\n",
    ));
    let repo = StockRepository::new(db.clone(), source);

    run(&repo, false, "").await;

    assert_eq!(stored_symbols(&db).await, vec!["AAPL"]);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_network_failure_keeps_the_cache() {
    let cached = vec![listing("IBM", "International Business Machines")];
    let db = seeded_db(&cached).await;
    let repo = StockRepository::new(db.clone(), FakeSource::new(Reply::NetworkDown));

    let states = run(&repo, true, "").await;

    assert_eq!(
        states,
        vec![
            Resource::loading(true),
            Resource::success(cached),
            Resource::error(StringKey::CheckConnection),
        ]
    );
    assert_eq!(stored_symbols(&db).await, vec!["IBM"]);
}

#[tokio::test]
async fn test_http_status_is_shown_verbatim() {
    let db = seeded_db(&[]).await;
    let repo = StockRepository::new(db, FakeSource::new(Reply::Status(503)));

    let states = run(&repo, false, "").await;

    assert_eq!(
        states.last(),
        Some(&Resource::error(UiText::dynamic("HTTP 503 Service Unavailable")))
    );
}

#[tokio::test]
async fn test_protocol_error_without_message() {
    let db = seeded_db(&[]).await;
    let repo = StockRepository::new(db, FakeSource::new(Reply::SilentFailure));

    let states = run(&repo, false, "").await;

    assert_eq!(
        states.last(),
        Some(&Resource::error(StringKey::SomethingWentWrong))
    );
}

#[tokio::test]
async fn test_bad_header_is_reported_and_cache_kept() {
    let db = seeded_db(&[listing("IBM", "International Business Machines")]).await;
    let repo = StockRepository::new(
        db.clone(),
        FakeSource::new(Reply::Payload("ticker,company\nAAPL,Apple Inc\n")),
    );

    let states = run(&repo, true, "").await;

    assert_eq!(
        states.last(),
        Some(&Resource::error(StringKey::MalformedListingData))
    );
    assert_eq!(stored_symbols(&db).await, vec!["IBM"]);
}

#[tokio::test]
async fn test_storage_failure_is_reported() {
    let db = seeded_db(&[]).await;
    db.close().await;
    let source = FakeSource::new(Reply::Payload(TWO_LISTINGS));
    let repo = StockRepository::new(db, source.clone());

    let states = run(&repo, false, "").await;

    assert_eq!(
        states,
        vec![
            Resource::loading(true),
            Resource::error(StringKey::StorageUnavailable),
        ]
    );
    assert_eq!(source.calls(), 0);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_dropping_the_stream_abandons_the_fetch() {
    let db = seeded_db(&[listing("IBM", "International Business Machines")]).await;
    let source = FakeSource::new(Reply::Hang);
    let (abandoned_tx, abandoned_rx) = oneshot::channel();
    *source.abandoned.lock().unwrap() = Some(abandoned_tx);
    let repo = StockRepository::new(db.clone(), source.clone());

    let mut states = repo.refresh(true, "");
    assert_eq!(states.next().await, Some(Resource::loading(true)));
    assert!(matches!(states.next().await, Some(Resource::Success { .. })));

    source.started.notified().await;
    drop(states);

    abandoned_rx.await.unwrap();
    assert_eq!(stored_symbols(&db).await, vec!["IBM"]);
    assert_eq!(source.calls(), 1);
}
