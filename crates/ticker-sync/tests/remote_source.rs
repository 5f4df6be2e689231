use std::sync::Arc;
use std::time::Duration;

use tokio_stream::StreamExt;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use ticker_core::{Resource, UiText};
use ticker_db::{Database, DbConfig};
use ticker_sync::{AlphaVantageSource, ApiSettings, ListingSource, StockRepository, SyncError};

// ============================================================================
// Helper Functions
// ============================================================================

const LISTING_CSV: &str = "\
symbol,name,exchange,assetType,ipoDate,delistingDate,status
AAPL,Apple Inc,NASDAQ,Stock,1980-12-12,null,Active
MSFT,Microsoft Corp,NASDAQ,Stock,1986-03-13,null,Active
";

fn settings_for(base_url: String) -> ApiSettings {
    ApiSettings {
        base_url,
        api_key: "TESTKEY".to_string(),
        timeout_secs: 5,
        user_agent: "ticker-test/1.0".to_string(),
    }
}

async fn mount_listing_response(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "LISTING_STATUS"))
        .and(query_param("apikey", "TESTKEY"))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// AlphaVantageSource
// ============================================================================

#[tokio::test]
async fn test_fetch_sends_function_key_and_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "LISTING_STATUS"))
        .and(query_param("apikey", "TESTKEY"))
        .and(header("user-agent", "ticker-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_CSV))
        .expect(1)
        .mount(&server)
        .await;

    let source = AlphaVantageSource::new(&settings_for(server.uri())).unwrap();
    let body = source.fetch_listings().await.unwrap();

    assert_eq!(body, LISTING_CSV.as_bytes());
}

#[tokio::test]
async fn test_error_status_becomes_protocol_error() {
    let server = MockServer::start().await;
    mount_listing_response(&server, ResponseTemplate::new(503)).await;

    let source = AlphaVantageSource::new(&settings_for(server.uri())).unwrap();
    let err = source.fetch_listings().await.unwrap_err();

    match err {
        SyncError::Protocol { status, message } => {
            assert_eq!(status, Some(503));
            assert_eq!(message.as_deref(), Some("HTTP 503 Service Unavailable"));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_json_notice_becomes_protocol_error() {
    let server = MockServer::start().await;
    mount_listing_response(
        &server,
        ResponseTemplate::new(200).set_body_string(
            r#"{"Information": "The demo API key is for demo purposes only."}"#,
        ),
    )
    .await;

    let source = AlphaVantageSource::new(&settings_for(server.uri())).unwrap();
    let err = source.fetch_listings().await.unwrap_err();

    assert_eq!(
        err.user_message(),
        UiText::dynamic("The demo API key is for demo purposes only.")
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_unreachable_host_is_a_network_error() {
    // Bind then release a port so nothing is listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let source = AlphaVantageSource::new(&settings_for(format!("http://127.0.0.1:{port}"))).unwrap();
    let err = source.fetch_listings().await.unwrap_err();

    assert!(matches!(err, SyncError::Network(_)), "got {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_slow_response_times_out_as_network_error() {
    let server = MockServer::start().await;
    mount_listing_response(
        &server,
        ResponseTemplate::new(200)
            .set_body_string(LISTING_CSV)
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let mut settings = settings_for(server.uri());
    settings.timeout_secs = 1;

    let source = AlphaVantageSource::new(&settings).unwrap();
    let err = source.fetch_listings().await.unwrap_err();

    assert!(matches!(err, SyncError::Network(_)), "got {err:?}");
}

// ============================================================================
// End to End
// ============================================================================

#[tokio::test]
async fn test_refresh_over_http_populates_the_store() {
    let server = MockServer::start().await;
    mount_listing_response(&server, ResponseTemplate::new(200).set_body_string(LISTING_CSV)).await;

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let source = Arc::new(AlphaVantageSource::new(&settings_for(server.uri())).unwrap());
    let repo = StockRepository::new(db.clone(), source);

    let states: Vec<_> = repo.refresh(false, "").collect().await;

    assert_eq!(states.len(), 4);
    assert_eq!(states.last(), Some(&Resource::loading(false)));

    let hits = db.listings().search("micro").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].symbol, "MSFT");
}

#[tokio::test]
async fn test_refresh_over_http_reports_rate_limit_notice() {
    let server = MockServer::start().await;
    mount_listing_response(
        &server,
        ResponseTemplate::new(200)
            .set_body_string(r#"{"Note": "Thank you for using Alpha Vantage! Please slow down."}"#),
    )
    .await;

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let source = Arc::new(AlphaVantageSource::new(&settings_for(server.uri())).unwrap());
    let repo = StockRepository::new(db.clone(), source);

    let states: Vec<_> = repo.refresh(true, "").collect().await;

    assert_eq!(
        states.last(),
        Some(&Resource::error(UiText::dynamic(
            "Thank you for using Alpha Vantage! Please slow down."
        )))
    );
    assert!(db.listings().is_empty().await.unwrap());
}
