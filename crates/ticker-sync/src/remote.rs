//! # Remote Listing Source
//!
//! Fetches the raw `LISTING_STATUS` payload from the listing API.
//!
//! ## Request / Response
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET {base_url}/query?function=LISTING_STATUS&apikey={api_key}          │
//! │       │                                                                 │
//! │       ├── transport failure / timeout ──────► SyncError::Network        │
//! │       │                                                                 │
//! │       ├── non-2xx ──────────────────────────► SyncError::Protocol       │
//! │       │                                        "HTTP 503 Service ..."   │
//! │       │                                                                 │
//! │       ├── 2xx, JSON notice body ────────────► SyncError::Protocol       │
//! │       │   {"Information": "..."}               message = notice text    │
//! │       │   {"Note": "..."}                                               │
//! │       │   {"Error Message": "..."}                                      │
//! │       │                                                                 │
//! │       └── 2xx, anything else ───────────────► Ok(raw CSV bytes)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The upstream reports invalid keys and rate limiting with a 200 status and
//! a small JSON object instead of CSV, so the body is sniffed before it is
//! handed to the parser.
//!
//! One request per call; no retries at this layer.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::error::{SyncError, SyncResult};

/// `function` query parameter of the listing endpoint.
pub const LISTING_FUNCTION: &str = "LISTING_STATUS";

// =============================================================================
// Source Trait
// =============================================================================

/// Anything that can produce a raw listing payload.
///
/// [`StockRepository`](crate::StockRepository) only depends on this trait,
/// so tests drive it with an in-memory fake.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Performs one fetch and returns the payload bytes.
    async fn fetch_listings(&self) -> SyncResult<Vec<u8>>;
}

// =============================================================================
// Alpha Vantage Implementation
// =============================================================================

/// [`ListingSource`] backed by the Alpha Vantage HTTP API.
#[derive(Clone)]
pub struct AlphaVantageSource {
    client: Client,
    endpoint: Url,
}

impl AlphaVantageSource {
    /// Builds a client for `settings`.
    ///
    /// ## Errors
    /// - [`SyncError::MissingApiKey`] for a blank key
    /// - [`SyncError::InvalidUrl`] for an unusable base URL
    pub fn new(settings: &ApiSettings) -> SyncResult<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(SyncError::MissingApiKey);
        }

        let endpoint = listing_endpoint(&settings.base_url()?, settings.api_key.trim())?;

        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| SyncError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(AlphaVantageSource { client, endpoint })
    }

    /// Host the source talks to (for logs; never includes the key).
    pub fn host(&self) -> &str {
        self.endpoint.host_str().unwrap_or("unknown")
    }
}

impl fmt::Debug for AlphaVantageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageSource")
            .field("host", &self.host())
            .field("path", &self.endpoint.path())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ListingSource for AlphaVantageSource {
    async fn fetch_listings(&self) -> SyncResult<Vec<u8>> {
        debug!(host = %self.host(), "Requesting listing payload");

        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Listing endpoint returned an error status");
            return Err(SyncError::protocol_status(status.as_u16()));
        }

        let body = response.bytes().await?;

        if let Some(notice) = ApiNotice::sniff(&body) {
            warn!(notice = ?notice.text(), "Listing endpoint returned a notice instead of CSV");
            return Err(SyncError::Protocol {
                status: Some(status.as_u16()),
                message: notice.text().map(str::to_string),
            });
        }

        debug!(bytes = body.len(), "Listing payload received");
        Ok(body.to_vec())
    }
}

/// Appends `/query` and the listing parameters to `base`.
fn listing_endpoint(base: &Url, api_key: &str) -> SyncResult<Url> {
    let mut endpoint = base.clone();

    endpoint
        .path_segments_mut()
        .map_err(|_| SyncError::InvalidUrl(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .push("query");

    endpoint
        .query_pairs_mut()
        .append_pair("function", LISTING_FUNCTION)
        .append_pair("apikey", api_key);

    Ok(endpoint)
}

// =============================================================================
// JSON Notices
// =============================================================================

/// JSON object the upstream sends in place of CSV.
#[derive(Debug, Default, Deserialize)]
struct ApiNotice {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,

    #[serde(rename = "Information")]
    information: Option<String>,

    #[serde(rename = "Note")]
    note: Option<String>,
}

impl ApiNotice {
    /// Returns the notice if `body` is a JSON object rather than CSV.
    fn sniff(body: &[u8]) -> Option<Self> {
        let first = body.iter().find(|b| !b.is_ascii_whitespace())?;
        if *first != b'{' {
            return None;
        }
        serde_json::from_slice(body).ok()
    }

    fn text(&self) -> Option<&str> {
        [&self.error_message, &self.information, &self.note]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_endpoint() {
        let base = Url::parse("https://www.alphavantage.co").unwrap();
        let url = listing_endpoint(&base, "KEY").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.alphavantage.co/query?function=LISTING_STATUS&apikey=KEY"
        );

        let base = Url::parse("http://localhost:9000/proxy/").unwrap();
        let url = listing_endpoint(&base, "a b").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/proxy/query?function=LISTING_STATUS&apikey=a+b"
        );
    }

    #[test]
    fn test_sniff_notice() {
        let notice = ApiNotice::sniff(br#"  {"Information": "Rate limit reached."}"#).unwrap();
        assert_eq!(notice.text(), Some("Rate limit reached."));

        let notice = ApiNotice::sniff(br#"{"Error Message": "Invalid API call."}"#).unwrap();
        assert_eq!(notice.text(), Some("Invalid API call."));

        let notice = ApiNotice::sniff(br#"{"unexpected": 1}"#).unwrap();
        assert_eq!(notice.text(), None);

        assert!(ApiNotice::sniff(b"symbol,name,exchange\n").is_none());
        assert!(ApiNotice::sniff(b"").is_none());
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let settings = ApiSettings {
            api_key: " ".to_string(),
            ..ApiSettings::default()
        };
        assert!(matches!(
            AlphaVantageSource::new(&settings),
            Err(SyncError::MissingApiKey)
        ));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let settings = ApiSettings {
            api_key: "TOPSECRET".to_string(),
            ..ApiSettings::default()
        };
        let source = AlphaVantageSource::new(&settings).unwrap();
        let debug = format!("{:?}", source);

        assert!(debug.contains("www.alphavantage.co"));
        assert!(!debug.contains("TOPSECRET"));
    }
}
