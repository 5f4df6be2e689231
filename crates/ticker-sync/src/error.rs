//! # Sync Error Types
//!
//! Error types for refresh operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload / Storage   │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  Parse                  │ │
//! │  │  MissingApiKey  │  │  Protocol       │  │  Storage                │ │
//! │  │  InvalidUrl     │  │                 │  │                         │ │
//! │  │  ConfigLoad     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What the User Sees
//! ```text
//! Network                         → StringKey::CheckConnection
//! Protocol { message: Some(m) }   → UiText::Dynamic(m)
//! Protocol { message: None }      → StringKey::SomethingWentWrong
//! Parse                           → StringKey::MalformedListingData
//! Storage                         → StringKey::StorageUnavailable
//! configuration errors            → StringKey::SomethingWentWrong
//! ```

use thiserror::Error;
use ticker_core::{ParseError, StringKey, UiText};
use ticker_db::DbError;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised while loading configuration or refreshing listings.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// API key missing or blank.
    #[error("API key not configured. Set api.api_key or TICKER_API_KEY.")]
    MissingApiKey,

    /// Invalid API base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The endpoint could not be reached or the body could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered, but not with a listing payload.
    ///
    /// `message` is the server-provided explanation, when there is one.
    #[error("Server error: {}", .message.as_deref().unwrap_or("no message"))]
    Protocol {
        status: Option<u16>,
        message: Option<String>,
    },

    // =========================================================================
    // Payload / Storage Errors
    // =========================================================================
    /// The payload header was unusable.
    #[error("Malformed listing payload: {0}")]
    Parse(#[from] ParseError),

    /// The local listing cache failed.
    #[error("Listing cache error: {0}")]
    Storage(#[from] DbError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

/// Convert reqwest errors to SyncError.
///
/// ## Error Mapping
/// ```text
/// timeout / connect / request / body  → SyncError::Network
/// non-2xx status                      → SyncError::Protocol
/// anything else (builder, decode ...) → SyncError::Protocol
/// ```
impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            SyncError::protocol_status(status.as_u16())
        } else if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            SyncError::Network(err.to_string())
        } else {
            SyncError::Protocol {
                status: None,
                message: None,
            }
        }
    }
}

impl SyncError {
    /// Protocol error for a non-2xx status, e.g. `HTTP 503 Service Unavailable`.
    pub fn protocol_status(code: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason());

        let message = match reason {
            Some(reason) => format!("HTTP {code} {reason}"),
            None => format!("HTTP {code}"),
        };

        SyncError::Protocol {
            status: Some(code),
            message: Some(message),
        }
    }

    // =========================================================================
    // Categorization
    // =========================================================================

    /// Returns true if retrying the same refresh later could succeed.
    ///
    /// ## Retryable Errors
    /// - Network failures
    /// - 5xx and 429 responses
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Network(_) => true,
            SyncError::Protocol {
                status: Some(code), ..
            } => *code >= 500 || *code == 429,
            _ => false,
        }
    }

    /// Returns true for configuration problems the user must fix.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::MissingApiKey
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
        )
    }

    /// Maps the error to the message a refresh emits.
    pub fn user_message(&self) -> UiText {
        match self {
            SyncError::Network(_) => StringKey::CheckConnection.into(),
            SyncError::Protocol {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => UiText::dynamic(message.trim()),
            SyncError::Parse(_) => StringKey::MalformedListingData.into(),
            SyncError::Storage(_) => StringKey::StorageUnavailable.into(),
            _ => StringKey::SomethingWentWrong.into(),
        }
    }
}
