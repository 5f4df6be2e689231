//! # CLI Error Type
//!
//! Unified error type for `ticker` commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ticker                                 │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  CliResult<T>                                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Config Error? ──── SyncError::MissingApiKey ───────┐           │  │
//! │  │         │                                           │           │  │
//! │  │         ▼                                           ▼           │  │
//! │  │  Database Error? ── DbError::ConnectionFailed ──► CliError      │  │
//! │  │         │                                           │           │  │
//! │  │         ▼                                           │           │  │
//! │  │  Refresh ended in Resource::Error ────────────────► │           │  │
//! │  └─────────────────────────────────────────────────────┼───────────┘  │
//! │                                                        ▼              │
//! │                      stderr: "error: <message>"   exit code by kind   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exit Codes
//! | Code | Meaning                        |
//! |------|--------------------------------|
//! | 1    | Internal / I/O failure         |
//! | 2    | Usage (reserved by clap)       |
//! | 3    | Configuration problem          |
//! | 4    | Local cache unavailable        |
//! | 5    | Refresh ended in an error      |

use serde::Serialize;
use std::fmt;
use std::process::ExitCode;

use ticker_core::UiText;
use ticker_db::DbError;
use ticker_sync::SyncError;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Error returned from a command.
///
/// ## Serialization
/// With `--json` the error is written to stdout as the last line:
/// ```json
/// { "code": "REFRESH_FAILED", "message": "Couldn't load data. Please check your connection." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Config file or environment is unusable
    ConfigError,

    /// The local listing cache could not be opened or queried
    DatabaseError,

    /// A refresh finished with an error state
    RefreshFailed,

    /// Terminal or file I/O failed
    IoError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit code for this category.
    pub const fn exit_code(self) -> u8 {
        match self {
            ErrorCode::Internal | ErrorCode::IoError => 1,
            ErrorCode::ConfigError => 3,
            ErrorCode::DatabaseError => 4,
            ErrorCode::RefreshFailed => 5,
        }
    }
}

impl CliError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    /// Wraps the message a failed refresh emitted.
    pub fn refresh(message: &UiText) -> Self {
        CliError::new(ErrorCode::RefreshFailed, message.as_text())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_code())
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        match err {
            e if e.is_config_error() => CliError::config(e.to_string()),
            SyncError::Storage(e) => e.into(),
            e => CliError::refresh(&e.user_message()),
        }
    }
}

impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Could not open the listing cache")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Listing cache schema could not be updated")
            }
            e => {
                tracing::error!("Database operation failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Listing cache operation failed")
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("JSON output failed: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::internal(format!("TOML output failed: {}", err))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;
    use ticker_core::StringKey;

    #[test]
    fn test_sync_errors_are_categorized() {
        let err: CliError = SyncError::MissingApiKey.into();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let err: CliError = SyncError::Network("refused".into()).into();
        assert_eq!(err.code, ErrorCode::RefreshFailed);
        assert_eq!(err.message, StringKey::CheckConnection.default_text());

        let err: CliError = SyncError::Storage(DbError::PoolExhausted).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        assert_eq!(ErrorCode::ConfigError.exit_code(), 3);
        assert_eq!(ErrorCode::DatabaseError.exit_code(), 4);
        assert_eq!(ErrorCode::RefreshFailed.exit_code(), 5);
    }

    #[test]
    fn test_serializes_code_and_message() {
        let err = CliError::refresh(&UiText::dynamic("HTTP 503 Service Unavailable"));
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            r#"{"code":"REFRESH_FAILED","message":"HTTP 503 Service Unavailable"}"#
        );
    }
}
