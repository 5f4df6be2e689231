//! # Error Types
//!
//! Domain-specific error types for ticker-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ticker-core errors (this file)                                        │
//! │  ├── ParseError       - Listing payload header is unusable             │
//! │  └── ValidationError  - Field validation failures                      │
//! │                                                                         │
//! │  ticker-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  ticker-sync errors (separate crate)                                   │
//! │  └── SyncError        - Network / protocol / parse / storage           │
//! │                                                                         │
//! │  Flow: ParseError → SyncError → Resource::Error(UiText) → UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, column names)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Parse Error
// =============================================================================

/// Failure to decode a listing payload.
///
/// Only the header can fail a parse. Broken data rows are skipped by the
/// record iterator instead of aborting the whole listing set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The payload is empty or its first row is blank.
    #[error("Listing payload has no header row")]
    MissingHeader,

    /// The header row exists but lacks one or more tracked columns.
    ///
    /// ## When This Occurs
    /// - Upstream returned a JSON notice instead of CSV
    /// - Upstream renamed a column
    #[error("Listing header is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// The header row could not be decoded (I/O failure, invalid UTF-8).
    #[error("Listing header could not be read: {0}")]
    HeaderUnreadable(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for parser results.
pub type ParseResult<T> = Result<T, ParseError>;

// =============================================================================
// Unit Tests
// =============================================================================
