//! # Validation Module
//!
//! Field validation for listing records.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CSV decoding (ticker-core::csv_parser)                       │
//! │  ├── Column count must match the header                                │
//! │  └── THIS MODULE: symbol rules via CompanyListing::new                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  └── NOT NULL constraints                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_SYMBOL_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates an exchange ticker symbol.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most [`MAX_SYMBOL_LEN`] characters
/// - No interior whitespace
///
/// ## Example
/// ```rust
/// use ticker_core::validation::validate_symbol;
///
/// assert!(validate_symbol("BRK-A").is_ok());
/// assert!(validate_symbol("").is_err());
/// ```
pub fn validate_symbol(symbol: &str) -> ValidationResult<()> {
    let symbol = symbol.trim();

    if symbol.is_empty() {
        return Err(ValidationError::Required {
            field: "symbol".to_string(),
        });
    }

    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(ValidationError::TooLong {
            field: "symbol".to_string(),
            max: MAX_SYMBOL_LEN,
        });
    }

    if symbol.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "symbol".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
