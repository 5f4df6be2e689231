//! # Domain Types
//!
//! Core domain types used throughout Ticker Listings.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ CompanyListing  │   │     UiText      │   │   StringKey     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  symbol         │   │  Resource(key)  │──►│ CheckConnection │       │
//! │  │  name           │   │  Dynamic(text)  │   │ SomethingWrong  │       │
//! │  │  exchange       │   │                 │   │ MalformedData   │       │
//! │  └─────────────────┘   └─────────────────┘   │ StorageUnavail. │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A listing has no identity beyond its `symbol`. The storage row id used by
//! ticker-db never leaves the database crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::validation::{validate_symbol, ValidationResult};

// =============================================================================
// Company Listing
// =============================================================================

/// A single tradable security's identifying metadata.
///
/// Immutable once constructed: fields are only readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompanyListing {
    /// Exchange ticker, e.g. `AAPL`.
    symbol: String,

    /// Display name, e.g. `Apple Inc`.
    name: String,

    /// Exchange the security trades on, e.g. `NASDAQ`.
    exchange: String,
}

impl CompanyListing {
    /// Creates a listing, trimming every field.
    ///
    /// ## Errors
    /// Fails when the symbol is empty, too long, or contains whitespace.
    ///
    /// ## Example
    /// ```rust
    /// use ticker_core::CompanyListing;
    ///
    /// let listing = CompanyListing::new(" MSFT ", "Microsoft Corp", "NASDAQ").unwrap();
    /// assert_eq!(listing.symbol(), "MSFT");
    /// assert!(CompanyListing::new("", "Nameless", "NYSE").is_err());
    /// ```
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        exchange: impl Into<String>,
    ) -> ValidationResult<Self> {
        let symbol = trimmed(symbol.into());
        validate_symbol(&symbol)?;

        Ok(CompanyListing {
            symbol,
            name: trimmed(name.into()),
            exchange: trimmed(exchange.into()),
        })
    }

    /// Returns the ticker symbol.
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the exchange.
    #[inline]
    pub fn exchange(&self) -> &str {
        &self.exchange
    }
}

impl fmt::Display for CompanyListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.symbol, self.name, self.exchange)
    }
}

fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

// =============================================================================
// Localizable Text
// =============================================================================

/// Stable keys for user-facing messages.
///
/// The UI layer owns translations; [`StringKey::default_text`] is the English
/// fallback used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StringKey {
    /// The remote source could not be reached.
    CheckConnection,
    /// Generic failure with no better explanation.
    SomethingWentWrong,
    /// The remote payload could not be decoded.
    MalformedListingData,
    /// The local listing cache could not be read or written.
    StorageUnavailable,
}

impl StringKey {
    /// Returns the English default for this key.
    pub const fn default_text(&self) -> &'static str {
        match self {
            StringKey::CheckConnection => "Couldn't load data. Please check your connection.",
            StringKey::SomethingWentWrong => "Oops, something went wrong.",
            StringKey::MalformedListingData => "The listing data received could not be read.",
            StringKey::StorageUnavailable => "Saved listings are unavailable.",
        }
    }
}

/// Text shown to the user: either a translatable key or server-provided text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiText {
    /// Translatable message identified by a stable key.
    Resource { key: StringKey },

    /// Text passed through verbatim (e.g. an upstream error message).
    Dynamic { text: String },
}

impl UiText {
    /// Creates a translatable message.
    pub const fn resource(key: StringKey) -> Self {
        UiText::Resource { key }
    }

    /// Creates a verbatim message.
    pub fn dynamic(text: impl Into<String>) -> Self {
        UiText::Dynamic { text: text.into() }
    }

    /// Returns the text in the default language.
    pub fn as_text(&self) -> &str {
        match self {
            UiText::Resource { key } => key.default_text(),
            UiText::Dynamic { text } => text,
        }
    }
}

impl From<StringKey> for UiText {
    fn from(key: StringKey) -> Self {
        UiText::resource(key)
    }
}

impl fmt::Display for UiText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
