//! # ticker-core: Pure Domain Logic for Ticker Listings
//!
//! This crate is the **heart** of Ticker Listings. It contains the domain
//! types and the listing payload decoder, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ticker Listings Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    CLI / UI collaborator                        │   │
//! │  │        Listing screen ──► search box ──► pull-to-refresh        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Stream<Resource<Vec<CompanyListing>>> │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ticker-sync (refresh policy)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ticker-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ resource  │  │csv_parser │  │ validation│  │   │
//! │  │   │  Listing  │  │ Resource  │  │  Parser   │  │  symbols  │  │   │
//! │  │   │  UiText   │  │  Loading  │  │  Records  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • DECODES FROM ANY io::Read          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  ticker-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CompanyListing, UiText)
//! - [`resource`] - The `Resource<T>` state snapshot emitted by a refresh
//! - [`csv_parser`] - Lazy decoder for the listing CSV payload
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use ticker_core::csv_parser::ListingCsvParser;
//!
//! let payload = "symbol,name,exchange\nAAPL,Apple Inc,NASDAQ\n";
//! let listings: Vec<_> = ListingCsvParser::new()
//!     .parse(payload.as_bytes())
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(listings[0].symbol(), "AAPL");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod csv_parser;
pub mod error;
pub mod resource;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use csv_parser::{ListingCsvParser, ListingRecords};
pub use error::{ParseError, ValidationError};
pub use resource::Resource;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an exchange ticker symbol.
///
/// Real tickers are far shorter; anything longer is treated as a corrupt row.
pub const MAX_SYMBOL_LEN: usize = 32;

/// Columns every listing payload header must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["symbol", "name", "exchange"];
