//! # Repository Module
//!
//! Repository implementations for the listing store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  StockRepository (ticker-sync)                                         │
//! │       │                                                                 │
//! │       │  db.listings().search("micro")                                 │
//! │       ▼                                                                 │
//! │  ListingRepository                                                     │
//! │  ├── search(&self, query)                                              │
//! │  ├── clear_all(&self)                                                  │
//! │  ├── insert_all(&self, listings)                                       │
//! │  ├── replace_all(&self, listings)   ← clear + insert + bookkeeping     │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ListingRepository`](listing::ListingRepository) - Listing cache search and bulk writes
//! - [`RefreshStateRepository`](refresh_state::RefreshStateRepository) - Last successful refresh

pub mod listing;
pub mod refresh_state;
