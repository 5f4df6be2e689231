//! # ticker-sync: Remote Source and Refresh Policy
//!
//! Keeps the local listing cache in step with the remote listing API.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Refresh Architecture                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 StockRepository (repository.rs)                  │  │
//! │  │                                                                  │  │
//! │  │  refresh(force_remote, query) ──► ListingStream                  │  │
//! │  │  One spawned task per call, states sent over an mpsc channel    │  │
//! │  └───────────────┬───────────────────────────────┬──────────────────┘  │
//! │                  │                               │                      │
//! │                  ▼                               ▼                      │
//! │  ┌────────────────────────────┐   ┌────────────────────────────────┐   │
//! │  │  ListingSource (remote.rs) │   │  ticker-db ListingRepository   │   │
//! │  │                            │   │                                │   │
//! │  │  AlphaVantageSource        │   │  search / replace_all          │   │
//! │  │  GET /query?function=      │   │  (SQLite, WAL, sync=FULL)      │   │
//! │  │      LISTING_STATUS        │   │                                │   │
//! │  └────────────────────────────┘   └────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌────────────────────────────┐   ┌────────────────────────────────┐   │
//! │  │  SyncConfig (config.rs)    │   │  SyncError (error.rs)          │   │
//! │  │  defaults → TOML → env     │   │  Network / Protocol / Parse /  │   │
//! │  │                            │   │  Storage → UiText              │   │
//! │  └────────────────────────────┘   └────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - API and storage configuration
//! - [`error`] - Sync error types and user-facing messages
//! - [`remote`] - `ListingSource` trait and the HTTP implementation
//! - [`repository`] - `StockRepository` and the refresh state machine
//!
//! ## Quick Start
//! ```rust,ignore
//! use std::sync::Arc;
//! use ticker_db::{Database, DbConfig};
//! use ticker_sync::{AlphaVantageSource, StockRepository, SyncConfig};
//! use tokio_stream::StreamExt;
//!
//! let config = SyncConfig::load(None)?;
//! let db = Database::new(DbConfig::new("ticker.db")).await?;
//! let source = Arc::new(AlphaVantageSource::new(&config.api)?);
//!
//! let repo = StockRepository::new(db, source);
//! let mut states = repo.refresh(false, "");
//! while let Some(state) = states.next().await {
//!     println!("{:?}", state);
//! }
//! ```

pub mod config;
pub mod error;
pub mod remote;
pub mod repository;

pub use config::{ApiSettings, StorageSettings, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use remote::{AlphaVantageSource, ListingSource};
pub use repository::{ListingResource, ListingStream, RefreshOutcome, StockRepository};
