//! # State Module
//!
//! Everything a command needs besides its arguments.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      lib.rs run()                               │   │
//! │  │  ConfigState::load(--config, --db)                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │ ConfigState  │  │ open_database()  │  │  ListingsState   │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  SyncConfig  │  │  Database        │  │  companies       │          │
//! │  │  file path   │  │  (SQLite pool)   │  │  is_loading      │          │
//! │  │              │  │                  │  │  search_query    │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  ListingsState is the screen: it folds refresh states and turns        │
//! │  user events into refresh requests.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod listings;

pub use config::ConfigState;
pub use db::open_database;
pub use listings::{ListingsEvent, ListingsState, RefreshRequest};
