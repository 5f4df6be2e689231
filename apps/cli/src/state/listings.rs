//! # Listings Screen State
//!
//! Folds refresh states into what the listing screen shows, and turns user
//! events into refresh requests.
//!
//! ```text
//!  ListingsEvent::Refresh ─────────────┐
//!  ListingsEvent::SearchQueryChanged ──┤ handle() ──► RefreshRequest
//!                                      │                   │
//!                                      │   StockRepository::refresh()
//!                                      │                   │
//!  ListingsState ◄──────── apply() ◄───┴────── Resource ───┘
//! ```

use serde::Serialize;

use ticker_core::{CompanyListing, Resource, UiText};

/// User input on the listing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingsEvent {
    /// Pull-to-refresh: fetch from the remote source.
    Refresh,
    /// The search box changed.
    SearchQueryChanged(String),
}

/// Arguments for the refresh an event asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    pub force_remote: bool,
    pub query: String,
}

/// What the listing screen shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingsState {
    pub companies: Vec<CompanyListing>,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub search_query: String,
    /// Message from the last failed refresh; cleared by new data or a new event.
    pub error: Option<UiText>,
}

impl ListingsState {
    /// Creates the initial (empty) screen state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `event` and returns the refresh it triggers.
    pub fn handle(&mut self, event: ListingsEvent) -> RefreshRequest {
        let force_remote = match event {
            ListingsEvent::Refresh => {
                self.is_refreshing = true;
                true
            }
            ListingsEvent::SearchQueryChanged(query) => {
                self.search_query = query;
                false
            }
        };

        self.error = None;

        RefreshRequest {
            force_remote,
            query: self.search_query.trim().to_lowercase(),
        }
    }

    /// Folds one refresh state into the screen.
    ///
    /// Loaded listings survive an error; the error is shown next to them.
    pub fn apply(&mut self, state: Resource<Vec<CompanyListing>>) {
        match state {
            Resource::Loading { is_active } => {
                self.is_loading = is_active;
                if !is_active {
                    self.is_refreshing = false;
                }
            }
            Resource::Success { data } => {
                self.companies = data;
                self.error = None;
            }
            Resource::Error { message } => {
                self.is_loading = false;
                self.is_refreshing = false;
                self.error = Some(message);
            }
        }
    }
}
