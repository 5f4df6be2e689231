//! # Resource
//!
//! One point-in-time snapshot of an in-flight operation.
//!
//! ## Refresh Emission Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    What a refresh emits                                 │
//! │                                                                         │
//! │  Loading { is_active: true }      ← always first                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success { data: <cached> }       ← always, even if empty              │
//! │         │                                                               │
//! │         ├── cache trusted ──► Loading { is_active: false }   (end)     │
//! │         │                                                               │
//! │         ├── fetch failed ───► Error { message }              (end)     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success { data: <fresh> }                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Loading { is_active: false }                                (end)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::UiText;

/// Tagged state wrapper emitted by long-running operations.
///
/// Consumers match exhaustively; there is no catch-all variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resource<T> {
    /// The operation started (`true`) or finished (`false`).
    Loading { is_active: bool },

    /// A usable result.
    Success { data: T },

    /// The operation failed; carries a user-facing message.
    Error { message: UiText },
}

impl<T> Resource<T> {
    /// Shorthand for `Loading { is_active }`.
    pub const fn loading(is_active: bool) -> Self {
        Resource::Loading { is_active }
    }

    /// Shorthand for `Success { data }`.
    pub const fn success(data: T) -> Self {
        Resource::Success { data }
    }

    /// Shorthand for `Error { message }`.
    pub fn error(message: impl Into<UiText>) -> Self {
        Resource::Error {
            message: message.into(),
        }
    }

    /// Returns the data of a `Success`, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success { data } => Some(data),
            _ => None,
        }
    }

    /// Returns true for an `Error`.
    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error { .. })
    }

    /// Maps the success payload, keeping other variants.
    pub fn map<U, F>(self, f: F) -> Resource<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Resource::Loading { is_active } => Resource::Loading { is_active },
            Resource::Success { data } => Resource::Success { data: f(data) },
            Resource::Error { message } => Resource::Error { message },
        }
    }
}
