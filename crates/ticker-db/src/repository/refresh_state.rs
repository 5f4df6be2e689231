//! # Refresh State Repository
//!
//! Remembers when the listing cache was last replaced from the remote
//! source, and how many listings that refresh stored. Written in the same
//! transaction as [`ListingRepository::replace_all`](super::listing::ListingRepository::replace_all).

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::error::DbResult;

/// `refresh_state` key for the company listing cache.
pub const LISTINGS_KEY: &str = "company_listings";

/// Last successful refresh of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RefreshRecord {
    pub key: String,
    pub refreshed_at: DateTime<Utc>,
    pub listing_count: i64,
}

/// Repository for refresh bookkeeping.
#[derive(Debug, Clone)]
pub struct RefreshStateRepository {
    pool: SqlitePool,
}

impl RefreshStateRepository {
    /// Creates a new RefreshStateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RefreshStateRepository { pool }
    }

    /// Returns the last successful listing refresh, if any.
    pub async fn last_refresh(&self) -> DbResult<Option<RefreshRecord>> {
        let record = sqlx::query_as::<_, RefreshRecord>(
            r#"
            SELECT key, refreshed_at, listing_count
            FROM refresh_state
            WHERE key = ?1
            "#,
        )
        .bind(LISTINGS_KEY)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

/// Upserts the refresh record for `key` on an open connection or transaction.
pub(crate) async fn record(
    conn: &mut SqliteConnection,
    key: &str,
    listing_count: u64,
    refreshed_at: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO refresh_state (key, refreshed_at, listing_count)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            refreshed_at = excluded.refreshed_at,
            listing_count = excluded.listing_count
        "#,
    )
    .bind(key)
    .bind(refreshed_at)
    .bind(listing_count as i64)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
