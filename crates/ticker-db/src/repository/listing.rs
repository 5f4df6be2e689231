//! # Listing Repository
//!
//! Search and bulk-write operations over the `company_listings` table.
//!
//! ## Search Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  search("micro")                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  trim + escape LIKE metacharacters   "micro" → "%micro%"               │
//! │       │                              "50%"   → "%50\%%"                │
//! │       ▼                                                                 │
//! │  name LIKE pattern OR symbol LIKE pattern   (ASCII case-insensitive)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ORDER BY id   (insertion order)                                       │
//! │                                                                         │
//! │  search("") returns every row.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Full Replacement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   SINGLE TRANSACTION                                    │
//! │                                                                         │
//! │  1. DELETE FROM company_listings                                       │
//! │  2. INSERT INTO company_listings ... (chunked multi-row VALUES)         │
//! │  3. UPSERT refresh_state ('company_listings', now, count)              │
//! │                                                                         │
//! │  COMMIT ← readers see the old set or the new set, never a mix          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::refresh_state::{self, LISTINGS_KEY};
use ticker_core::CompanyListing;

/// Rows per multi-row INSERT (3 bound parameters each).
const INSERT_CHUNK_ROWS: usize = 300;

// =============================================================================
// Entity
// =============================================================================

/// Persisted form of a [`CompanyListing`].
///
/// `id` is assigned by SQLite and only orders rows; it is dropped when the
/// entity is converted back into a listing.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ListingEntity {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

impl ListingEntity {
    /// Converts the row into a domain listing.
    pub fn into_listing(self) -> DbResult<CompanyListing> {
        CompanyListing::try_from(self)
    }
}

impl TryFrom<ListingEntity> for CompanyListing {
    type Error = DbError;

    fn try_from(entity: ListingEntity) -> DbResult<Self> {
        CompanyListing::new(entity.symbol, entity.name, entity.exchange)
            .map_err(|e| DbError::corrupt("company_listings.symbol", e))
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the listing cache.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    pool: SqlitePool,
}

impl ListingRepository {
    /// Creates a new ListingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ListingRepository { pool }
    }

    /// Finds listings whose name or symbol contains `query`.
    ///
    /// Matching uses SQLite `LIKE`, which folds case for ASCII letters only:
    /// `"ibm"` finds `IBM`, but `"é"` does not find `É`.
    ///
    /// An empty (or all-whitespace) query returns every listing. Results are
    /// in insertion order.
    pub async fn search(&self, query: &str) -> DbResult<Vec<ListingEntity>> {
        let query = query.trim();
        let pattern = format!("%{}%", escape_like(query));

        debug!(query = %query, "Searching listings");

        let listings = sqlx::query_as::<_, ListingEntity>(
            r#"
            SELECT id, symbol, name, exchange
            FROM company_listings
            WHERE name LIKE ?1 ESCAPE '\'
               OR symbol LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = listings.len(), "Search returned listings");

        Ok(listings)
    }

    /// Removes every listing. Returns the number of rows deleted.
    pub async fn clear_all(&self) -> DbResult<u64> {
        let mut conn = self.pool.acquire().await?;
        let deleted = delete_rows(&mut conn).await?;

        debug!(deleted, "Cleared listing cache");
        Ok(deleted)
    }

    /// Appends `listings` in one transaction. Existing rows are kept.
    pub async fn insert_all(&self, listings: &[CompanyListing]) -> DbResult<u64> {
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;
        let inserted = insert_rows(&mut tx, listings).await?;
        tx.commit().await.map_err(DbError::transaction)?;

        debug!(inserted, "Inserted listings");
        Ok(inserted)
    }

    /// Replaces the whole cache with `listings` and records the refresh.
    ///
    /// Clear, insert and bookkeeping commit together or not at all.
    pub async fn replace_all(&self, listings: &[CompanyListing]) -> DbResult<u64> {
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let deleted = delete_rows(&mut tx).await?;
        let inserted = insert_rows(&mut tx, listings).await?;
        refresh_state::record(&mut tx, LISTINGS_KEY, inserted, Utc::now()).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        debug!(deleted, inserted, "Replaced listing cache");
        Ok(inserted)
    }

    /// Counts stored listings (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM company_listings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Returns true when the cache holds no listings.
    pub async fn is_empty(&self) -> DbResult<bool> {
        let any: Option<i64> = sqlx::query_scalar("SELECT id FROM company_listings LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(any.is_none())
    }
}

// =============================================================================
// Statement Helpers
// =============================================================================

async fn delete_rows(conn: &mut SqliteConnection) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM company_listings")
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

async fn insert_rows(conn: &mut SqliteConnection, listings: &[CompanyListing]) -> DbResult<u64> {
    let mut inserted = 0;

    for chunk in listings.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO company_listings (symbol, name, exchange) ");

        builder.push_values(chunk, |mut row, listing| {
            row.push_bind(listing.symbol())
                .push_bind(listing.name())
                .push_bind(listing.exchange());
        });

        inserted += builder.build().execute(&mut *conn).await?.rows_affected();
    }

    Ok(inserted)
}

/// Escapes `\`, `%` and `_` so they match literally under `ESCAPE '\'`.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================
