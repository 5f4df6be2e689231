//! # `ticker status`
//!
//! Reports how many listings are cached and when they were last fetched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use ticker_db::Database;

use crate::cli::StatusArgs;
use crate::error::CliResult;

/// Snapshot of the listing cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub listing_count: i64,
    pub last_refresh: Option<DateTime<Utc>>,
    /// Rows written by the last refresh.
    pub last_refresh_count: Option<i64>,
}

/// Reads the cache status from `db`.
pub async fn collect(db: &Database) -> CliResult<CacheStatus> {
    let listing_count = db.listings().count().await?;
    let last = db.refresh_state().last_refresh().await?;

    Ok(CacheStatus {
        listing_count,
        last_refresh: last.as_ref().map(|r| r.refreshed_at),
        last_refresh_count: last.map(|r| r.listing_count),
    })
}

/// Prints `status` to `out`.
pub fn print<W: Write>(out: &mut W, status: &CacheStatus, args: &StatusArgs) -> CliResult<()> {
    if args.json {
        serde_json::to_writer(&mut *out, status)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Cached listings: {}", status.listing_count)?;
    match status.last_refresh {
        Some(at) => writeln!(
            out,
            "Last refresh:    {} ({} rows)",
            at.format("%Y-%m-%d %H:%M:%S UTC"),
            status.last_refresh_count.unwrap_or_default()
        )?,
        None => writeln!(out, "Last refresh:    never")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticker_core::CompanyListing;
    use ticker_db::DbConfig;

    #[tokio::test]
    async fn test_empty_cache_was_never_refreshed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let status = collect(&db).await.unwrap();
        assert_eq!(status.listing_count, 0);
        assert_eq!(status.last_refresh, None);

        let mut out = Vec::new();
        print(&mut out, &status, &StatusArgs::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Cached listings: 0\nLast refresh:    never\n"
        );
    }

    #[tokio::test]
    async fn test_reports_last_replace() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.listings()
            .replace_all(&[CompanyListing::new("IBM", "IBM Corp", "NYSE").unwrap()])
            .await
            .unwrap();

        let status = collect(&db).await.unwrap();
        assert_eq!(status.listing_count, 1);
        assert_eq!(status.last_refresh_count, Some(1));
        assert!(status.last_refresh.is_some());

        let mut out = Vec::new();
        print(&mut out, &status, &StatusArgs { json: true }).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["listing_count"], 1);
    }
}
