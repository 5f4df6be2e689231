//! # Database State
//!
//! Opens the listing cache named by the effective configuration.
//!
//! ## Platform-Specific Paths
//! - **macOS**: `~/Library/Application Support/com.ticker.listings/ticker.db`
//! - **Windows**: `%APPDATA%\ticker\listings\data\ticker.db`
//! - **Linux**: `~/.local/share/listings/ticker.db`
//!
//! `TICKER_DB_PATH` or `--db` replaces the platform path.

use tracing::info;

use ticker_db::{Database, DbConfig};
use ticker_sync::SyncConfig;

use crate::error::{CliError, CliResult};

/// Connects to the cache file, creating its directory first.
///
/// Migrations run on connect.
pub async fn open_database(config: &SyncConfig) -> CliResult<Database> {
    let path = config
        .database_path()
        .ok_or_else(|| CliError::config("Could not determine app data directory; pass --db"))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    info!(path = %path.display(), "Opening listing cache");

    let db = Database::new(
        DbConfig::new(path).max_connections(config.storage.max_connections),
    )
    .await?;

    Ok(db)
}
