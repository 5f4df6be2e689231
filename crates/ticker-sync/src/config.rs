//! # Configuration
//!
//! Configuration for the listing API client and the local cache.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TICKER_API_KEY=...                                                 │
//! │     TICKER_API_BASE_URL=https://www.alphavantage.co                    │
//! │     TICKER_API_TIMEOUT_SECS=30                                         │
//! │     TICKER_DB_PATH=/var/lib/ticker/ticker.db                           │
//! │                                                                         │
//! │  2. TOML Config File (--config, or the platform default)               │
//! │     ~/.config/ticker/ticker.toml (Linux)                               │
//! │     ~/Library/Application Support/com.ticker.listings/ticker.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     api_key = "demo", base_url = https://www.alphavantage.co           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # ticker.toml
//! [api]
//! base_url = "https://www.alphavantage.co"
//! api_key = "YOUR_KEY"
//! timeout_secs = 30
//! user_agent = "ticker/0.1.0"
//!
//! [storage]
//! database_path = "/home/me/.local/share/ticker/ticker.db"
//! max_connections = 4
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SyncError, SyncResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "ticker.toml";

/// Database file name inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "ticker.db";

// =============================================================================
// API Settings
// =============================================================================

/// Settings for the remote listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Scheme and host of the API; `/query` is appended per request.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `apikey` query parameter.
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://www.alphavantage.co".to_string()
}

fn default_api_key() -> String {
    "demo".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("ticker/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            api_key: default_api_key(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiSettings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parses `base_url`, requiring an `http` or `https` scheme.
    pub fn base_url(&self) -> SyncResult<Url> {
        let url = Url::parse(&self.base_url)?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SyncError::InvalidUrl(format!(
                "API URL must use http:// or https://, got: {}://",
                other
            ))),
        }
    }

    /// Returns the API key with all but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        let visible = chars.len().saturating_sub(4);
        chars
            .iter()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { *c })
            .collect()
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Settings for the local listing cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file path. `None` uses the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    4
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote endpoint settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Local cache settings.
    #[serde(default)]
    pub storage: StorageSettings,
}

impl SyncConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`ticker.toml`); a missing file is not an error
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if self.api.api_key.trim().is_empty() {
            return Err(SyncError::MissingApiKey);
        }

        self.api.base_url()?;

        if self.api.timeout_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(SyncError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Returns the effective database path: the configured one, or the
    /// platform data directory.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.storage
            .database_path
            .clone()
            .or_else(Self::default_database_path)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // API key (never logged)
        if let Ok(key) = std::env::var("TICKER_API_KEY") {
            debug!("Overriding API key from environment");
            self.api.api_key = key;
        }

        if let Ok(url) = std::env::var("TICKER_API_BASE_URL") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api.base_url = url;
        }

        if let Ok(timeout) = std::env::var("TICKER_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric TICKER_API_TIMEOUT_SECS"),
            }
        }

        if let Ok(path) = std::env::var("TICKER_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Returns the default database path.
    pub fn default_database_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "ticker", "listings")
}
