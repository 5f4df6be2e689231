//! # Configuration State
//!
//! The loaded [`SyncConfig`] plus the command-line overrides applied on top.
//!
//! ## Precedence (later wins)
//! 1. Defaults
//! 2. `ticker.toml` (platform config dir, or `--config`)
//! 3. `TICKER_*` environment variables
//! 4. `--db`

use serde::Serialize;
use std::path::{Path, PathBuf};

use ticker_sync::{SyncConfig, SyncResult};

/// Effective configuration for one invocation.
#[derive(Debug, Clone)]
pub struct ConfigState {
    config: SyncConfig,
    config_path: Option<PathBuf>,
}

/// What `ticker config` prints. The API key is masked.
#[derive(Debug, Serialize)]
struct ConfigView<'a> {
    api: ApiView<'a>,
    storage: StorageView,
}

#[derive(Debug, Serialize)]
struct ApiView<'a> {
    base_url: &'a str,
    api_key: String,
    timeout_secs: u64,
    user_agent: &'a str,
}

#[derive(Debug, Serialize)]
struct StorageView {
    #[serde(skip_serializing_if = "Option::is_none")]
    database_path: Option<String>,
    max_connections: u32,
}

impl ConfigState {
    /// Loads configuration and applies the `--db` override.
    pub fn load(config_path: Option<PathBuf>, db_path: Option<PathBuf>) -> SyncResult<Self> {
        let config_path = config_path.or_else(SyncConfig::default_config_path);
        let mut config = SyncConfig::load(config_path.clone())?;

        if let Some(path) = db_path {
            config.storage.database_path = Some(path);
        }

        Ok(ConfigState::new(config, config_path))
    }

    /// Wraps an already-built config.
    pub fn new(config: SyncConfig, config_path: Option<PathBuf>) -> Self {
        ConfigState {
            config,
            config_path,
        }
    }

    /// The effective configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Config file consulted (it may not exist).
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Renders the configuration as TOML with the API key masked.
    pub fn to_masked_toml(&self) -> Result<String, toml::ser::Error> {
        let api = &self.config.api;
        let view = ConfigView {
            api: ApiView {
                base_url: &api.base_url,
                api_key: api.masked_api_key(),
                timeout_secs: api.timeout_secs,
                user_agent: &api.user_agent,
            },
            storage: StorageView {
                database_path: self
                    .config
                    .database_path()
                    .map(|p| p.display().to_string()),
                max_connections: self.config.storage.max_connections,
            },
        };

        toml::to_string_pretty(&view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_toml_hides_the_key() {
        let mut config = SyncConfig::default();
        config.api.api_key = "SECRETKEY1234".to_string();
        config.storage.database_path = Some(PathBuf::from("/data/ticker.db"));

        let state = ConfigState::new(config, None);
        let rendered = state.to_masked_toml().unwrap();

        assert!(!rendered.contains("SECRETKEY"));
        assert!(rendered.contains("*********1234"));
        assert!(rendered.contains("/data/ticker.db"));
        assert!(rendered.contains("max_connections = 4"));
    }

    #[test]
    fn test_load_applies_db_override() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("ticker.toml");
        std::fs::write(&config_file, "[storage]\ndatabase_path = \"/from/file.db\"\n").unwrap();

        let override_path = dir.path().join("override.db");
        let state = ConfigState::load(Some(config_file.clone()), Some(override_path.clone()));

        // TICKER_DB_PATH in the environment would win over the file, but not over --db.
        let state = state.unwrap();
        assert_eq!(state.config().database_path(), Some(override_path));
        assert_eq!(state.config_path(), Some(config_file.as_path()));
    }
}
