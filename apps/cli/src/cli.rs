//! # Command-Line Interface
//!
//! Argument definitions for the `ticker` binary.
//!
//! ```text
//! ticker [--config <FILE>] [--db <FILE>] <COMMAND>
//!
//!   listings [QUERY] [--refresh] [--json]   one refresh, print the result
//!   browse                                  interactive search loop
//!   status   [--json]                       cache size and last refresh
//!   config   [--path]                       effective configuration
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Browse and refresh the company listing cache.
#[derive(Debug, Parser)]
#[command(name = "ticker", version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Listing cache database file
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load listings matching QUERY, fetching when the cache is empty
    Listings(ListingsArgs),

    /// Read search queries from stdin (`:r` refreshes, `:q` quits)
    Browse,

    /// Show how many listings are cached and when they were fetched
    Status(StatusArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListingsArgs {
    /// Case-insensitive name or symbol fragment
    #[arg(default_value = "")]
    pub query: String,

    /// Fetch from the remote source even when the cache has data
    #[arg(short, long)]
    pub refresh: bool,

    /// Print every state as one JSON object per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct StatusArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Only print the config file path
    #[arg(long)]
    pub path: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_listings_with_flags() {
        let cli = Cli::try_parse_from(["ticker", "--db", "/tmp/t.db", "listings", "micro", "-r"])
            .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/t.db")));
        match cli.command {
            Command::Listings(args) => {
                assert_eq!(args.query, "micro");
                assert!(args.refresh);
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_query_defaults_to_blank() {
        let cli = Cli::try_parse_from(["ticker", "listings", "--json"]).unwrap();
        match cli.command {
            Command::Listings(args) => {
                assert_eq!(args.query, "");
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ticker", "status", "--config", "ticker.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ticker.toml")));
    }
}
