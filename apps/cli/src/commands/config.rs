//! # `ticker config`
//!
//! Prints the effective configuration with the API key masked.

use std::io::Write;
use tracing::debug;

use crate::cli::ConfigArgs;
use crate::error::CliResult;
use crate::state::ConfigState;

/// Prints the config file path (`--path`) or the masked configuration.
pub fn execute<W: Write>(state: &ConfigState, args: &ConfigArgs, out: &mut W) -> CliResult<()> {
    debug!("config command");

    if args.path {
        match state.config_path() {
            Some(path) => writeln!(out, "{}", path.display())?,
            None => writeln!(out, "(no config directory on this platform)")?,
        }
        return Ok(());
    }

    write!(out, "{}", state.to_masked_toml()?)?;
    Ok(())
}
