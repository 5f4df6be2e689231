//! # ticker
//!
//! Entry point for the `ticker` binary. All logic lives in the library
//! half (`ticker_cli`) so it can be tested.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    ticker_cli::run().await
}
