//! SEDDIT Transaction Engine CLI
//!
//! Command-line interface for submitting wallet-gated social actions and
//! inspecting the durable transaction history.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- submit post "hello SEDDIT"
//! cargo run -- --balance 0.001 submit post "fails on fee"
//! cargo run -- --offline submit like post-42
//! cargo run -- drain
//! cargo run -- history --status success
//! cargo run -- stats
//! ```
//!
//! The wallet, settlement backend, and connectivity state are simulated
//! in-process; flags control their behavior. Logging is configured through
//! `RUST_LOG` (e.g. `RUST_LOG=seddit_engine=debug`).
//!
//! # Exit Codes
//!
//! - 0: Success (including failed-but-recorded settlements)
//! - 1: Error (precondition failure, storage fault, etc.)

use seddit_engine::cli;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = cli::parse_args();
    if let Err(e) = cli::run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
