// CLI module
// Command-line interface, argument parsing, and command dispatch

mod args;

pub use args::{CliArgs, Command, SubmitAction};

use crate::core::{SyncCoordinator, TransactionEngine};
use crate::settlement::{SimulatedSettlement, ToggleProbe};
use crate::storage::Database;
use crate::types::{EngineError, TransactionResult, TransactionStatus};
use crate::wallet::StaticWallet;
use clap::Parser;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing required arguments, or the
/// --help flag), clap displays an error message or help text and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Execute the parsed command against a freshly built engine
///
/// # Errors
///
/// Returns any engine or storage error raised while executing the command;
/// the caller is responsible for reporting it and choosing an exit code.
pub async fn run(args: CliArgs) -> Result<(), EngineError> {
    let db = Database::open(&args.db)?;
    let wallet = if args.disconnected {
        Arc::new(StaticWallet::disconnected())
    } else {
        Arc::new(StaticWallet::new("SEDDITCLiWa11et", args.balance))
    };
    let settlement = Arc::new(SimulatedSettlement::with_delay(Duration::from_millis(
        args.settlement_delay_ms,
    )));
    let probe = ToggleProbe::new(!args.offline);
    let engine = Arc::new(TransactionEngine::new(db, wallet, settlement, Arc::new(probe)));

    match args.command {
        Command::Submit { action } => {
            let result = engine.submit(action.into_payload()).await?;
            match result {
                TransactionResult::Settled(record) => {
                    println!(
                        "settled: {} ({}) fee {} signature {}",
                        record.id,
                        record.action_type(),
                        record.fee,
                        record.signature.unwrap_or_default()
                    );
                }
                TransactionResult::Failed(record) => {
                    println!(
                        "failed: {} ({}) {}",
                        record.id,
                        record.action_type(),
                        record.error.unwrap_or_default()
                    );
                }
                TransactionResult::Queued(action) => {
                    println!("offline: action queued for replay (queue id {})", action.id);
                }
            }
        }
        Command::History { status } => {
            let records = match status {
                Some(s) => engine.transactions_by_status(TransactionStatus::from_str(&s)?)?,
                None => engine.transaction_history()?,
            };
            for record in records {
                println!(
                    "{}  {}  {}  fee {}  {}",
                    record.created_at.to_rfc3339(),
                    record.id,
                    record.action_type(),
                    record.fee,
                    record.status,
                );
            }
        }
        Command::Stats => {
            let stats = engine.transaction_stats()?;
            println!("total:        {}", stats.total);
            println!("success:      {}", stats.success_count);
            println!("failed:       {}", stats.failed_count);
            println!("pending:      {}", stats.pending_count);
            println!("fees settled: {}", stats.total_fees_successful);
            println!("success rate: {}%", stats.success_rate_percent);
        }
        Command::Fee { action } => {
            let action = action.parse()?;
            let fee = engine.calculate_fee(action);
            let split = engine.fee_split(fee);
            println!("{} fee: {}", action, fee);
            println!("  developer: {} -> {}", split.developer_share, split.developer_account);
            println!("  treasury:  {} -> {}", split.treasury_share, split.treasury_account);
        }
        Command::Drain => {
            let report = SyncCoordinator::new(engine).drain().await?;
            println!(
                "drained: {} attempted, {} settled, {} failed, {} requeued, {} dropped",
                report.attempted, report.settled, report.failed, report.requeued, report.skipped
            );
        }
        Command::Clear => {
            engine.clear_history()?;
            println!("transaction history cleared");
        }
    }

    Ok(())
}
