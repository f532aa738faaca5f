use crate::types::ActionPayload;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// SEDDIT transaction engine command line
#[derive(Parser, Debug)]
#[command(name = "seddit-engine")]
#[command(about = "Submit, inspect, and replay SEDDIT wallet transactions", long_about = None)]
pub struct CliArgs {
    /// Path to the durable database
    #[arg(
        long = "db",
        value_name = "PATH",
        default_value = "seddit.db",
        help = "SQLite database backing the transaction log and offline queue"
    )]
    pub db: PathBuf,

    /// Simulated wallet balance
    #[arg(
        long = "balance",
        value_name = "AMOUNT",
        default_value = "1.0",
        help = "Balance reported by the in-process wallet"
    )]
    pub balance: Decimal,

    /// Report the wallet as disconnected
    #[arg(long = "disconnected", help = "Run with no wallet connected")]
    pub disconnected: bool,

    /// Report connectivity as offline
    #[arg(
        long = "offline",
        help = "Submissions are queued for replay instead of settled"
    )]
    pub offline: bool,

    /// Simulated settlement delay in milliseconds
    #[arg(
        long = "settlement-delay-ms",
        value_name = "MS",
        default_value_t = 2000,
        help = "Artificial settlement latency (default: 2000)"
    )]
    pub settlement_delay_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Available operations
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a social action as a fee-bearing transaction
    Submit {
        #[command(subcommand)]
        action: SubmitAction,
    },

    /// Print the transaction history
    History {
        /// Filter by status: pending, success, or failed
        #[arg(long, value_name = "STATUS")]
        status: Option<String>,
    },

    /// Print derived statistics over the history
    Stats,

    /// Print the fee and fee split for an action type
    Fee {
        /// Action type name: POST, LIKE, or RETWEET
        action: String,
    },

    /// Replay queued offline actions through the engine
    Drain,

    /// Erase the transaction history
    Clear,
}

/// Social actions accepted by `submit`
#[derive(Subcommand, Debug)]
pub enum SubmitAction {
    /// Publish a post
    Post {
        /// The post text
        content: String,
    },

    /// Like a post
    Like {
        /// Identifier of the target post
        target_post: String,
    },

    /// Retweet a post
    Retweet {
        /// Identifier of the target post
        target_post: String,
    },
}

impl SubmitAction {
    /// Convert the parsed action into an engine payload
    pub fn into_payload(self) -> ActionPayload {
        match self {
            SubmitAction::Post { content } => ActionPayload::Post { content },
            SubmitAction::Like { target_post } => ActionPayload::Like { target_post },
            SubmitAction::Retweet { target_post } => ActionPayload::Retweet { target_post },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let parsed = CliArgs::try_parse_from(["seddit-engine", "stats"]).unwrap();
        assert_eq!(parsed.db, PathBuf::from("seddit.db"));
        assert_eq!(parsed.balance, Decimal::ONE);
        assert!(!parsed.disconnected);
        assert!(!parsed.offline);
        assert_eq!(parsed.settlement_delay_ms, 2000);
        assert!(matches!(parsed.command, Command::Stats));
    }

    #[rstest]
    #[case::post(&["seddit-engine", "submit", "post", "hello"])]
    #[case::like(&["seddit-engine", "submit", "like", "post-42"])]
    #[case::retweet(&["seddit-engine", "submit", "retweet", "post-42"])]
    fn test_submit_parsing(#[case] args: &[&str]) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert!(matches!(parsed.command, Command::Submit { .. }));
    }

    #[test]
    fn test_submit_payload_conversion() {
        let parsed = CliArgs::try_parse_from(["seddit-engine", "submit", "post", "hello"]).unwrap();
        let Command::Submit { action } = parsed.command else {
            panic!("expected submit");
        };
        assert_eq!(
            action.into_payload(),
            ActionPayload::Post {
                content: "hello".into()
            }
        );
    }

    #[test]
    fn test_flags_and_options() {
        let parsed = CliArgs::try_parse_from([
            "seddit-engine",
            "--db",
            "/tmp/x.db",
            "--balance",
            "0.25",
            "--offline",
            "--disconnected",
            "--settlement-delay-ms",
            "0",
            "drain",
        ])
        .unwrap();
        assert_eq!(parsed.db, PathBuf::from("/tmp/x.db"));
        assert_eq!(parsed.balance, Decimal::new(25, 2));
        assert!(parsed.offline);
        assert!(parsed.disconnected);
        assert_eq!(parsed.settlement_delay_ms, 0);
    }

    #[rstest]
    #[case::missing_command(&["seddit-engine"])]
    #[case::bad_balance(&["seddit-engine", "--balance", "lots", "stats"])]
    #[case::submit_without_action(&["seddit-engine", "submit"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
