//! Error types for the SEDDIT transaction engine
//!
//! This module defines all error types that can occur during the transaction
//! lifecycle. Errors are designed to be descriptive and user-friendly.
//!
//! # Error Categories
//!
//! - **Precondition errors**: wallet disconnected, invalid payload, a
//!   transaction already in flight, unrecognized action type. These are
//!   surfaced synchronously to the caller and never produce a persisted
//!   record.
//! - **Settlement errors**: insufficient balance, transport faults, shutdown
//!   aborts. These produce a FAILED record and are surfaced through the
//!   error/complete notifications.
//! - **Storage errors**: database or serialization faults in the durable
//!   transaction log or offline queue.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the transaction engine
///
/// This enum represents all possible errors that can occur during the
/// transaction lifecycle. Each variant includes relevant context to help
/// diagnose and resolve the issue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Wallet is not connected
    ///
    /// Submissions require a connected wallet. This is a precondition
    /// failure - no record is created and engine state is unchanged.
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// Action payload failed validation
    ///
    /// This is a precondition failure - no record is created.
    #[error("Validation failed: {reason}")]
    ValidationError {
        /// Human-readable reason the payload was rejected
        reason: String,
    },

    /// Another transaction is already in flight
    ///
    /// The engine processes at most one transaction at a time. A second
    /// submit while one is pending is rejected synchronously, never queued.
    #[error("A transaction is already in progress")]
    TransactionInProgress,

    /// Wallet balance cannot cover the transaction fee
    ///
    /// This is a settlement-stage failure - a FAILED record is persisted
    /// and the submission is recoverable by retrying with more funds.
    #[error("Insufficient balance: fee {required}, available {available}")]
    InsufficientBalance {
        /// Fee required for the transaction
        required: Decimal,
        /// Balance known to the wallet provider
        available: Decimal,
    },

    /// Unrecognized action type name
    ///
    /// Raised at the string boundary when parsing an action type.
    #[error("Unknown action type '{action}'")]
    UnknownActionType {
        /// The unrecognized action type string
        action: String,
    },

    /// Settlement backend was unreachable or misbehaved
    ///
    /// This is a settlement-stage failure - a FAILED record is persisted.
    #[error("Transport fault: {message}")]
    TransportFault {
        /// Description of the transport failure
        message: String,
    },

    /// An in-flight settlement was abandoned at shutdown
    ///
    /// The engine persists the in-flight draft as FAILED with this reason
    /// rather than leaving dangling PENDING state.
    #[error("Transaction aborted by shutdown")]
    ShutdownAbort,

    /// Offline queue is at capacity
    ///
    /// The queue is bounded to keep the eventual replay workload finite.
    #[error("Offline queue is full (capacity {capacity})")]
    QueueFull {
        /// Configured queue capacity
        capacity: usize,
    },

    /// Durable storage operation failed
    #[error("Storage error: {message}")]
    StorageError {
        /// Description of the storage failure
        message: String,
    },
}

// Conversion from rusqlite errors for the storage layer
impl From<rusqlite::Error> for EngineError {
    fn from(error: rusqlite::Error) -> Self {
        EngineError::StorageError {
            message: error.to_string(),
        }
    }
}

// Payloads are stored as JSON text columns
impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        EngineError::StorageError {
            message: error.to_string(),
        }
    }
}

// Helper constructors for common errors

impl EngineError {
    /// Create a ValidationError
    pub fn validation(reason: impl Into<String>) -> Self {
        EngineError::ValidationError {
            reason: reason.into(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(required: Decimal, available: Decimal) -> Self {
        EngineError::InsufficientBalance {
            required,
            available,
        }
    }

    /// Create an UnknownActionType error
    pub fn unknown_action_type(action: impl Into<String>) -> Self {
        EngineError::UnknownActionType {
            action: action.into(),
        }
    }

    /// Create a TransportFault error
    pub fn transport(message: impl Into<String>) -> Self {
        EngineError::TransportFault {
            message: message.into(),
        }
    }

    /// Create a StorageError
    pub fn storage(message: impl Into<String>) -> Self {
        EngineError::StorageError {
            message: message.into(),
        }
    }

    /// Whether this error is a precondition failure
    ///
    /// Precondition failures are surfaced synchronously and never produce
    /// a persisted record.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EngineError::WalletNotConnected
                | EngineError::ValidationError { .. }
                | EngineError::TransactionInProgress
                | EngineError::UnknownActionType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::wallet_not_connected(EngineError::WalletNotConnected, "Wallet not connected")]
    #[case::validation(
        EngineError::validation("post content cannot be empty"),
        "Validation failed: post content cannot be empty"
    )]
    #[case::in_progress(
        EngineError::TransactionInProgress,
        "A transaction is already in progress"
    )]
    #[case::insufficient_balance(
        EngineError::insufficient_balance(Decimal::new(2, 3), Decimal::new(1, 3)),
        "Insufficient balance: fee 0.002, available 0.001"
    )]
    #[case::unknown_action(
        EngineError::unknown_action_type("UPVOTE"),
        "Unknown action type 'UPVOTE'"
    )]
    #[case::transport(
        EngineError::transport("settlement backend unreachable"),
        "Transport fault: settlement backend unreachable"
    )]
    #[case::shutdown(EngineError::ShutdownAbort, "Transaction aborted by shutdown")]
    #[case::queue_full(
        EngineError::QueueFull { capacity: 100 },
        "Offline queue is full (capacity 100)"
    )]
    #[case::storage(
        EngineError::storage("disk I/O error"),
        "Storage error: disk I/O error"
    )]
    fn test_error_display(#[case] error: EngineError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::wallet(EngineError::WalletNotConnected, true)]
    #[case::validation(EngineError::validation("x"), true)]
    #[case::in_progress(EngineError::TransactionInProgress, true)]
    #[case::unknown(EngineError::unknown_action_type("x"), true)]
    #[case::balance(
        EngineError::insufficient_balance(Decimal::ONE, Decimal::ZERO),
        false
    )]
    #[case::transport(EngineError::transport("x"), false)]
    #[case::queue_full(EngineError::QueueFull { capacity: 1 }, false)]
    fn test_precondition_classification(#[case] error: EngineError, #[case] expected: bool) {
        assert_eq!(error.is_precondition(), expected);
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: EngineError = json_error.into();
        assert!(matches!(error, EngineError::StorageError { .. }));
    }
}
