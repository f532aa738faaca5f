//! Transaction-related types for the SEDDIT transaction engine
//!
//! This module defines the persisted transaction record, its status machine,
//! the offline action shape, submission results, and derived statistics.

use crate::types::{ActionPayload, ActionType, EngineError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Status of a persisted transaction
///
/// Transitions are monotonic: a record starts `Pending` and moves forward to
/// exactly one of `Success` or `Failed`. There is no regression back to
/// `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Settlement has not completed yet
    Pending,

    /// Settlement succeeded and a signature was recorded
    Success,

    /// Settlement failed and an error message was recorded
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Success => write!(f, "success"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "success" => Ok(TransactionStatus::Success),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(EngineError::storage(format!(
                "unknown transaction status '{}'",
                other
            ))),
        }
    }
}

/// A fee-bearing transaction record
///
/// Created as a `Pending` draft when a submission passes its preconditions,
/// then settled forward to `Success` or `Failed`. The fee is fixed by the fee
/// policy at creation time and never changes afterwards.
///
/// # Invariant
///
/// Exactly one of `signature`/`error` is set once the status leaves
/// `Pending`; never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique identifier, assigned at creation
    pub id: String,

    /// Action-specific payload (also determines the action type)
    pub payload: ActionPayload,

    /// Fee charged for the action, fixed at creation
    pub fee: Decimal,

    /// Current lifecycle status
    pub status: TransactionStatus,

    /// Opaque settlement identifier, present only when status is `Success`
    pub signature: Option<String>,

    /// Failure message, present only when status is `Failed`
    pub error: Option<String>,

    /// Creation timestamp, immutable
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Create a new `Pending` draft for the given payload and fee
    pub fn draft(payload: ActionPayload, fee: Decimal) -> Self {
        TransactionRecord {
            id: Uuid::new_v4().to_string(),
            payload,
            fee,
            status: TransactionStatus::Pending,
            signature: None,
            error: None,
            created_at: Utc::now(),
        }
    }

    /// The action type of this record's payload
    pub fn action_type(&self) -> ActionType {
        self.payload.action_type()
    }

    /// Transition the record to `Success` with a settlement signature
    ///
    /// A no-op if the record has already left `Pending`; terminal states are
    /// never overwritten.
    pub fn mark_success(&mut self, signature: String) {
        if self.status == TransactionStatus::Pending {
            self.status = TransactionStatus::Success;
            self.signature = Some(signature);
            self.error = None;
        }
    }

    /// Transition the record to `Failed` with an error message
    ///
    /// A no-op if the record has already left `Pending`.
    pub fn mark_failed(&mut self, error: String) {
        if self.status == TransactionStatus::Pending {
            self.status = TransactionStatus::Failed;
            self.error = Some(error);
            self.signature = None;
        }
    }
}

/// An action that could not be submitted while disconnected
///
/// Owned by the durable offline queue. The sync coordinator borrows entries
/// for processing and either fully consumes one (submit + remove) or leaves
/// it untouched for a later retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineAction {
    /// Unique identifier auto-assigned by the durable queue
    pub id: i64,

    /// The payload to replay, mirroring the record's action shape
    pub payload: ActionPayload,

    /// When the action was queued
    pub enqueued_at: DateTime<Utc>,
}

/// Outcome of a `submit` call
///
/// Precondition failures surface as `Err(EngineError)` instead; this type
/// covers the three ways a submission that got past its preconditions can
/// resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionResult {
    /// Settlement succeeded; the record carries the signature
    Settled(TransactionRecord),

    /// Settlement failed; the record carries the error message
    Failed(TransactionRecord),

    /// Connectivity was unavailable; the action was durably queued instead
    Queued(OfflineAction),
}

impl TransactionResult {
    /// Whether the submission settled successfully
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionResult::Settled(_))
    }

    /// Whether the submission was queued for later replay
    pub fn is_queued(&self) -> bool {
        matches!(self, TransactionResult::Queued(_))
    }

    /// The persisted record, if settlement was attempted
    pub fn record(&self) -> Option<&TransactionRecord> {
        match self {
            TransactionResult::Settled(record) | TransactionResult::Failed(record) => Some(record),
            TransactionResult::Queued(_) => None,
        }
    }

    /// The settlement signature, if the submission succeeded
    pub fn signature(&self) -> Option<&str> {
        match self {
            TransactionResult::Settled(record) => record.signature.as_deref(),
            _ => None,
        }
    }
}

/// Derived statistics over the transaction history
///
/// Recomputed on demand from the store; never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionStats {
    /// Total number of records
    pub total: usize,

    /// Number of records with status `Success`
    pub success_count: usize,

    /// Number of records with status `Failed`
    pub failed_count: usize,

    /// Number of records with status `Pending`
    pub pending_count: usize,

    /// Sum of fees over successful records
    pub total_fees_successful: Decimal,

    /// Percentage of successful records; 0 when the store is empty
    pub success_rate_percent: Decimal,
}

/// Transient in-memory engine state
///
/// Holds at most one in-flight transaction. Reset to idle after every
/// completed lifecycle, success or failure.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    /// Whether a transaction is currently in flight
    pub pending: bool,

    /// The in-flight draft, if any
    pub current_transaction: Option<TransactionRecord>,

    /// Message of the most recent failure, if any
    pub last_error: Option<String>,
}
