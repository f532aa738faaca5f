//! Core data types for the SEDDIT transaction engine
//!
//! This module contains the fundamental types used throughout the system:
//!
//! - [`action`] - Social action types and their payloads
//! - [`transaction`] - Transaction records, statuses, results, and statistics
//! - [`error`] - The engine error taxonomy

pub mod action;
pub mod error;
pub mod transaction;

pub use action::{ActionPayload, ActionType, MAX_POST_LENGTH};
pub use error::EngineError;
pub use transaction::{
    EngineState, OfflineAction, TransactionRecord, TransactionResult, TransactionStats,
    TransactionStatus,
};
