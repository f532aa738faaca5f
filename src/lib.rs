//! SEDDIT Transaction Engine Library
//! # Overview
//!
//! This library implements the transaction lifecycle and offline-sync
//! subsystem of the SEDDIT social-feed client: wallet-gated social actions
//! (post, like, retweet) become fee-bearing pseudo-blockchain transactions
//! that are settled against a simulated backend, persisted to a durable
//! log, and - when connectivity is unavailable - queued durably and
//! replayed later.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (actions, records, results, errors)
//! - [`core`] - Business logic components:
//!   - [`core::fee_policy`] - Action fees and the fee split
//!   - [`core::engine`] - Transaction lifecycle orchestration
//!   - [`core::sync_coordinator`] - Offline action replay
//! - [`storage`] - SQLite-backed transaction log and offline queue
//! - [`settlement`] - Settlement backend and connectivity boundaries
//! - [`wallet`] - Wallet provider boundary
//! - [`cli`] - Command-line interface
//!
//! # Transaction Lifecycle
//!
//! A submission moves through `IDLE -> VALIDATING -> SUBMITTING ->
//! {SUCCESS, FAILED} -> IDLE`:
//!
//! - Preconditions (wallet connected, valid payload, no transaction in
//!   flight) fail synchronously and persist nothing
//! - Settlement failures persist exactly one FAILED record
//! - Successful settlement persists exactly one SUCCESS record carrying an
//!   opaque signature
//! - Offline submissions are durably queued and later drained through the
//!   same submission path by the [`core::SyncCoordinator`]
//!
//! Subscribers registered via [`core::TransactionEngine::subscribe`]
//! observe `on_start` synchronously before any asynchronous work, then
//! `on_success`/`on_error` followed by `on_complete`.

// Module declarations
pub mod cli;
pub mod core;
pub mod settlement;
pub mod storage;
pub mod types;
pub mod wallet;

pub use crate::core::{
    DrainReport, EngineConfig, FeeConfig, FeePolicy, FeeSplit, SyncCoordinator,
    TransactionCallbacks, TransactionEngine,
};
pub use settlement::{
    AlwaysOnline, ConnectivityProbe, MockSignatures, SettlementBackend, SignatureGenerator,
    SimulatedSettlement, ToggleProbe,
};
pub use storage::{Database, OfflineQueue, TransactionStore};
pub use types::{
    ActionPayload, ActionType, EngineError, EngineState, OfflineAction, TransactionRecord,
    TransactionResult, TransactionStats, TransactionStatus,
};
pub use wallet::{StaticWallet, WalletProvider};
