//! Business logic components
//!
//! - [`fee_policy`] - Action fees and the fee split
//! - [`engine`] - Transaction lifecycle orchestration
//! - [`sync_coordinator`] - Offline action replay

pub mod engine;
pub mod fee_policy;
pub mod sync_coordinator;

pub use engine::{EngineConfig, TransactionCallbacks, TransactionEngine};
pub use fee_policy::{FeeConfig, FeePolicy, FeeSplit};
pub use sync_coordinator::{DrainReport, SyncCoordinator};
