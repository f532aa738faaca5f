//! Durable persistence for the transaction log and offline queue
//!
//! SQLite-backed storage shared by the interactive submission path and the
//! sync coordinator:
//!
//! - [`database`] - Connection management and schema
//! - [`transaction_store`] - Append-only transaction history
//! - [`offline_queue`] - Durable queue of actions awaiting replay

pub mod database;
pub mod offline_queue;
pub mod transaction_store;

pub use database::Database;
pub use offline_queue::{OfflineQueue, DEFAULT_QUEUE_CAPACITY};
pub use transaction_store::TransactionStore;
