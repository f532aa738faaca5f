//! Settlement backend boundary
//!
//! Settlement finalizes a draft transaction against a backend, yielding an
//! opaque signature or a fault. This crate ships a simulated backend; a
//! production system would put a real network client behind the same trait.
//!
//! Connectivity detection is likewise a boundary: the engine consults a
//! [`ConnectivityProbe`] right before settlement and degrades to queuing
//! the action when the probe reports offline.

pub mod simulated;

use crate::types::{EngineError, TransactionRecord};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use simulated::{MockSignatures, SignatureGenerator, SimulatedSettlement};

/// Backend that settles draft transactions
///
/// The contract is exactly `settle -> {signature | fault}`: given a pending
/// draft and the wallet's currently known balance, resolve to an opaque
/// signature or fail with `InsufficientBalance`/`TransportFault`.
#[async_trait]
pub trait SettlementBackend: Send + Sync {
    /// Settle a pending draft
    ///
    /// # Errors
    ///
    /// - `EngineError::InsufficientBalance` when the fee exceeds the balance
    /// - `EngineError::TransportFault` when the backend is unreachable
    async fn settle(
        &self,
        draft: &TransactionRecord,
        balance: Decimal,
    ) -> Result<String, EngineError>;
}

/// Source of the current connectivity state
///
/// Implementations answer synchronously; the probe is consulted once per
/// submission, after preconditions pass and before settlement begins.
pub trait ConnectivityProbe: Send + Sync {
    /// Whether the settlement backend is currently reachable
    fn is_online(&self) -> bool;
}

/// Probe that always reports online
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Probe backed by a shared flag
///
/// Lets an external connectivity signal (or a test) flip the reported state
/// while the engine holds a reference to the probe.
#[derive(Clone, Default)]
pub struct ToggleProbe {
    online: Arc<AtomicBool>,
}

impl ToggleProbe {
    /// Create a probe with the given initial state
    pub fn new(online: bool) -> Self {
        ToggleProbe {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    /// Update the reported connectivity state
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl ConnectivityProbe for ToggleProbe {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_online() {
        assert!(AlwaysOnline.is_online());
    }

    #[test]
    fn test_toggle_probe_flips_state() {
        let probe = ToggleProbe::new(true);
        assert!(probe.is_online());

        let handle = probe.clone();
        handle.set_online(false);
        assert!(!probe.is_online());
    }
}
