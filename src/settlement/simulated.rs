//! Simulated settlement backend
//!
//! Settles transactions after a bounded artificial delay, checking the fee
//! against the wallet's known balance and producing a mock signature. No
//! real network or ledger is involved.

use crate::settlement::SettlementBackend;
use crate::types::{EngineError, TransactionRecord};
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use std::time::Duration;

/// Length of generated mock signatures, matching a base58-encoded
/// transaction signature's typical width.
const SIGNATURE_LENGTH: usize = 88;

/// Strategy for generating settlement signatures
///
/// Isolated behind its own trait so tests can substitute deterministic
/// signatures for the random default.
pub trait SignatureGenerator: Send + Sync {
    /// Produce a fresh opaque signature
    fn generate(&self) -> String;
}

/// Random 88-character alphanumeric signatures
pub struct MockSignatures;

impl SignatureGenerator for MockSignatures {
    fn generate(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SIGNATURE_LENGTH)
            .map(char::from)
            .collect()
    }
}

/// Settlement backend that simulates network latency and balance checks
pub struct SimulatedSettlement {
    delay: Duration,
    signatures: Box<dyn SignatureGenerator>,
}

impl SimulatedSettlement {
    /// Create a backend with the default 2-second settlement delay
    pub fn new() -> Self {
        Self::with_delay(Duration::from_secs(2))
    }

    /// Create a backend with an explicit settlement delay
    pub fn with_delay(delay: Duration) -> Self {
        SimulatedSettlement {
            delay,
            signatures: Box::new(MockSignatures),
        }
    }

    /// Replace the signature generation strategy
    pub fn with_signatures(mut self, signatures: Box<dyn SignatureGenerator>) -> Self {
        self.signatures = signatures;
        self
    }
}

impl Default for SimulatedSettlement {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettlementBackend for SimulatedSettlement {
    async fn settle(
        &self,
        draft: &TransactionRecord,
        balance: Decimal,
    ) -> Result<String, EngineError> {
        tokio::time::sleep(self.delay).await;

        // Exact decimal comparison; no float rounding involved
        if draft.fee > balance {
            return Err(EngineError::insufficient_balance(draft.fee, balance));
        }

        Ok(self.signatures.generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionPayload;

    fn draft(fee: Decimal) -> TransactionRecord {
        TransactionRecord::draft(
            ActionPayload::Post {
                content: "hi".into(),
            },
            fee,
        )
    }

    #[test]
    fn test_mock_signatures_shape() {
        let sig = MockSignatures.generate();
        assert_eq!(sig.len(), SIGNATURE_LENGTH);
        assert!(sig.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_mock_signatures_are_distinct() {
        assert_ne!(MockSignatures.generate(), MockSignatures.generate());
    }

    #[tokio::test]
    async fn test_settle_with_sufficient_balance() {
        let backend = SimulatedSettlement::with_delay(Duration::ZERO);
        let sig = backend
            .settle(&draft(Decimal::new(1, 3)), Decimal::ONE)
            .await
            .unwrap();
        assert!(!sig.is_empty());
    }

    #[tokio::test]
    async fn test_settle_with_insufficient_balance() {
        let backend = SimulatedSettlement::with_delay(Duration::ZERO);
        let err = backend
            .settle(&draft(Decimal::new(2, 3)), Decimal::new(1, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientBalance { .. }));
    }

    #[tokio::test]
    async fn test_settle_with_exact_balance_succeeds() {
        let backend = SimulatedSettlement::with_delay(Duration::ZERO);
        let result = backend
            .settle(&draft(Decimal::new(1, 3)), Decimal::new(1, 3))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_pluggable_signatures() {
        struct Fixed;
        impl SignatureGenerator for Fixed {
            fn generate(&self) -> String {
                "fixed-sig".into()
            }
        }

        let backend =
            SimulatedSettlement::with_delay(Duration::ZERO).with_signatures(Box::new(Fixed));
        let sig = backend
            .settle(&draft(Decimal::ZERO), Decimal::ZERO)
            .await
            .unwrap();
        assert_eq!(sig, "fixed-sig");
    }
}
