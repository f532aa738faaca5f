//! Wallet provider boundary
//!
//! The engine treats the wallet as a read-only collaborator: it checks
//! connection state and balance but never initiates connect/disconnect.
//! Connect/disconnect UI lives outside this crate.

use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Read-only view of the user's wallet
///
/// Implementations are expected to answer synchronously from cached state;
/// the engine never awaits the wallet.
pub trait WalletProvider: Send + Sync {
    /// Whether a wallet is currently connected
    fn is_connected(&self) -> bool;

    /// The connected wallet's public address, if any
    fn public_address(&self) -> Option<String>;

    /// The balance currently known for the connected wallet
    fn balance(&self) -> Decimal;
}

/// In-process wallet with a fixed address and adjustable balance
///
/// Backs the CLI and tests; a production build would wire a real wallet
/// adapter behind [`WalletProvider`] instead.
pub struct StaticWallet {
    address: String,
    connected: AtomicBool,
    balance: Mutex<Decimal>,
}

impl StaticWallet {
    /// Create a connected wallet with the given address and balance
    pub fn new(address: impl Into<String>, balance: Decimal) -> Self {
        StaticWallet {
            address: address.into(),
            connected: AtomicBool::new(true),
            balance: Mutex::new(balance),
        }
    }

    /// Create a wallet that reports as disconnected
    pub fn disconnected() -> Self {
        StaticWallet {
            address: String::new(),
            connected: AtomicBool::new(false),
            balance: Mutex::new(Decimal::ZERO),
        }
    }

    /// Replace the known balance
    pub fn set_balance(&self, balance: Decimal) {
        *self
            .balance
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = balance;
    }
}

impl WalletProvider for StaticWallet {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn public_address(&self) -> Option<String> {
        if self.is_connected() {
            Some(self.address.clone())
        } else {
            None
        }
    }

    fn balance(&self) -> Decimal {
        *self
            .balance
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connected_wallet_reports_address_and_balance() {
        let wallet = StaticWallet::new("FeeWa11et", Decimal::ONE);
        assert!(wallet.is_connected());
        assert_eq!(wallet.public_address().as_deref(), Some("FeeWa11et"));
        assert_eq!(wallet.balance(), Decimal::ONE);
    }

    #[test]
    fn test_disconnected_wallet_has_no_address() {
        let wallet = StaticWallet::disconnected();
        assert!(!wallet.is_connected());
        assert!(wallet.public_address().is_none());
    }

    #[test]
    fn test_set_balance() {
        let wallet = StaticWallet::new("addr", Decimal::ZERO);
        wallet.set_balance(Decimal::new(25, 1));
        assert_eq!(wallet.balance(), Decimal::new(25, 1));
    }
}
