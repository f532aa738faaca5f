//! Action fees and the fee split
//!
//! A pure lookup component: action type in, fee amount out, plus a linear
//! split of any fee amount between two fixed beneficiary accounts. Fees and
//! fractions are static configuration fixed at engine construction; nothing
//! here reads the database or the network.

use crate::types::{ActionType, EngineError};
use rust_decimal::Decimal;

/// Static fee configuration
///
/// Fractions need not sum to 1; the remainder is the implicit protocol and
/// network cost.
#[derive(Debug, Clone)]
pub struct FeeConfig {
    /// Fee charged for a POST action
    pub post_fee: Decimal,

    /// Fee charged for a LIKE action
    pub like_fee: Decimal,

    /// Fee charged for a RETWEET action
    pub retweet_fee: Decimal,

    /// Fraction of every fee routed to the developer account
    pub developer_fraction: Decimal,

    /// Fraction of every fee routed to the treasury account
    pub treasury_fraction: Decimal,

    /// Recipient identifier for the developer share
    pub developer_account: String,

    /// Recipient identifier for the treasury share
    pub treasury_account: String,
}

impl Default for FeeConfig {
    fn default() -> Self {
        FeeConfig {
            post_fee: Decimal::new(1, 3),
            like_fee: Decimal::new(5, 4),
            retweet_fee: Decimal::new(5, 4),
            developer_fraction: Decimal::new(5, 1),
            treasury_fraction: Decimal::new(3, 1),
            developer_account: "SEDDITDeveLoperFeeAccount1111111111111111111".to_string(),
            treasury_account: "SEDDITTreasuryFeeAccount11111111111111111111".to_string(),
        }
    }
}

/// Division of one fee amount among the fixed beneficiary accounts
#[derive(Debug, Clone, PartialEq)]
pub struct FeeSplit {
    /// The full fee the split was computed from
    pub total: Decimal,

    /// Amount routed to the developer account
    pub developer_share: Decimal,

    /// Amount routed to the treasury account
    pub treasury_share: Decimal,

    /// Recipient identifier for the developer share
    pub developer_account: String,

    /// Recipient identifier for the treasury share
    pub treasury_account: String,
}

/// Fee lookup and split over a fixed [`FeeConfig`]
#[derive(Debug, Clone)]
pub struct FeePolicy {
    config: FeeConfig,
}

impl FeePolicy {
    /// Create a policy over the given configuration
    pub fn new(config: FeeConfig) -> Self {
        FeePolicy { config }
    }

    /// The fee for an action type
    ///
    /// Deterministic: the same action type always maps to the same fee for
    /// the lifetime of the policy.
    pub fn fee_for(&self, action: ActionType) -> Decimal {
        match action {
            ActionType::Post => self.config.post_fee,
            ActionType::Like => self.config.like_fee,
            ActionType::Retweet => self.config.retweet_fee,
        }
    }

    /// The fee for an action type given by name
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownActionType` when the name does not parse
    /// to a known action type.
    pub fn fee_for_name(&self, action: &str) -> Result<Decimal, EngineError> {
        Ok(self.fee_for(action.parse()?))
    }

    /// Split a fee amount between the beneficiary accounts
    ///
    /// Linear in the amount; the shares need not sum to the total.
    pub fn split_fee(&self, amount: Decimal) -> FeeSplit {
        FeeSplit {
            total: amount,
            developer_share: amount * self.config.developer_fraction,
            treasury_share: amount * self.config.treasury_fraction,
            developer_account: self.config.developer_account.clone(),
            treasury_account: self.config.treasury_account.clone(),
        }
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new(FeeConfig::default())
    }
}
