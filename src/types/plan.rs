//! Balances and sourcing plans.

use alloy::primitives::ChainId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A nonzero token balance of the wallet on a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Chain id.
    pub chain_id: ChainId,
    /// Amount in whole tokens.
    pub amount: Decimal,
}

/// A single source of a [`SourcingPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    /// Chain id.
    pub chain_id: ChainId,
    /// Chain display name.
    pub chain_name: String,
    /// Amount drawn from this chain, in whole tokens.
    pub amount_sourced: Decimal,
    /// Fee of drawing from this chain, in whole USD.
    pub fee_amount: Decimal,
}

/// Chains to draw from, ascending by fee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcingPlan(pub Vec<PlanEntry>);

impl SourcingPlan {
    /// Plan entries.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.0
    }

    /// Total amount sourced.
    pub fn total_sourced(&self) -> Decimal {
        self.0.iter().map(|entry| entry.amount_sourced).sum()
    }

    /// Total fee in whole USD.
    pub fn total_fee(&self) -> Decimal {
        self.0.iter().map(|entry| entry.fee_amount).sum()
    }

    /// Whether the plan has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
