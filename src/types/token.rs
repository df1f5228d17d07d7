//! Token types.

use alloy::primitives::{Address, ChainId};
use serde::{Deserialize, Serialize};

/// Stablecoins that can be sourced across chains.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
pub enum TokenSymbol {
    /// USD Coin.
    USDC,
    /// Tether USD.
    USDT,
}

/// A token deployment on a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenProfile {
    /// Chain the token is deployed on.
    pub chain_id: ChainId,
    /// Token symbol.
    pub symbol: TokenSymbol,
    /// Token contract.
    pub address: Address,
    /// Token decimals.
    pub decimals: u8,
}
