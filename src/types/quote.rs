//! Fee quote types.

use alloy::primitives::{ChainId, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimals of [`FeeQuote::fee_amount`].
pub const FEE_DECIMALS: u32 = 18;

/// A point-in-time fee quote for casting on a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuote {
    /// Chain id.
    pub chain_id: ChainId,
    /// Chain display name.
    pub chain_name: String,
    /// Fee in USD, fixed-point with [`FEE_DECIMALS`] decimals.
    #[serde(with = "alloy::serde::displayfromstr")]
    pub fee_amount: U256,
    /// Combined gas multiplier reported in basis points.
    pub fee_multiplier_bps: u64,
}

impl FeeQuote {
    /// The fee in whole USD.
    pub fn fee_in_usd(&self) -> Decimal {
        let mantissa = i128::try_from(self.fee_amount).unwrap_or(i128::MAX);
        Decimal::try_from_i128_with_scale(mantissa, FEE_DECIMALS)
            .unwrap_or(Decimal::MAX)
            .normalize()
    }
}
