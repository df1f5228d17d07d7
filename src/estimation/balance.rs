use crate::{
    chains::Chain,
    error::EstimationError,
    pricing::PricingError,
    types::{Balance, TokenSymbol},
};
use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use tracing::{instrument, trace};

/// Reads wallet token balances.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceProvider;

impl BalanceProvider {
    /// The balance of `token` held by `wallet` on `chain` in whole tokens.
    ///
    /// A zero balance is `None`.
    #[instrument(skip(self, chain), fields(chain_id = chain.id()))]
    pub async fn balance(
        &self,
        chain: &Chain,
        token: TokenSymbol,
        wallet: Address,
    ) -> Result<Option<Balance>, EstimationError> {
        let profile = chain
            .profile
            .token(token)
            .ok_or(EstimationError::UnsupportedToken { chain_id: chain.id(), token })?;

        let raw = chain.client.token_balance(profile.address, wallet).await?;
        trace!(%raw, "Token balance");
        if raw.is_zero() {
            return Ok(None);
        }

        Ok(Some(Balance { chain_id: chain.id(), amount: to_decimal(raw, profile.decimals)? }))
    }
}

/// Converts base units into whole tokens.
pub(crate) fn to_decimal(value: U256, decimals: u8) -> Result<Decimal, PricingError> {
    let mantissa = i128::try_from(value).map_err(|_| PricingError::Overflow)?;
    Decimal::try_from_i128_with_scale(mantissa, decimals as u32)
        .map(|amount| amount.normalize())
        .map_err(|_| PricingError::Overflow)
}
