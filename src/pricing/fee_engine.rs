use super::{GasPricing, PricingError};
use crate::{config::FeeConfig, constants::FEE_MULTIPLIER_BPS_DIVISOR};
use alloy::primitives::U256;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};

/// Everything needed to turn a gas limit into a fiat fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeInputs {
    /// Gas limit of the cast.
    pub gas_limit: u64,
    /// Gas pricing of the chain.
    pub pricing: GasPricing,
    /// L1 data fee in wei, zero on chains without one.
    pub l1_data_fee: U256,
    /// USD price of the chain's native token.
    pub native_price: f64,
    /// Base gas limit multiplier of the chain.
    pub gas_limit_multiplier: Decimal,
}

/// A fee in USD, fixed-point with 18 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedFee {
    /// The fee.
    pub fee_amount: U256,
    /// The combined multiplier in basis points.
    pub fee_multiplier_bps: u64,
}

/// Converts native gas costs into USD fees.
#[derive(Debug)]
pub struct FeeEngine;

impl FeeEngine {
    /// Computes the fee of a cast.
    ///
    /// `fee = floor((gasLimit * basePrice + l1DataFee) * price * multiplier / 10^4 * margin)`
    /// clamped to the configured minimum, where `multiplier` is the gas limit multiplier in
    /// basis-hundreds times the price multiplier.
    pub fn compute(inputs: &FeeInputs, config: &FeeConfig) -> Result<ComputedFee, PricingError> {
        if !inputs.native_price.is_finite() || inputs.native_price <= 0.0 {
            return Err(PricingError::InvalidPrice(inputs.native_price));
        }
        let price = Decimal::from_f64(inputs.native_price)
            .ok_or(PricingError::InvalidPrice(inputs.native_price))?;

        let gas_limit_multiplier = (inputs.gas_limit_multiplier * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let multiplier = gas_limit_multiplier
            .checked_mul(inputs.pricing.price_multiplier)
            .ok_or(PricingError::Overflow)?;

        let l1_data_fee =
            Decimal::from_u128(inputs.l1_data_fee.try_into().map_err(|_| PricingError::Overflow)?)
                .ok_or(PricingError::Overflow)?;
        let raw_fee = Decimal::from(inputs.gas_limit)
            .checked_mul(inputs.pricing.base_gas_price)
            .and_then(|fee| fee.checked_add(l1_data_fee))
            .ok_or(PricingError::Overflow)?;

        let fee = raw_fee
            .checked_mul(price)
            .and_then(|fee| fee.checked_mul(multiplier))
            .and_then(|fee| fee.checked_div(Decimal::from(10_000)))
            .and_then(|fee| fee.checked_mul(config.safety_margin))
            .ok_or(PricingError::Overflow)?
            .floor()
            .to_u128()
            .ok_or(PricingError::Overflow)?;

        let fee_multiplier_bps = (multiplier / Decimal::from(FEE_MULTIPLIER_BPS_DIVISOR)
            * Decimal::from(10_000))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::Overflow)?;

        Ok(ComputedFee {
            fee_amount: U256::from(fee).max(config.min_fee),
            fee_multiplier_bps,
        })
    }
}
