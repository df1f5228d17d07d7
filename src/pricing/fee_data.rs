use super::PricingError;
use rust_decimal::{Decimal, prelude::FromPrimitive};

/// Live fee market data of a chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeData {
    /// Legacy gas price.
    pub gas_price: Option<u128>,
    /// Base fee of the latest block.
    pub last_base_fee_per_gas: Option<u128>,
    /// Suggested priority fee.
    pub max_priority_fee_per_gas: Option<u128>,
}

impl FeeData {
    /// Fee data of a legacy chain.
    pub const fn legacy(gas_price: u128) -> Self {
        Self {
            gas_price: Some(gas_price),
            last_base_fee_per_gas: None,
            max_priority_fee_per_gas: None,
        }
    }

    /// Fee data of an EIP-1559 chain.
    pub const fn eip1559(last_base_fee_per_gas: u128, max_priority_fee_per_gas: u128) -> Self {
        Self {
            gas_price: None,
            last_base_fee_per_gas: Some(last_base_fee_per_gas),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
        }
    }

    /// The max fee per gas, `1.3 * lastBaseFee + priorityFee`, if this is EIP-1559 data.
    pub fn max_fee_per_gas(&self) -> Option<u128> {
        let base_fee = self.last_base_fee_per_gas?;
        let priority_fee = self.max_priority_fee_per_gas?;
        Some((base_fee.saturating_mul(130) / 100).saturating_add(priority_fee))
    }
}

/// The gas price used to compute a fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPricing {
    /// Price multiplier in basis-hundreds, `100` being 1x.
    pub price_multiplier: Decimal,
    /// Gas price with the multiplier taken out, in wei.
    pub base_gas_price: Decimal,
}

impl GasPricing {
    /// Derives the pricing of `fee_data`.
    ///
    /// EIP-1559 data takes precedence. Its multiplier is
    /// `maxFee / (lastBaseFee + priorityFee) * 1.1 * 100`. Legacy data is marked up by the
    /// chain's static `gas_price_multiplier`. In both cases the base price is the marked up
    /// price divided by the multiplier, so base price and multiplier stay consistent.
    pub fn derive(fee_data: &FeeData, gas_price_multiplier: u64) -> Result<Self, PricingError> {
        if let Some(max_fee) = fee_data.max_fee_per_gas() {
            let base_fee = fee_data.last_base_fee_per_gas.unwrap_or_default();
            let priority_fee = fee_data.max_priority_fee_per_gas.unwrap_or_default();
            let reference = decimal(base_fee.saturating_add(priority_fee))?;
            if reference.is_zero() {
                return Err(PricingError::InvalidFeeData("zero base and priority fee"));
            }

            let max_fee = decimal(max_fee)?;
            let price_multiplier = (max_fee / reference * Decimal::new(11, 1))
                .checked_mul(Decimal::ONE_HUNDRED)
                .ok_or(PricingError::Overflow)?;
            let base_gas_price = (max_fee / price_multiplier)
                .checked_mul(Decimal::ONE_HUNDRED)
                .ok_or(PricingError::Overflow)?;

            return Ok(Self { price_multiplier, base_gas_price });
        }

        let gas_price =
            fee_data.gas_price.ok_or(PricingError::InvalidFeeData("missing gas price"))?;
        if gas_price_multiplier == 0 {
            return Err(PricingError::InvalidFeeData("zero gas price multiplier"));
        }

        let marked_up = gas_price
            .checked_mul(gas_price_multiplier as u128)
            .ok_or(PricingError::Overflow)?
            / 100;
        let price_multiplier = Decimal::from(gas_price_multiplier);
        let base_gas_price = (decimal(marked_up)? / price_multiplier)
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(PricingError::Overflow)?;

        Ok(Self { price_multiplier, base_gas_price })
    }
}

fn decimal(value: u128) -> Result<Decimal, PricingError> {
    Decimal::from_u128(value).ok_or(PricingError::Overflow)
}
