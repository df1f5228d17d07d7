use crate::constants::{L1_EXTRA_PARAMS_GAS_ALLOWANCE, L1_SIGNATURE_GAS_ALLOWANCE};
use alloy::primitives::U256;

/// Gas price oracle readings for the L1 data fee of a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L1FeeInputs {
    /// L1 base fee.
    pub l1_base_fee: U256,
    /// Fee scalar.
    pub scalar: U256,
    /// L1 gas used by the unsigned transaction.
    pub l1_gas_used: U256,
}

/// The L1 data fee in wei.
///
/// The oracle sizes the unsigned transaction, so the signature and extra parameter allowances
/// are added before scaling: `(l1GasUsed + 65 * 16 + 32 * 16) * scalar * l1BaseFee / divisor`.
pub fn l1_data_fee(inputs: &L1FeeInputs, scaling_divisor: u64) -> U256 {
    if scaling_divisor == 0 {
        return U256::ZERO;
    }

    let l1_gas = inputs.l1_gas_used.saturating_add(U256::from(
        L1_SIGNATURE_GAS_ALLOWANCE + L1_EXTRA_PARAMS_GAS_ALLOWANCE,
    ));
    l1_gas.saturating_mul(inputs.scalar).saturating_mul(inputs.l1_base_fee)
        / U256::from(scaling_divisor)
}
