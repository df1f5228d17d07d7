//! Gas limit composition of a wallet cast.

use crate::{
    config::GasLimitConfig,
    constants::{
        CALL_DATA_ENVELOPE_GAS, EVENT_EMISSION_BASE_GAS, EVENT_EMISSION_GAS_PER_METADATA_BYTE,
        EVENT_EMISSION_GAS_PER_SIGNER, INTRINSIC_GAS, NON_SEQUENTIAL_NONCE_GAS,
        NON_ZERO_BYTE_GAS, SAFE_BUFFER_BASE_GAS, SAFE_BUFFER_GAS_PER_SIGNER, SEQUENTIAL_NONCE_GAS,
        SIGNATURE_VERIFICATION_BASE_GAS, SIGNATURE_VERIFICATION_GAS_PER_SIGNER,
        UNRELIABLE_ESTIMATION_SAFE_BUFFER_GAS, ZERO_BYTE_GAS,
    },
    types::{Nonce, PopulatedTransaction},
};
use alloy::{
    primitives::{Bytes, U256},
    rlp::{Encodable, Header},
};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

/// Independently reasoned parts of a cast's gas limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasBreakdown {
    /// Base cost of any transaction.
    pub intrinsic: u64,
    /// Signature and nonce verification.
    pub signature_verification: u64,
    /// Cast events.
    pub event_emission: u64,
    /// Buffer for estimation error.
    pub safe_buffer: u64,
    /// Calldata of the forwarder transaction.
    pub call_data: u64,
    /// Wallet deployment, zero if deployed.
    pub deployment: u64,
    /// Execution of the actions.
    pub cast: u64,
    /// L1 gas component charged as L2 gas.
    pub l1_surcharge: u64,
}

impl GasBreakdown {
    /// Sum of all parts.
    pub fn total(&self) -> u64 {
        [
            self.intrinsic,
            self.signature_verification,
            self.event_emission,
            self.safe_buffer,
            self.call_data,
            self.deployment,
            self.cast,
            self.l1_surcharge,
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add)
    }
}

/// Gas estimator for wallet casts.
#[derive(Debug)]
pub struct GasEstimator;

impl GasEstimator {
    /// Gas to verify `required_signers` signatures and the nonce.
    ///
    /// Non-sequential nonces are materially more expensive to verify.
    pub fn signature_verification_gas(required_signers: u8, nonce: &Nonce) -> u64 {
        let nonce_gas =
            if nonce.is_sequential() { SEQUENTIAL_NONCE_GAS } else { NON_SEQUENTIAL_NONCE_GAS };
        SIGNATURE_VERIFICATION_BASE_GAS
            + SIGNATURE_VERIFICATION_GAS_PER_SIGNER * required_signers as u64
            + nonce_gas
    }

    /// Gas of the events emitted by a cast.
    pub fn event_emission_gas(required_signers: u8, metadata_len: usize) -> u64 {
        EVENT_EMISSION_BASE_GAS
            + EVENT_EMISSION_GAS_PER_SIGNER * required_signers as u64
            + EVENT_EMISSION_GAS_PER_METADATA_BYTE * metadata_len as u64
    }

    /// Buffer for estimation error.
    pub fn safe_buffer_gas(unreliable_estimation: bool, required_signers: u8) -> u64 {
        if unreliable_estimation {
            UNRELIABLE_ESTIMATION_SAFE_BUFFER_GAS
        } else {
            SAFE_BUFFER_BASE_GAS + SAFE_BUFFER_GAS_PER_SIGNER * required_signers as u64
        }
    }

    /// RLP list of the `data`, `from` and `to` of a transaction.
    pub fn rlp_encode(tx: &PopulatedTransaction) -> Bytes {
        let payload_length = tx.data.length() + tx.from.length() + tx.to.length();
        let mut out = Vec::with_capacity(payload_length + 3);
        Header { list: true, payload_length }.encode(&mut out);
        tx.data.encode(&mut out);
        tx.from.encode(&mut out);
        tx.to.encode(&mut out);
        out.into()
    }

    /// Calldata gas of a transaction.
    ///
    /// Zero bytes of the RLP encoding cost 4 gas, other bytes 16, plus a flat envelope overhead.
    pub fn call_data_gas(tx: &PopulatedTransaction) -> u64 {
        let encoded = Self::rlp_encode(tx);
        let zero_bytes = encoded.iter().filter(|byte| **byte == 0).count() as u64;
        let non_zero_bytes = encoded.len() as u64 - zero_bytes;
        zero_bytes * ZERO_BYTE_GAS + non_zero_bytes * NON_ZERO_BYTE_GAS + CALL_DATA_ENVELOPE_GAS
    }

    /// Assembles the breakdown of a cast.
    #[allow(clippy::too_many_arguments)]
    pub fn breakdown(
        required_signers: u8,
        nonce: &Nonce,
        metadata_len: usize,
        unreliable_estimation: bool,
        populated: &PopulatedTransaction,
        deployment_gas: U256,
        cast_gas: U256,
        l1_surcharge_gas: u64,
    ) -> GasBreakdown {
        GasBreakdown {
            intrinsic: INTRINSIC_GAS,
            signature_verification: Self::signature_verification_gas(required_signers, nonce),
            event_emission: Self::event_emission_gas(required_signers, metadata_len),
            safe_buffer: Self::safe_buffer_gas(unreliable_estimation, required_signers),
            call_data: Self::call_data_gas(populated),
            deployment: deployment_gas.saturating_to(),
            cast: cast_gas.saturating_to(),
            l1_surcharge: l1_surcharge_gas,
        }
    }

    /// The gas limit of a cast.
    ///
    /// Flashloan batches underestimate simulated gas and get a multiplier. Large transactions get
    /// a further fractional buffer unless the chain's L1 surcharge already accounts for it.
    pub fn gas_limit(
        breakdown: &GasBreakdown,
        action_id: U256,
        unreliable_estimation: bool,
        config: &GasLimitConfig,
    ) -> u64 {
        let mut gas_limit = breakdown.total();

        if action_id == U256::from(config.flashloan_action_id) {
            gas_limit = round_gas(Decimal::from(gas_limit) * config.flashloan_multiplier);
        }

        if gas_limit >= config.large_transaction_threshold
            && !unreliable_estimation
            && config.large_transaction_buffer_denominator > 0
        {
            let buffer = Decimal::from(gas_limit)
                / Decimal::from(config.large_transaction_buffer_denominator)
                * Decimal::from(config.large_transaction_buffer_numerator);
            gas_limit = round_gas(Decimal::from(gas_limit) + buffer);
        }

        gas_limit
    }
}

/// Rounds half away from zero, saturating at [`u64::MAX`].
fn round_gas(gas: Decimal) -> u64 {
    gas.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}
