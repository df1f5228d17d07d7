//! Route finder constants.

use alloy::primitives::{Address, address};
use std::time::Duration;

/// Intrinsic gas of any transaction.
pub const INTRINSIC_GAS: u64 = 21_000;

/// Fixed part of the signature verification gas.
pub const SIGNATURE_VERIFICATION_BASE_GAS: u64 = 16_500;

/// Signature verification gas per required signer.
pub const SIGNATURE_VERIFICATION_GAS_PER_SIGNER: u64 = 15_000;

/// Nonce handling gas for sequential nonces.
pub const SEQUENTIAL_NONCE_GAS: u64 = 5_000;

/// Nonce handling gas for non-sequential nonces.
pub const NON_SEQUENTIAL_NONCE_GAS: u64 = 32_500;

/// Fixed part of the event emission gas.
pub const EVENT_EMISSION_BASE_GAS: u64 = 15_000;

/// Event emission gas per required signer.
pub const EVENT_EMISSION_GAS_PER_SIGNER: u64 = 400;

/// Event emission gas per metadata byte.
pub const EVENT_EMISSION_GAS_PER_METADATA_BYTE: u64 = 8;

/// Safe buffer on chains whose gas estimation is unreliable.
pub const UNRELIABLE_ESTIMATION_SAFE_BUFFER_GAS: u64 = 100_000;

/// Fixed part of the safe buffer.
pub const SAFE_BUFFER_BASE_GAS: u64 = 12_500;

/// Safe buffer per required signer.
pub const SAFE_BUFFER_GAS_PER_SIGNER: u64 = 5_000;

/// Calldata gas of a zero byte.
pub const ZERO_BYTE_GAS: u64 = 4;

/// Calldata gas of a non-zero byte.
pub const NON_ZERO_BYTE_GAS: u64 = 16;

/// Flat calldata envelope overhead (100 non-zero bytes).
pub const CALL_DATA_ENVELOPE_GAS: u64 = 100 * NON_ZERO_BYTE_GAS;

/// L1 gas allowance for the signature (65 bytes).
pub const L1_SIGNATURE_GAS_ALLOWANCE: u64 = 65 * NON_ZERO_BYTE_GAS;

/// L1 gas allowance for extra transaction params (32 bytes).
pub const L1_EXTRA_PARAMS_GAS_ALLOWANCE: u64 = 32 * NON_ZERO_BYTE_GAS;

/// Divisor of the combined fee multiplier when reported in basis points.
pub const FEE_MULTIPLIER_BPS_DIVISOR: u64 = 8_000;

/// Address the forwarder simulation is issued from.
pub const SIMULATION_SENDER: Address = address!("0x000000000000000000000000000000000000dEaD");

/// Source address stamped into estimation payloads.
pub const PAYLOAD_SOURCE: Address = address!("0x000000000000000000000000000000000000Cad0");

/// Target of the marker action appended to sourcing transfers.
pub const MARKER_ACTION_TARGET: Address = address!("0x9800020b610194dBa52CF606E8Aa142F9F256166");

/// Calldata of the marker action.
pub const MARKER_ACTION_DATA: [u8; 2] = [0x00, 0x01];

/// Placeholder signer used for mocked signatures.
pub const MOCK_SIGNER: Address = address!("0xffffffffffffffffffffffffffffffffffffffff");

/// Byte length of a mocked signature.
pub const MOCK_SIGNATURE_LEN: usize = 65;

/// Native token placeholder address understood by the price API.
pub const NATIVE_TOKEN_ADDRESS: Address = address!("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Default address of the wallet forwarder contract.
pub const DEFAULT_FORWARDER: Address = address!("0x46978CD477A496028A18c02F07ab7F35EDBa5A54");

/// Default timeout of a single RPC request.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout of the whole per-chain lookup.
pub const DEFAULT_CHAIN_TIMEOUT: Duration = Duration::from_secs(20);

/// Default TTL of derived wallet addresses.
pub const DEFAULT_WALLET_ADDRESS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default TTL of required signer counts.
pub const DEFAULT_REQUIRED_SIGNERS_TTL: Duration = Duration::from_secs(60 * 60);

/// Default TTL of wallet nonces.
pub const DEFAULT_NONCE_TTL: Duration = Duration::from_secs(30);
