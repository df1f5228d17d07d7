//! L1 data fee oracles of OP Stack style rollups.

use alloy::{
    primitives::{Address, ChainId, address},
    sol,
};

/// Address of the OP Stack GasPriceOracle predeploy.
pub const GAS_PRICE_ORACLE_CONTRACT: Address =
    address!("0x420000000000000000000000000000000000000F");

/// Address of the Scroll L1GasPriceOracle predeploy.
pub const SCROLL_GAS_PRICE_ORACLE_CONTRACT: Address =
    address!("0x5300000000000000000000000000000000000002");

/// Scroll mainnet.
pub const SCROLL_CHAIN_ID: ChainId = 534352;

/// Scalar precision of the OP Stack oracle.
pub const OP_SCALAR_DIVISOR: u64 = 1_000_000;

/// Scalar precision of the Scroll oracle.
pub const SCROLL_SCALAR_DIVISOR: u64 = 1_000_000_000;

sol! {
    #[sol(rpc)]
    contract GasPriceOracle {
        /// The latest known L1 base fee.
        function l1BaseFee() external view returns (uint256);

        /// The dynamic overhead scalar.
        function scalar() external view returns (uint256);

        /// L1 gas used by an RLP encoded transaction, without the signature.
        function getL1GasUsed(bytes memory _data) external view returns (uint256);
    }
}

/// Oracle address and scalar divisor for a data fee chain.
pub fn oracle_for_chain(chain_id: ChainId) -> (Address, u64) {
    if chain_id == SCROLL_CHAIN_ID {
        (SCROLL_GAS_PRICE_ORACLE_CONTRACT, SCROLL_SCALAR_DIVISOR)
    } else {
        (GAS_PRICE_ORACLE_CONTRACT, OP_SCALAR_DIVISOR)
    }
}
