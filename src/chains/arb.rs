//! Arbitrum L1 gas component.

use alloy::{
    primitives::{Address, address},
    sol,
};

/// Address of the NodeInterface precompile.
pub const NODE_INTERFACE_CONTRACT: Address = address!("0x00000000000000000000000000000000000000C8");

sol! {
    #[sol(rpc)]
    contract NodeInterface {
        /// Estimates the L1 gas a transaction pays for posting its calldata. Only callable with
        /// `eth_call`.
        function gasEstimateL1Component(
            address to,
            bool contractCreation,
            bytes calldata data
        )
            external
            payable
            returns (uint64 gasEstimateForL1, uint256 baseFee, uint256 l1BaseFeeEstimate);
    }
}
