//! Wallet and forwarder contract bindings.

use alloy::sol;

sol! {
    /// A single call executed by the wallet.
    #[derive(Debug, PartialEq, Eq)]
    struct CastAction {
        address target;
        bytes data;
        uint256 value;
        uint256 operation;
    }

    /// Parameters of a wallet cast.
    #[derive(Debug, PartialEq, Eq)]
    struct CastParams {
        CastAction[] actions;
        uint256 id;
        int256 avoNonce;
        bytes32 salt;
        address source;
        bytes metadata;
    }

    /// Forwarding bounds of a wallet cast.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct CastForwardParams {
        uint256 gas;
        uint256 gasPrice;
        uint256 validAfter;
        uint256 validUntil;
        uint256 value;
    }

    /// A signature over a cast.
    #[derive(Debug, PartialEq, Eq)]
    struct SignatureParams {
        bytes signature;
        address signer;
    }

    #[sol(rpc)]
    #[derive(Debug)]
    interface IAvoForwarder {
        function computeAvocado(address owner_, uint32 index_) external view returns (address computedAddress_);

        function simulateV1(
            address from_,
            uint32 index_,
            CastParams calldata params_,
            CastForwardParams calldata forwardParams_,
            SignatureParams[] calldata signaturesParams_
        )
            external
            payable
            returns (
                uint256 castGasUsed_,
                uint256 deploymentGasUsed_,
                bool isDeployed_,
                bool success_,
                string memory revertReason_
            );

        function executeV1(
            address from_,
            uint32 index_,
            CastParams calldata params_,
            CastForwardParams calldata forwardParams_,
            SignatureParams[] calldata signaturesParams_
        ) external payable;
    }

    #[sol(rpc)]
    #[derive(Debug)]
    interface IAvocadoWallet {
        function requiredSigners() external view returns (uint8);
        function avoNonce() external view returns (uint256);
    }
}
