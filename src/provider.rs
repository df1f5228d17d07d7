//! Per-chain RPC client.

use crate::{
    chains::{
        FeeMarket,
        arb::{NODE_INTERFACE_CONTRACT, NodeInterface},
        op::GasPriceOracle,
    },
    constants::{MOCK_SIGNER, SIMULATION_SENDER},
    pricing::{FeeData, L1FeeInputs},
    transport::TimeoutLayer,
    types::{ForwarderCall, IAvoForwarder, IAvocadoWallet, IERC20, PopulatedTransaction},
};
use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, Bytes, ChainId, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::client::ClientBuilder,
    transports::{TransportErrorKind, TransportResult, layers::RetryBackoffLayer},
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};
use tracing::{instrument, trace};
use url::Url;

/// [`RetryBackoffLayer`] used for chain providers.
///
/// Retries rate limited requests up to 10 times with a backoff of 800ms.
const RETRY_LAYER: RetryBackoffLayer = RetryBackoffLayer::new(10, 800, u64::MAX);

/// Outcome of a forwarder `simulateV1` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationOutcome {
    /// Gas used by the cast itself.
    pub cast_gas_used: U256,
    /// Gas used deploying the wallet. Zero if already deployed.
    pub deployment_gas_used: U256,
    /// Whether the wallet was already deployed.
    pub is_deployed: bool,
    /// Whether the cast succeeded.
    pub success: bool,
    /// Revert reason if the cast failed.
    pub revert_reason: String,
}

/// Read-only access to a single chain.
///
/// Implementations must be cheap to share; they are only ever invoked, never mutated.
#[async_trait]
pub trait ChainClient: Debug + Send + Sync {
    /// The chain ID.
    fn chain_id(&self) -> ChainId;

    /// Live fee market data.
    async fn fee_data(&self, market: FeeMarket) -> TransportResult<FeeData>;

    /// Code deployed at `address`.
    async fn code_at(&self, address: Address) -> TransportResult<Bytes>;

    /// Number of signatures `wallet` requires.
    async fn required_signers(&self, wallet: Address) -> TransportResult<u8>;

    /// Next sequential nonce of `wallet`.
    async fn wallet_nonce(&self, wallet: Address) -> TransportResult<U256>;

    /// ERC20 `token` balance of `owner` in base units.
    async fn token_balance(&self, token: Address, owner: Address) -> TransportResult<U256>;

    /// Wallet address of `owner` at `index`.
    async fn compute_wallet_address(&self, owner: Address, index: u32)
    -> TransportResult<Address>;

    /// Simulates a cast through the forwarder.
    async fn simulate(&self, call: &ForwarderCall) -> TransportResult<SimulationOutcome>;

    /// Builds the forwarder transaction of a cast without signing or sending it.
    fn populate(&self, call: &ForwarderCall) -> PopulatedTransaction;

    /// L1 gas component of a transaction on Arbitrum style chains.
    async fn l1_gas_component(&self, to: Address, data: Bytes) -> TransportResult<u64>;

    /// Inputs of the L1 data fee of `encoded_tx` from an OP Stack style oracle.
    async fn l1_fee_inputs(&self, oracle: Address, encoded_tx: Bytes)
    -> TransportResult<L1FeeInputs>;
}

/// A [`ChainClient`] backed by a JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct RpcChainClient {
    chain_id: ChainId,
    provider: DynProvider,
    forwarder: Address,
}

impl RpcChainClient {
    /// Creates a new [`RpcChainClient`] over an existing provider.
    pub fn new(chain_id: ChainId, provider: DynProvider, forwarder: Address) -> Self {
        Self { chain_id, provider, forwarder }
    }

    /// Connects to an HTTP endpoint with a per-request timeout and rate limit retries.
    pub fn connect_http(
        chain_id: ChainId,
        endpoint: Url,
        forwarder: Address,
        request_timeout: Duration,
    ) -> Self {
        let client = ClientBuilder::default()
            .layer(TimeoutLayer::new(request_timeout, chain_id))
            .layer(RETRY_LAYER.clone())
            .http(endpoint);
        let provider = ProviderBuilder::new().connect_client(client).erased();
        Self::new(chain_id, provider, forwarder)
    }

    /// The underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    async fn fee_data(&self, market: FeeMarket) -> TransportResult<FeeData> {
        match market {
            FeeMarket::Legacy => {
                let gas_price = self.provider.get_gas_price().await?;
                Ok(FeeData::legacy(gas_price))
            }
            FeeMarket::Eip1559 => {
                let (block, max_priority_fee_per_gas, gas_price) = tokio::try_join!(
                    async { self.provider.get_block_by_number(BlockNumberOrTag::Latest).await },
                    self.provider.get_max_priority_fee_per_gas(),
                    self.provider.get_gas_price(),
                )?;
                let last_base_fee_per_gas =
                    block.and_then(|block| block.header.base_fee_per_gas).map(u128::from);
                trace!(?last_base_fee_per_gas, max_priority_fee_per_gas, gas_price, "Fee data");

                Ok(FeeData {
                    gas_price: Some(gas_price),
                    last_base_fee_per_gas,
                    max_priority_fee_per_gas: last_base_fee_per_gas
                        .map(|_| max_priority_fee_per_gas),
                })
            }
        }
    }

    async fn code_at(&self, address: Address) -> TransportResult<Bytes> {
        self.provider.get_code_at(address).await
    }

    async fn required_signers(&self, wallet: Address) -> TransportResult<u8> {
        IAvocadoWallet::new(wallet, &self.provider)
            .requiredSigners()
            .call()
            .await
            .map_err(TransportErrorKind::custom)
    }

    async fn wallet_nonce(&self, wallet: Address) -> TransportResult<U256> {
        IAvocadoWallet::new(wallet, &self.provider)
            .avoNonce()
            .call()
            .await
            .map_err(TransportErrorKind::custom)
    }

    async fn token_balance(&self, token: Address, owner: Address) -> TransportResult<U256> {
        IERC20::new(token, &self.provider)
            .balanceOf(owner)
            .call()
            .await
            .map_err(TransportErrorKind::custom)
    }

    async fn compute_wallet_address(
        &self,
        owner: Address,
        index: u32,
    ) -> TransportResult<Address> {
        IAvoForwarder::new(self.forwarder, &self.provider)
            .computeAvocado(owner, index)
            .call()
            .await
            .map_err(TransportErrorKind::custom)
    }

    #[instrument(skip_all, fields(chain_id = self.chain_id))]
    async fn simulate(&self, call: &ForwarderCall) -> TransportResult<SimulationOutcome> {
        let result = IAvoForwarder::new(self.forwarder, &self.provider)
            .call_builder(&call.simulate_call())
            .from(SIMULATION_SENDER)
            .call()
            .await
            .map_err(TransportErrorKind::custom)?;

        Ok(SimulationOutcome {
            cast_gas_used: result.castGasUsed_,
            deployment_gas_used: result.deploymentGasUsed_,
            is_deployed: result.isDeployed_,
            success: result.success_,
            revert_reason: result.revertReason_,
        })
    }

    fn populate(&self, call: &ForwarderCall) -> PopulatedTransaction {
        PopulatedTransaction {
            from: MOCK_SIGNER,
            to: self.forwarder,
            data: call.execute_calldata(),
        }
    }

    async fn l1_gas_component(&self, to: Address, data: Bytes) -> TransportResult<u64> {
        NodeInterface::new(NODE_INTERFACE_CONTRACT, &self.provider)
            .gasEstimateL1Component(to, false, data)
            .call()
            .await
            .map(|estimate| estimate.gasEstimateForL1)
            .map_err(TransportErrorKind::custom)
    }

    async fn l1_fee_inputs(
        &self,
        oracle: Address,
        encoded_tx: Bytes,
    ) -> TransportResult<L1FeeInputs> {
        let oracle = GasPriceOracle::new(oracle, &self.provider);
        let (l1_base_fee, scalar, l1_gas_used) = tokio::try_join!(
            async { oracle.l1BaseFee().call().await },
            async { oracle.scalar().call().await },
            async { oracle.getL1GasUsed(encoded_tx).call().await },
        )
        .map_err(TransportErrorKind::custom)?;

        Ok(L1FeeInputs { l1_base_fee, scalar, l1_gas_used })
    }
}
