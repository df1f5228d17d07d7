//! A mocked multi-chain environment.

use alloy::{
    primitives::{Address, Bytes, ChainId, U256, address},
    transports::{TransportErrorKind, TransportResult},
};
use async_trait::async_trait;
use axum::Router;
use route_finder::{
    api::{AppState, create_router},
    cache::RouterCache,
    chains::{Chain, ChainProfile, Chains, FeeMarket, L1Surcharge},
    config::{CacheConfig, EstimationConfig},
    estimation::FeeEstimationService,
    price::{PriceOracle, PriceOracleConfig},
    pricing::{FeeData, GasMultiplierTable, L1FeeInputs},
    provider::{ChainClient, SimulationOutcome},
    routing::SourcingOrchestrator,
    types::{ForwarderCall, PopulatedTransaction, TokenProfile, TokenSymbol},
    wallet::{WalletAddressResolver, WalletMetadataProvider},
};
use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const GWEI: u128 = 1_000_000_000;

/// One whole token of a 6 decimals stablecoin.
pub const TOKEN_UNIT: u64 = 1_000_000;

pub const EOA: Address = address!("0x1111111111111111111111111111111111111111");

/// Wallet every mocked chain derives for [`EOA`].
pub const WALLET: Address = address!("0x2222222222222222222222222222222222222222");

pub const FORWARDER: Address = address!("0x46978CD477A496028A18c02F07ab7F35EDBa5A54");

/// USDC address on a mocked chain.
pub fn usdc(chain_id: ChainId) -> Address {
    let mut bytes = [0xaa; 20];
    bytes[12..].copy_from_slice(&chain_id.to_be_bytes());
    Address::from(bytes)
}

fn rpc_error(what: &str) -> alloy::transports::TransportError {
    TransportErrorKind::custom_str(&format!("{what} failed"))
}

/// A scriptable chain.
#[derive(Debug)]
pub struct MockChain {
    pub chain_id: ChainId,
    pub fee_market: FeeMarket,
    pub l1_surcharge: L1Surcharge,
    pub gas_price_multiplier: u64,
    pub fee_data: FeeData,
    /// USDC balance of [`WALLET`] in base units. `None` fails the read.
    pub balance: Option<U256>,
    /// `None` fails the read.
    pub required_signers: Option<u8>,
    /// `None` fails the read.
    pub nonce: Option<U256>,
    pub code: Bytes,
    /// `None` fails the simulation call.
    pub simulation: Option<SimulationOutcome>,
    pub l1_gas: u64,
    pub l1_fee_inputs: L1FeeInputs,
    /// Delay before answering any async call.
    pub delay: Duration,
    /// Extra delay before answering a simulation.
    pub simulation_delay: Duration,
    pub supports_usdc: bool,
    pub required_signers_reads: AtomicUsize,
}

impl MockChain {
    /// A legacy chain quoting `gas_price` without any L1 surcharge.
    pub fn legacy(chain_id: ChainId, gas_price: u128) -> Self {
        Self {
            chain_id,
            fee_market: FeeMarket::Legacy,
            l1_surcharge: L1Surcharge::None,
            gas_price_multiplier: 120,
            fee_data: FeeData::legacy(gas_price),
            balance: Some(U256::ZERO),
            required_signers: Some(1),
            nonce: Some(U256::ZERO),
            code: Bytes::new(),
            simulation: Some(SimulationOutcome {
                cast_gas_used: U256::from(100_000),
                deployment_gas_used: U256::ZERO,
                is_deployed: true,
                success: true,
                revert_reason: String::new(),
            }),
            l1_gas: 0,
            l1_fee_inputs: L1FeeInputs::default(),
            delay: Duration::ZERO,
            simulation_delay: Duration::ZERO,
            supports_usdc: true,
            required_signers_reads: AtomicUsize::new(0),
        }
    }

    /// An EIP-1559 chain.
    pub fn eip1559(chain_id: ChainId, base_fee: u128, priority_fee: u128) -> Self {
        Self {
            fee_market: FeeMarket::Eip1559,
            gas_price_multiplier: 110,
            fee_data: FeeData::eip1559(base_fee, priority_fee),
            ..Self::legacy(chain_id, 0)
        }
    }

    pub fn with_balance(mut self, whole_tokens: u64) -> Self {
        self.balance = Some(U256::from(whole_tokens * TOKEN_UNIT));
        self
    }

    pub fn with_cast_gas(mut self, gas: u64) -> Self {
        if let Some(simulation) = &mut self.simulation {
            simulation.cast_gas_used = U256::from(gas);
        }
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn profile(&self) -> ChainProfile {
        let tokens = if self.supports_usdc {
            BTreeMap::from([(
                TokenSymbol::USDC,
                TokenProfile {
                    chain_id: self.chain_id,
                    symbol: TokenSymbol::USDC,
                    address: usdc(self.chain_id),
                    decimals: 6,
                },
            )])
        } else {
            BTreeMap::new()
        };
        ChainProfile {
            chain_id: self.chain_id,
            name: format!("Chain {}", self.chain_id),
            gas_price_multiplier: self.gas_price_multiplier,
            fee_market: self.fee_market,
            l1_surcharge: self.l1_surcharge,
            tokens,
        }
    }

    async fn respond<T>(&self, value: Option<T>, what: &str) -> TransportResult<T> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        value.ok_or_else(|| rpc_error(what))
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    async fn fee_data(&self, _market: FeeMarket) -> TransportResult<FeeData> {
        self.respond(Some(self.fee_data), "fee data").await
    }

    async fn code_at(&self, _address: Address) -> TransportResult<Bytes> {
        self.respond(Some(self.code.clone()), "code").await
    }

    async fn required_signers(&self, _wallet: Address) -> TransportResult<u8> {
        self.required_signers_reads.fetch_add(1, Ordering::SeqCst);
        self.respond(self.required_signers, "required signers").await
    }

    async fn wallet_nonce(&self, _wallet: Address) -> TransportResult<U256> {
        self.respond(self.nonce, "nonce").await
    }

    async fn token_balance(&self, token: Address, owner: Address) -> TransportResult<U256> {
        assert_eq!(token, usdc(self.chain_id));
        let balance = if owner == WALLET { self.balance } else { Some(U256::ZERO) };
        self.respond(balance, "balance").await
    }

    async fn compute_wallet_address(
        &self,
        owner: Address,
        _index: u32,
    ) -> TransportResult<Address> {
        self.respond((owner == EOA).then_some(WALLET), "wallet address").await
    }

    async fn simulate(&self, _call: &ForwarderCall) -> TransportResult<SimulationOutcome> {
        tokio::time::sleep(self.simulation_delay).await;
        self.respond(self.simulation.clone(), "simulation").await
    }

    fn populate(&self, call: &ForwarderCall) -> PopulatedTransaction {
        PopulatedTransaction {
            from: Address::repeat_byte(0xff),
            to: FORWARDER,
            data: call.execute_calldata(),
        }
    }

    async fn l1_gas_component(&self, _to: Address, _data: Bytes) -> TransportResult<u64> {
        self.respond(Some(self.l1_gas), "l1 gas").await
    }

    async fn l1_fee_inputs(
        &self,
        _oracle: Address,
        _encoded_tx: Bytes,
    ) -> TransportResult<L1FeeInputs> {
        self.respond(Some(self.l1_fee_inputs), "l1 fee inputs").await
    }
}

/// Services wired over mocked chains.
#[derive(Debug)]
pub struct Environment {
    pub mocks: BTreeMap<ChainId, Arc<MockChain>>,
    pub chains: Chains,
    pub orchestrator: SourcingOrchestrator,
    pub metadata: WalletMetadataProvider,
}

/// Environment settings.
#[derive(Debug)]
pub struct EnvironmentConfig {
    /// USD price of every native token. `None` leaves the oracle empty.
    pub native_price: Option<f64>,
    pub chain_timeout: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self { native_price: Some(1.0), chain_timeout: Duration::from_secs(20) }
    }
}

impl Environment {
    pub fn setup(mocks: Vec<MockChain>) -> Self {
        Self::setup_with_config(mocks, EnvironmentConfig::default())
    }

    pub fn setup_with_config(mocks: Vec<MockChain>, config: EnvironmentConfig) -> Self {
        let mocks: BTreeMap<_, _> =
            mocks.into_iter().map(|mock| (mock.chain_id, Arc::new(mock))).collect();
        let chains = Chains::new(
            mocks.values().map(|mock| Chain::new(mock.profile(), mock.clone())),
        );
        let resolution_chain = chains.iter().next().cloned().expect("at least one chain");

        let cache = RouterCache::in_memory(1_000);
        let cache_config = CacheConfig::default();
        let mut price_oracle = PriceOracle::new(PriceOracleConfig::default());
        if let Some(price) = config.native_price {
            price_oracle = price_oracle.with_constant_rate(price);
        }

        let metadata = WalletMetadataProvider::new(cache.clone(), cache_config.clone());
        let estimation = FeeEstimationService::new(
            metadata.clone(),
            price_oracle,
            Arc::new(GasMultiplierTable::default()),
            Arc::new(EstimationConfig::default()),
        );
        let resolver =
            WalletAddressResolver::new(resolution_chain, cache, cache_config.wallet_address_ttl);
        let orchestrator =
            SourcingOrchestrator::new(chains.clone(), resolver, estimation, config.chain_timeout);

        Self { mocks, chains, orchestrator, metadata }
    }

    pub fn chain(&self, chain_id: ChainId) -> &Chain {
        self.chains.get(chain_id).expect("configured chain")
    }

    pub fn mock(&self, chain_id: ChainId) -> &MockChain {
        &self.mocks[&chain_id]
    }

    pub fn router(&self, route_prefix: Option<&str>) -> Router {
        create_router(
            Arc::new(AppState { orchestrator: self.orchestrator.clone() }),
            route_prefix,
        )
    }
}
