//! Route finder configuration.
use crate::{
    chains::{ChainProfile, FeeMarket, L1Surcharge, op},
    constants::{
        DEFAULT_CHAIN_TIMEOUT, DEFAULT_FORWARDER, DEFAULT_NONCE_TTL, DEFAULT_REQUIRED_SIGNERS_TTL,
        DEFAULT_RPC_TIMEOUT, DEFAULT_WALLET_ADDRESS_TTL,
    },
    pricing::GasMultiplierTable,
    types::{TokenProfile, TokenSymbol},
};
use alloy::primitives::{Address, ChainId, U256, address};
use alloy_chains::{Chain, NamedChain};
use eyre::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    net::{IpAddr, Ipv4Addr},
    path::Path,
    time::Duration,
};
use url::Url;

/// Route finder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Supported chains.
    pub chains: BTreeMap<ChainId, ChainConfig>,
    /// Base gas limit multipliers.
    #[serde(default)]
    pub gas_multipliers: GasMultiplierTable,
    /// Estimation settings.
    #[serde(default)]
    pub estimation: EstimationConfig,
    /// Cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Price feed configuration.
    #[serde(default)]
    pub pricefeed: PriceFeedConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            chains: default_chains(),
            gas_multipliers: GasMultiplierTable::default(),
            estimation: EstimationConfig::default(),
            cache: CacheConfig::default(),
            pricefeed: PriceFeedConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Sets the IP address to serve the API on.
    pub fn with_address(mut self, address: IpAddr) -> Self {
        self.server.address = address;
        self
    }

    /// Sets the port to serve the API on.
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Sets the prefix all routes are nested under.
    pub fn with_route_prefix(mut self, route_prefix: Option<String>) -> Self {
        if route_prefix.is_some() {
            self.server.route_prefix = route_prefix;
        }
        self
    }

    /// Overrides the RPC endpoints of configured chains.
    ///
    /// Endpoints of chains that are not configured are ignored.
    pub fn with_endpoints(mut self, endpoints: impl IntoIterator<Item = (ChainId, Url)>) -> Self {
        for (chain_id, endpoint) in endpoints {
            if let Some(chain) = self.chains.get_mut(&chain_id) {
                chain.endpoint = endpoint;
            }
        }
        self
    }

    /// Sets the forwarder address.
    pub fn with_forwarder(mut self, forwarder: Option<Address>) -> Self {
        if let Some(forwarder) = forwarder {
            self.estimation.forwarder = forwarder;
        }
        self
    }

    /// Sets the timeout of a single RPC request.
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.estimation.rpc_timeout = timeout;
        self
    }

    /// Sets the timeout of a per-chain lookup.
    pub fn with_chain_timeout(mut self, timeout: Duration) -> Self {
        self.estimation.chain_timeout = timeout;
        self
    }

    /// Uses an Upstash Redis REST endpoint as the cache backend.
    pub fn with_upstash_cache(mut self, url: Option<Url>, token: Option<String>) -> Self {
        if let Some(url) = url {
            self.cache.backend = CacheBackend::Upstash { url, token };
        }
        self
    }

    /// Sets the lifetime of native token prices.
    pub fn with_rate_ttl(mut self, rate_ttl: Duration) -> Self {
        self.pricefeed.rate_ttl = rate_ttl;
        self
    }

    /// Sets a constant native token price. Used for testing.
    pub fn with_constant_rate(mut self, constant_rate: Option<f64>) -> Self {
        self.pricefeed.constant_rate = constant_rate.or(self.pricefeed.constant_rate);
        self
    }

    /// Static profiles of all configured chains.
    pub fn chain_profiles(&self) -> impl Iterator<Item = ChainProfile> + '_ {
        self.chains.iter().map(|(chain_id, chain)| chain.profile(*chain_id))
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address to serve the API on.
    pub address: IpAddr,
    /// The port to serve the API on.
    pub port: u16,
    /// Prefix all routes are nested under, e.g. `/route-finder`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_prefix: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::LOCALHOST), port: 9119, route_prefix: None }
    }
}

/// Configuration of a single chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Display name.
    pub name: String,
    /// The RPC endpoint of the chain.
    pub endpoint: Url,
    /// Gas price multiplier in basis-hundreds.
    pub gas_price_multiplier: u64,
    /// Fee market.
    #[serde(default)]
    pub fee_market: FeeMarket,
    /// L1 surcharge.
    #[serde(default)]
    pub l1_surcharge: L1Surcharge,
    /// Supported tokens.
    #[serde(default)]
    pub tokens: BTreeMap<TokenSymbol, TokenConfig>,
}

impl ChainConfig {
    /// The static profile of this chain.
    pub fn profile(&self, chain_id: ChainId) -> ChainProfile {
        ChainProfile {
            chain_id,
            name: self.name.clone(),
            gas_price_multiplier: self.gas_price_multiplier,
            fee_market: self.fee_market,
            l1_surcharge: self.l1_surcharge,
            tokens: self
                .tokens
                .iter()
                .map(|(symbol, token)| {
                    (
                        *symbol,
                        TokenProfile {
                            chain_id,
                            symbol: *symbol,
                            address: token.address,
                            decimals: token.decimals,
                        },
                    )
                })
                .collect(),
        }
    }
}

/// A token deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token contract.
    pub address: Address,
    /// Token decimals.
    pub decimals: u8,
}

/// Estimation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    /// Wallet forwarder contract.
    pub forwarder: Address,
    /// Chain wallet addresses are derived on.
    pub address_resolution_chain: ChainId,
    /// Wallet version used to pick the base gas limit multiplier.
    pub wallet_version: u8,
    /// Timeout of a single RPC request.
    #[serde(with = "crate::serde::duration")]
    pub rpc_timeout: Duration,
    /// Timeout of the whole lookup on one chain.
    #[serde(with = "crate::serde::duration")]
    pub chain_timeout: Duration,
    /// Gas limit buffers.
    pub gas: GasLimitConfig,
    /// Fee settings.
    pub fee: FeeConfig,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            forwarder: DEFAULT_FORWARDER,
            address_resolution_chain: Chain::from_named(NamedChain::Polygon).id(),
            wallet_version: 1,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            chain_timeout: DEFAULT_CHAIN_TIMEOUT,
            gas: GasLimitConfig::default(),
            fee: FeeConfig::default(),
        }
    }
}

/// Empirically tuned gas limit buffers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasLimitConfig {
    /// Action set id of flashloan batches.
    pub flashloan_action_id: u64,
    /// Multiplier applied to the gas limit of flashloan batches.
    pub flashloan_multiplier: Decimal,
    /// Gas limit from which the large transaction buffer applies.
    pub large_transaction_threshold: u64,
    /// Numerator of the large transaction buffer.
    pub large_transaction_buffer_numerator: u64,
    /// Denominator of the large transaction buffer.
    pub large_transaction_buffer_denominator: u64,
}

impl Default for GasLimitConfig {
    fn default() -> Self {
        Self {
            flashloan_action_id: 21,
            flashloan_multiplier: Decimal::new(1175, 3),
            large_transaction_threshold: 3_000_000,
            large_transaction_buffer_numerator: 2,
            large_transaction_buffer_denominator: 64,
        }
    }
}

/// Fee settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Margin applied on top of the combined multiplier.
    pub safety_margin: Decimal,
    /// Minimum fee, fixed-point with 18 decimals.
    #[serde(with = "alloy::serde::displayfromstr")]
    pub min_fee: U256,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self { safety_margin: Decimal::new(12, 1), min_fee: U256::from(100_000_000_000_000u64) }
    }
}

/// Cache backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CacheBackend {
    /// In-process cache.
    Memory {
        /// Maximum number of entries.
        max_capacity: u64,
    },
    /// Upstash Redis over its REST API.
    Upstash {
        /// REST endpoint.
        url: Url,
        /// Bearer token. Falls back to `UPSTASH_REDIS_REST_TOKEN`.
        #[serde(default, skip_serializing)]
        token: Option<String>,
    },
}

impl Default for CacheBackend {
    fn default() -> Self {
        Self::Memory { max_capacity: 100_000 }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backend.
    pub backend: CacheBackend,
    /// Lifetime of derived wallet addresses.
    #[serde(with = "crate::serde::duration")]
    pub wallet_address_ttl: Duration,
    /// Lifetime of required signer counts.
    #[serde(with = "crate::serde::duration")]
    pub required_signers_ttl: Duration,
    /// Lifetime of wallet nonces.
    #[serde(with = "crate::serde::duration")]
    pub nonce_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            wallet_address_ttl: DEFAULT_WALLET_ADDRESS_TTL,
            required_signers_ttl: DEFAULT_REQUIRED_SIGNERS_TTL,
            nonce_ttl: DEFAULT_NONCE_TTL,
        }
    }
}

/// Price feed configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceFeedConfig {
    /// Base URL of the price API.
    pub base_url: Url,
    /// Interval between background refreshes.
    #[serde(with = "crate::serde::duration")]
    pub refresh_interval: Duration,
    /// Duration after which a price is considered expired.
    #[serde(with = "crate::serde::duration")]
    pub rate_ttl: Duration,
    /// Constant USD price of every native token. For testing only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constant_rate: Option<f64>,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://prices.instadapp.io").expect("valid url"),
            refresh_interval: Duration::from_secs(60),
            rate_ttl: Duration::from_secs(300),
            constant_rate: None,
        }
    }
}

fn usdc_usdt(usdc: Address, usdt: Address) -> BTreeMap<TokenSymbol, TokenConfig> {
    BTreeMap::from([
        (TokenSymbol::USDC, TokenConfig { address: usdc, decimals: 6 }),
        (TokenSymbol::USDT, TokenConfig { address: usdt, decimals: 6 }),
    ])
}

fn endpoint(url: &str) -> Url {
    Url::parse(url).expect("valid url")
}

/// The chains supported out of the box.
fn default_chains() -> BTreeMap<ChainId, ChainConfig> {
    let (op_oracle, op_divisor) = op::oracle_for_chain(Chain::optimism_mainnet().id());

    BTreeMap::from([
        (
            Chain::mainnet().id(),
            ChainConfig {
                name: "Ethereum Mainnet".into(),
                endpoint: endpoint("https://rpc.ankr.com/eth"),
                gas_price_multiplier: 110,
                fee_market: FeeMarket::Eip1559,
                l1_surcharge: L1Surcharge::None,
                tokens: usdc_usdt(
                    address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
                    address!("0xdAC17F958D2ee523a2206206994597C13D831ec7"),
                ),
            },
        ),
        (
            Chain::from_named(NamedChain::Polygon).id(),
            ChainConfig {
                name: "Polygon POS".into(),
                endpoint: endpoint("https://rpc.ankr.com/polygon"),
                gas_price_multiplier: 120,
                fee_market: FeeMarket::Legacy,
                l1_surcharge: L1Surcharge::None,
                tokens: usdc_usdt(
                    address!("0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359"),
                    address!("0xc2132D05D31c914a87C6611C10748AEb04B58e8F"),
                ),
            },
        ),
        (
            Chain::optimism_mainnet().id(),
            ChainConfig {
                name: "Optimism".into(),
                endpoint: endpoint("https://rpc.ankr.com/optimism"),
                gas_price_multiplier: 120,
                fee_market: FeeMarket::Legacy,
                l1_surcharge: L1Surcharge::DataFee {
                    oracle: op_oracle,
                    scaling_divisor: op_divisor,
                },
                tokens: usdc_usdt(
                    address!("0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85"),
                    address!("0x94b008aA00579c1307B0EF2c499aD98a8ce58e58"),
                ),
            },
        ),
        (
            Chain::from_named(NamedChain::Avalanche).id(),
            ChainConfig {
                name: "Avalanche-C".into(),
                endpoint: endpoint("https://rpc.ankr.com/avalanche"),
                gas_price_multiplier: 120,
                fee_market: FeeMarket::Legacy,
                l1_surcharge: L1Surcharge::None,
                tokens: usdc_usdt(
                    address!("0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E"),
                    address!("0x9702230A8Ea53601f5cD2dc00fDBc13d4dF4A8c7"),
                ),
            },
        ),
        (
            Chain::arbitrum_mainnet().id(),
            ChainConfig {
                name: "Arbitrum".into(),
                endpoint: endpoint("https://arb1.arbitrum.io/rpc"),
                gas_price_multiplier: 120,
                fee_market: FeeMarket::Legacy,
                l1_surcharge: L1Surcharge::GasComponent,
                tokens: usdc_usdt(
                    address!("0xaf88d065e77c8cC2239327C5EDb3A432268e5831"),
                    address!("0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9"),
                ),
            },
        ),
    ])
}
