//! Route finder spawn utilities.
use crate::{
    api::{AppState, create_router},
    cache::{RouterCache, UpstashCache},
    chains::{Chain, Chains},
    cli::Args,
    config::{CacheBackend, RouterConfig},
    estimation::FeeEstimationService,
    price::{InstadappClient, PriceOracle, PriceOracleConfig},
    provider::RpcChainClient,
    routing::SourcingOrchestrator,
    wallet::{WalletAddressResolver, WalletMetadataProvider},
};
use eyre::{OptionExt, WrapErr};
use itertools::Itertools;
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::{error, info, warn};

/// Environment variable holding the Upstash REST token.
const UPSTASH_TOKEN_ENV: &str = "UPSTASH_REDIS_REST_TOKEN";

/// Context returned once the route finder is launched.
#[derive(Debug)]
pub struct RouterHandle {
    /// The socket address to which the server is bound.
    pub local_addr: SocketAddr,
    /// Configured chains.
    pub chains: Chains,
    /// The server task.
    pub server: JoinHandle<()>,
}

impl RouterHandle {
    /// Returns the url to the http server
    pub fn http_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }
}

/// Attempts to spawn the route finder using CLI arguments and a configuration file.
pub async fn try_spawn_with_args<P: AsRef<Path>>(
    args: Args,
    config_path: P,
) -> eyre::Result<RouterHandle> {
    let config = if !config_path.as_ref().exists() {
        let config = args.merge_config(RouterConfig::default());
        config.save_to_file(&config_path)?;
        config
    } else {
        // File exists: load and override with CLI values.
        args.merge_config(RouterConfig::load_from_file(&config_path)?)
    };

    try_spawn(config).await
}

/// Builds the cache described by `backend`.
fn build_cache(backend: &CacheBackend, client: &reqwest::Client) -> eyre::Result<RouterCache> {
    match backend {
        CacheBackend::Memory { max_capacity } => {
            info!(max_capacity, "Using in-memory cache.");
            Ok(RouterCache::in_memory(*max_capacity))
        }
        CacheBackend::Upstash { url, token } => {
            let token = match token {
                Some(token) => token.clone(),
                None => std::env::var(UPSTASH_TOKEN_ENV)
                    .wrap_err_with(|| format!("missing Upstash token, set {UPSTASH_TOKEN_ENV}"))?,
            };
            info!(%url, "Using Upstash cache.");
            Ok(RouterCache::new(Arc::new(UpstashCache::new(client.clone(), url.clone(), token))))
        }
    }
}

/// Spawns the route finder using the provided [`RouterConfig`].
pub async fn try_spawn(config: RouterConfig) -> eyre::Result<RouterHandle> {
    let estimation = &config.estimation;

    // construct chains
    let chains = Chains::new(config.chains.iter().map(|(chain_id, chain)| {
        let client = RpcChainClient::connect_http(
            *chain_id,
            chain.endpoint.clone(),
            estimation.forwarder,
            estimation.rpc_timeout,
        );
        Chain::new(chain.profile(*chain_id), Arc::new(client))
    }));
    let resolution_chain = chains
        .get(estimation.address_resolution_chain)
        .cloned()
        .ok_or_eyre("address resolution chain is not configured")?;

    let http = reqwest::Client::new();
    let cache = build_cache(&config.cache.backend, &http)?;

    // construct price oracle
    let mut price_oracle =
        PriceOracle::new(PriceOracleConfig { rate_ttl: config.pricefeed.rate_ttl });
    if let Some(constant_rate) = config.pricefeed.constant_rate {
        warn!("Setting a constant price rate: {constant_rate}. Should not be used in production!");
        price_oracle = price_oracle.with_constant_rate(constant_rate);
    } else {
        let client = InstadappClient::new(http, config.pricefeed.base_url.clone());
        price_oracle.spawn_fetcher(
            client.clone(),
            chains.chain_ids_iter().copied().collect(),
            config.pricefeed.refresh_interval,
        );
        price_oracle = price_oracle.with_on_demand(client);
    }

    // construct services
    let resolver = WalletAddressResolver::new(
        resolution_chain,
        cache.clone(),
        config.cache.wallet_address_ttl,
    );
    let estimation_service = FeeEstimationService::new(
        WalletMetadataProvider::new(cache, config.cache.clone()),
        price_oracle,
        Arc::new(config.gas_multipliers.clone()),
        Arc::new(estimation.clone()),
    );
    let orchestrator = SourcingOrchestrator::new(
        chains.clone(),
        resolver,
        estimation_service,
        estimation.chain_timeout,
    );

    // start server
    let router = create_router(
        Arc::new(AppState { orchestrator }),
        config.server.route_prefix.as_deref(),
    );
    let listener = TcpListener::bind((config.server.address, config.server.port)).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "Started route finder");
    info!("Chains: {}", chains.iter().map(|chain| chain.name()).join(", "));

    let server = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            error!(%err, "Server stopped");
        }
    });

    Ok(RouterHandle { local_addr, chains, server })
}
