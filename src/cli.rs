//! # Route finder CLI
use crate::{config::RouterConfig, spawn::try_spawn_with_args};
use alloy::primitives::{Address, ChainId};
use clap::Parser;
use eyre::OptionExt;
use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    time::Duration,
};
use tracing::info;
use url::Url;

/// Estimates cross-chain sourcing fees and plans the cheapest routes.
#[derive(Debug, Parser)]
#[command(author, about = "Route finder", long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, a default one will be used and stored under the given path.
    #[arg(
        long,
        value_name = "CONFIG",
        env = "ROUTE_FINDER_CONFIG",
        default_value = "route-finder.yaml"
    )]
    pub config: PathBuf,
    /// The address to serve the API on.
    #[arg(
        long = "http.addr",
        value_name = "ADDR",
        default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST)
    )]
    pub address: IpAddr,
    /// The port to serve the API on.
    #[arg(long = "http.port", value_name = "PORT", env = "PORT", default_value_t = 9119)]
    pub port: u16,
    /// Prefix all routes are nested under.
    #[arg(long = "http.route-prefix", value_name = "PREFIX", env = "ROUTE_PREFIX")]
    pub route_prefix: Option<String>,
    /// The RPC endpoint of a configured chain, in a format of "chain_id:url".
    #[arg(long = "endpoint", value_name = "RPC_ENDPOINT", value_parser = parse_chain_url)]
    pub endpoints: Vec<(ChainId, Url)>,
    /// The address of the wallet forwarder.
    #[arg(long, value_name = "ADDRESS")]
    pub forwarder: Option<Address>,
    /// Timeout of a single RPC request.
    #[arg(long, value_name = "SECONDS", value_parser = parse_duration_secs, default_value = "10")]
    pub rpc_timeout: Duration,
    /// Timeout of the whole lookup on one chain.
    #[arg(long, value_name = "SECONDS", value_parser = parse_duration_secs, default_value = "20")]
    pub chain_timeout: Duration,
    /// The lifetime of a native token price.
    #[arg(long, value_name = "SECONDS", value_parser = parse_duration_secs, default_value = "300")]
    pub rate_ttl: Duration,
    /// A constant USD price for every native token. Should only be used for testing.
    #[arg(long, value_name = "USD")]
    pub constant_rate: Option<f64>,
    /// The Upstash Redis REST endpoint. Uses an in-memory cache if unset.
    #[arg(long = "upstash-url", value_name = "URL", env = "UPSTASH_REDIS_REST_URL")]
    pub upstash_url: Option<Url>,
    /// The Upstash Redis REST token.
    #[arg(long = "upstash-token", value_name = "TOKEN", env = "UPSTASH_REDIS_REST_TOKEN")]
    pub upstash_token: Option<String>,
}

impl Args {
    /// Run the route finder.
    pub async fn run(self) -> eyre::Result<()> {
        let config_path = self.config.clone();
        let handle = try_spawn_with_args(self, &config_path).await?;
        info!(url = %handle.http_url(), "Serving");
        handle.server.await?;

        Ok(())
    }

    /// Merges [`Args`] values into an existing [`RouterConfig`] instance.
    pub fn merge_config(self, config: RouterConfig) -> RouterConfig {
        config
            .with_address(self.address)
            .with_port(self.port)
            .with_route_prefix(self.route_prefix)
            .with_endpoints(self.endpoints)
            .with_forwarder(self.forwarder)
            .with_rpc_timeout(self.rpc_timeout)
            .with_chain_timeout(self.chain_timeout)
            .with_rate_ttl(self.rate_ttl)
            .with_constant_rate(self.constant_rate)
            .with_upstash_cache(self.upstash_url, self.upstash_token)
    }
}

/// Parses a string representing seconds to a [`Duration`].
fn parse_duration_secs(arg: &str) -> Result<std::time::Duration, std::num::ParseIntError> {
    let seconds = arg.parse()?;
    Ok(std::time::Duration::from_secs(seconds))
}

/// Parses a string representing a pair of chain id and a url in a format of "chain_id:url".
fn parse_chain_url(arg: &str) -> eyre::Result<(ChainId, Url)> {
    let (chain_id, url) = arg.split_once(':').ok_or_eyre("expected chain_id:url argument")?;

    Ok((chain_id.parse()?, url.parse()?))
}
