use crate::{
    constants::NATIVE_TOKEN_ADDRESS,
    price::{PriceFetcher, oracle::PriceOracleMessage},
};
use alloy::primitives::ChainId;
use eyre::{Context, OptionExt};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::{sync::mpsc, time::interval};
use tracing::{trace, warn};
use url::Url;

/// A token price as returned by the price API.
///
/// Prices are sometimes encoded as strings.
#[derive(Debug, Deserialize)]
struct TokenPrice {
    price: serde_json::Value,
}

impl TokenPrice {
    fn as_f64(&self) -> Option<f64> {
        match &self.price {
            serde_json::Value::Number(number) => number.as_f64(),
            serde_json::Value::String(price) => price.parse().ok(),
            _ => None,
        }
    }
}

/// Client of the Instadapp price API.
#[derive(Debug, Clone)]
pub struct InstadappClient {
    client: reqwest::Client,
    base_url: Url,
}

impl InstadappClient {
    /// Creates a new [`InstadappClient`].
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The URL of the native token price of `chain_id`.
    pub fn price_url(&self, chain_id: ChainId) -> eyre::Result<Url> {
        let mut url = self.base_url.join(&format!("{chain_id}/tokens"))?;
        url.query_pairs_mut().append_pair("addresses", &NATIVE_TOKEN_ADDRESS.to_string());
        Ok(url)
    }

    /// Fetches the USD price of the native token of `chain_id`.
    pub async fn native_price(&self, chain_id: ChainId) -> eyre::Result<f64> {
        let url = self.price_url(chain_id)?;
        let prices: Vec<TokenPrice> = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .wrap_err_with(|| format!("failed to fetch native price of chain {chain_id}"))?
            .json()
            .await
            .wrap_err("failed to parse price response")?;
        trace!(chain_id, ?prices, "Price API response.");

        prices
            .first()
            .and_then(TokenPrice::as_f64)
            .filter(|price| price.is_finite() && *price > 0.0)
            .ok_or_eyre("no usable price in response")
    }
}

/// Instadapp price fetcher.
#[derive(Debug)]
pub struct Instadapp {
    client: InstadappClient,
    chains: Vec<ChainId>,
    update_tx: mpsc::UnboundedSender<PriceOracleMessage>,
}

impl Instadapp {
    /// Spawns a task that sends the native token prices of `chains` to the oracle on every
    /// `refresh_interval`.
    pub fn launch(
        client: InstadappClient,
        chains: Vec<ChainId>,
        refresh_interval: Duration,
        update_tx: mpsc::UnboundedSender<PriceOracleMessage>,
    ) {
        let fetcher = Self { client, chains, update_tx };

        tokio::spawn(async move {
            let mut clock = interval(refresh_interval);
            loop {
                clock.tick().await;
                if fetcher.update_prices().await.is_err() {
                    // oracle is gone
                    break;
                }
            }
        });
    }

    /// Fetches all prices and forwards the ones that succeeded.
    async fn update_prices(&self) -> Result<(), mpsc::error::SendError<PriceOracleMessage>> {
        let results = futures::future::join_all(
            self.chains.iter().map(|chain_id| async move {
                (*chain_id, self.client.native_price(*chain_id).await)
            }),
        )
        .await;

        let prices = results
            .into_iter()
            .filter_map(|(chain_id, result)| match result {
                Ok(price) => Some((chain_id, price)),
                Err(err) => {
                    warn!(chain_id, %err, "Failed to fetch price.");
                    None
                }
            })
            .collect::<Vec<_>>();

        self.update_tx.send(PriceOracleMessage::Update {
            fetcher: PriceFetcher::Instadapp,
            prices,
            timestamp: Instant::now(),
        })
    }
}
