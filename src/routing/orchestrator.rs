use super::find_optimal_sources;
use crate::{
    chains::{Chain, Chains},
    error::{ChainUnavailable, EstimationError, RouterError, SourcingError},
    estimation::{BalanceProvider, EstimationRequest, FeeEstimationService},
    types::{Action, Balance, FeeQuote, SourcingPlan, TokenSymbol},
    wallet::{MetadataMode, WalletAddressResolver},
};
use alloy::primitives::{Address, ChainId, U256};
use futures::future::{join, join_all};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// A request to source `amount` of `token` into the wallet on `destination`.
#[derive(Debug, Clone)]
pub struct SourcingRequest {
    /// The chain being topped up.
    pub destination: ChainId,
    /// Token to source.
    pub token: TokenSymbol,
    /// Owner of the wallet.
    pub eoa: Address,
    /// Amount in whole tokens.
    pub amount: Decimal,
    /// The wallet, derived from `eoa` and `index` if absent.
    pub wallet: Option<Address>,
    /// Wallet index.
    pub index: u32,
}

/// Results of the lookups on a single source chain.
#[derive(Debug)]
struct ChainLookup {
    balance: Result<Option<Balance>, ChainUnavailable>,
    quote: Result<FeeQuote, ChainUnavailable>,
}

/// Fans lookups out to every source chain and plans the cheapest route.
#[derive(Debug, Clone)]
pub struct SourcingOrchestrator {
    chains: Chains,
    resolver: WalletAddressResolver,
    estimation: FeeEstimationService,
    balances: BalanceProvider,
    chain_timeout: Duration,
}

impl SourcingOrchestrator {
    /// Creates a new [`SourcingOrchestrator`].
    pub fn new(
        chains: Chains,
        resolver: WalletAddressResolver,
        estimation: FeeEstimationService,
        chain_timeout: Duration,
    ) -> Self {
        Self { chains, resolver, estimation, balances: BalanceProvider, chain_timeout }
    }

    /// The supported chains.
    pub fn chains(&self) -> &Chains {
        &self.chains
    }

    /// The fee estimation service.
    pub fn estimation(&self) -> &FeeEstimationService {
        &self.estimation
    }

    /// The wallet address resolver.
    pub fn resolver(&self) -> &WalletAddressResolver {
        &self.resolver
    }

    /// Plans the cheapest way to source the requested amount.
    ///
    /// Waits for every chain before planning. Chains that fail or time out are excluded.
    #[instrument(skip(self), fields(destination = request.destination, token = %request.token))]
    pub async fn find_routes(
        &self,
        request: SourcingRequest,
    ) -> Result<SourcingPlan, RouterError> {
        if self.chains.get(request.destination).is_none() {
            return Err(RouterError::UnsupportedChain(request.destination));
        }

        let wallet = match request.wallet {
            Some(wallet) => wallet,
            None => self
                .resolver
                .compute(request.eoa, request.index)
                .await
                .map_err(|err| SourcingError::WalletAddressUnavailable(err.to_string()))?,
        };

        let sources: Vec<&Chain> = self
            .chains
            .others(request.destination)
            .filter(|chain| chain.profile.token(request.token).is_some())
            .collect();
        let lookups =
            join_all(sources.iter().map(|chain| self.lookup(chain, &request, wallet))).await;

        let mut balances = Vec::new();
        let mut quotes = Vec::new();
        let mut failed = 0;
        for lookup in lookups {
            match lookup.balance {
                Ok(Some(balance)) => balances.push(balance),
                Ok(None) => {}
                Err(err) => {
                    warn!(%err, "Excluding chain");
                    failed += 1;
                }
            }
            match lookup.quote {
                Ok(quote) => quotes.push(quote),
                Err(err) => warn!(%err, "Chain quote unavailable"),
            }
        }

        if !sources.is_empty() && failed == sources.len() {
            return Err(SourcingError::AllChainsUnavailable.into());
        }
        debug!(balances = balances.len(), quotes = quotes.len(), "Planning route");

        Ok(find_optimal_sources(&quotes, &balances, request.amount)?)
    }

    /// Balance and quote lookups on `chain`, each bounded by the chain timeout.
    async fn lookup(
        &self,
        chain: &Chain,
        request: &SourcingRequest,
        wallet: Address,
    ) -> ChainLookup {
        let chain_id = chain.id();
        let balance = self.time_boxed(chain_id, async {
            self.balances
                .balance(chain, request.token, wallet)
                .await
                .map_err(|err| ChainUnavailable::new(chain_id, err))
        });
        let quote = self.time_boxed(chain_id, async {
            let Some(token) = chain.profile.token(request.token) else {
                return Err(ChainUnavailable::new(
                    chain_id,
                    EstimationError::UnsupportedToken { chain_id, token: request.token },
                ));
            };
            self.estimation
                .estimate(
                    chain,
                    EstimationRequest {
                        wallet,
                        eoa: request.eoa,
                        index: request.index,
                        actions: Action::sourcing_transfer(token.address, request.eoa),
                        action_id: U256::ZERO,
                        mode: MetadataMode::Soft,
                    },
                )
                .await
                .map_err(|err| ChainUnavailable::new(chain_id, err))
        });

        let (balance, quote) = join(balance, quote).await;
        ChainLookup { balance, quote }
    }

    /// Bounds `fut` by the chain timeout.
    async fn time_boxed<T>(
        &self,
        chain_id: ChainId,
        fut: impl Future<Output = Result<T, ChainUnavailable>>,
    ) -> Result<T, ChainUnavailable> {
        tokio::time::timeout(self.chain_timeout, fut).await.unwrap_or_else(|_| {
            Err(ChainUnavailable::new(chain_id, EstimationError::Timeout(self.chain_timeout)))
        })
    }
}
