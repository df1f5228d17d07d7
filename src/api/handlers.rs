use crate::{
    chains::Chains,
    error::{RouterError, SourcingError, ValidationError},
    estimation::EstimationRequest,
    routing::{SourcingOrchestrator, SourcingRequest},
    types::{Action, FeeQuote, SourcingPlan, TokenSymbol},
    wallet::MetadataMode,
};
use alloy::primitives::{Address, ChainId, U256};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::{str::FromStr, sync::Arc};
use tracing::debug;

/// Shared state of the API handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Route planner and the services it drives.
    pub orchestrator: SourcingOrchestrator,
}

/// Query of `GET /estimate-sourcing-routes/{chainId}/{token}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcingRoutesQuery {
    /// Owner of the wallet.
    pub eoa_address: Option<String>,
    /// Amount to source in whole tokens.
    pub amount: Option<String>,
    /// The wallet, derived from the owner if absent.
    pub avocado_address: Option<String>,
    /// Wallet index, `0` if absent.
    pub index: Option<String>,
}

/// Body of `POST /estimate-fees-with-actions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateWithActionsBody {
    /// Actions to execute.
    pub actions: Vec<Action>,
    /// Chain to cast on.
    pub chain_id: ChainId,
    /// Owner of the wallet.
    pub eoa_address: String,
    /// The wallet, derived from the owner if absent.
    #[serde(default)]
    pub avocado_address: Option<String>,
    /// Wallet index, `0` if absent.
    #[serde(default)]
    pub avocado_wallet_index: Option<String>,
    /// Action set id.
    #[serde(default)]
    pub id: Option<U256>,
}

/// Collects field errors of a request.
#[derive(Debug, Default)]
struct Validator {
    errors: Vec<String>,
}

impl Validator {
    fn check<T>(&mut self, value: Option<T>, error: impl FnOnce() -> String) -> Option<T> {
        if value.is_none() {
            self.errors.push(error());
        }
        value
    }

    fn chain_id(&mut self, chains: &Chains, raw: &str) -> Option<ChainId> {
        let chain_id = raw.parse::<ChainId>().ok().filter(|id| chains.get(*id).is_some());
        self.check(chain_id, || {
            format!("chainId must be one of {}", chains.chain_ids_iter().join(", "))
        })
    }

    fn address(&mut self, field: &str, raw: Option<&str>) -> Option<Address> {
        let address = raw.and_then(|raw| Address::from_str(raw.trim()).ok());
        self.check(address, || format!("{field} must be an Ethereum address"))
    }

    fn optional_address(&mut self, field: &str, raw: Option<&str>) -> Option<Option<Address>> {
        match raw {
            None => Some(None),
            Some(raw) => self.address(field, Some(raw)).map(Some),
        }
    }

    fn index(&mut self, field: &str, raw: Option<&str>) -> Option<u32> {
        let index = match raw {
            None => Some(0),
            Some(raw) => raw.trim().parse::<u32>().ok(),
        };
        self.check(index, || format!("{field} must be a wallet index"))
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ValidationError::new("invalid request").with_errors(self.errors))
    }
}

/// Parses a positive decimal amount, accepting scientific notation.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .filter(|amount| *amount > Decimal::ZERO)
}

impl SourcingRoutesQuery {
    /// Validates the request against the supported chains.
    pub fn into_request(
        self,
        chains: &Chains,
        chain_id: &str,
        token: &str,
    ) -> Result<SourcingRequest, ValidationError> {
        let mut validator = Validator::default();
        let destination = validator.chain_id(chains, chain_id);
        let token = validator.check(token.parse::<TokenSymbol>().ok(), || {
            format!("token must be one of {}, {}", TokenSymbol::USDC, TokenSymbol::USDT)
        });
        let eoa = validator.address("eoaAddress", self.eoa_address.as_deref());
        let amount = validator.check(self.amount.as_deref().and_then(parse_amount), || {
            "amount must be a positive number".to_string()
        });
        let wallet = validator.optional_address("avocadoAddress", self.avocado_address.as_deref());
        let index = validator.index("index", self.index.as_deref());

        let (Some(destination), Some(token), Some(eoa), Some(amount), Some(wallet), Some(index)) =
            (destination, token, eoa, amount, wallet, index)
        else {
            validator.finish()?;
            return Err(ValidationError::new("invalid request"));
        };
        Ok(SourcingRequest { destination, token, eoa, amount, wallet, index })
    }
}

/// `GET /estimate-sourcing-routes/{chainId}/{token}`
pub async fn estimate_sourcing_routes(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<SourcingRoutesQuery>, QueryRejection>,
) -> Result<Json<SourcingPlan>, RouterError> {
    let Path((chain_id, token)) = path.map_err(|err| ValidationError::new(err.body_text()))?;
    let Query(query) = query.map_err(|err| ValidationError::new(err.body_text()))?;
    let request = query.into_request(state.orchestrator.chains(), &chain_id, &token)?;

    Ok(Json(state.orchestrator.find_routes(request).await?))
}

/// `POST /estimate-fees-with-actions`
///
/// Responds with `204` if the chain could not be quoted.
pub async fn estimate_fees_with_actions(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EstimateWithActionsBody>, JsonRejection>,
) -> Result<Response, RouterError> {
    let Json(body) = body.map_err(|err| ValidationError::new(err.body_text()))?;

    let mut validator = Validator::default();
    let chain_id = validator.chain_id(state.orchestrator.chains(), &body.chain_id.to_string());
    let eoa = validator.address("eoaAddress", Some(&body.eoa_address));
    let wallet = validator.optional_address("avocadoAddress", body.avocado_address.as_deref());
    let index = validator.index("avocadoWalletIndex", body.avocado_wallet_index.as_deref());
    let (Some(chain_id), Some(eoa), Some(wallet), Some(index)) = (chain_id, eoa, wallet, index)
    else {
        validator.finish()?;
        return Err(ValidationError::new("invalid request").into());
    };
    let Some(chain) = state.orchestrator.chains().get(chain_id) else {
        return Err(RouterError::UnsupportedChain(chain_id));
    };

    let wallet = match wallet {
        Some(wallet) => wallet,
        None => state
            .orchestrator
            .resolver()
            .compute(eoa, index)
            .await
            .map_err(|err| SourcingError::WalletAddressUnavailable(err.to_string()))?,
    };

    let request = EstimationRequest {
        wallet,
        eoa,
        index,
        actions: body.actions,
        action_id: body.id.unwrap_or_default(),
        mode: MetadataMode::Strict,
    };
    match state.orchestrator.estimation().estimate(chain, request).await {
        Ok(quote) => Ok(Json::<FeeQuote>(quote).into_response()),
        Err(err) if err.is_hard() => Err(err.into()),
        Err(err) => {
            debug!(chain_id, %err, "Estimation failed");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}
