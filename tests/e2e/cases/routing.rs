use crate::e2e::{EOA, Environment, EnvironmentConfig, GWEI, MockChain, WALLET};
use alloy::primitives::{Address, ChainId};
use route_finder::{
    error::{RouterError, SourcingError},
    routing::SourcingRequest,
    types::TokenSymbol,
};
use rust_decimal::Decimal;
use std::time::Duration;

fn request(destination: ChainId, amount: u64) -> SourcingRequest {
    SourcingRequest {
        destination,
        token: TokenSymbol::USDC,
        eoa: EOA,
        amount: Decimal::from(amount),
        wallet: None,
        index: 0,
    }
}

fn amounts(plan: &route_finder::types::SourcingPlan) -> Vec<(ChainId, Decimal)> {
    plan.entries().iter().map(|entry| (entry.chain_id, entry.amount_sourced)).collect()
}

#[tokio::test]
async fn cheaper_chains_beat_a_single_expensive_one() -> eyre::Result<()> {
    let env = Environment::setup(vec![
        MockChain::eip1559(1, 1_000 * GWEI, GWEI).with_balance(100),
        MockChain::legacy(10, 2 * GWEI).with_balance(50),
        MockChain::legacy(137, GWEI).with_balance(60),
        MockChain::legacy(42161, GWEI),
    ]);

    let plan = env.orchestrator.find_routes(request(42161, 100)).await?;

    // drawn in chain order, listed by fee
    assert_eq!(amounts(&plan), [(137, Decimal::from(50)), (10, Decimal::from(50))]);
    assert_eq!(plan.total_sourced(), Decimal::from(100));
    assert!(plan.entries()[0].fee_amount < plan.entries()[1].fee_amount);
    assert_eq!(plan.entries()[0].chain_name, "Chain 137");

    Ok(())
}

#[tokio::test]
async fn single_chain_covers_the_amount() -> eyre::Result<()> {
    let env = Environment::setup(vec![
        MockChain::legacy(10, 50 * GWEI).with_balance(500),
        MockChain::legacy(137, GWEI).with_balance(30),
        MockChain::legacy(42161, GWEI),
    ]);

    let plan = env.orchestrator.find_routes(request(42161, 20)).await?;
    assert_eq!(amounts(&plan), [(137, Decimal::from(20))]);

    Ok(())
}

#[tokio::test]
async fn destination_is_not_a_source() -> eyre::Result<()> {
    let env = Environment::setup(vec![
        MockChain::legacy(10, GWEI).with_balance(10),
        MockChain::legacy(137, GWEI).with_balance(1_000),
    ]);

    let err = env.orchestrator.find_routes(request(137, 100)).await.unwrap_err();
    assert!(matches!(
        err,
        RouterError::Sourcing(SourcingError::InsufficientBalance { required, available })
            if required == Decimal::from(100) && available == Decimal::from(10)
    ));

    Ok(())
}

#[tokio::test]
async fn explicit_wallet_skips_resolution() -> eyre::Result<()> {
    let env = Environment::setup(vec![
        MockChain::legacy(10, GWEI).with_balance(10),
        MockChain::legacy(137, GWEI),
    ]);

    let other = SourcingRequest { wallet: Some(Address::repeat_byte(0x33)), ..request(137, 5) };
    // the mocks only hold balances for the derived wallet
    let err = env.orchestrator.find_routes(other).await.unwrap_err();
    assert!(matches!(err, RouterError::Sourcing(SourcingError::InsufficientBalance { .. })));

    let derived = SourcingRequest { wallet: Some(WALLET), ..request(137, 5) };
    assert_eq!(amounts(&env.orchestrator.find_routes(derived).await?), [(10, Decimal::from(5))]);

    Ok(())
}

#[tokio::test]
async fn unresolvable_wallet() {
    let env = Environment::setup(vec![MockChain::legacy(10, GWEI), MockChain::legacy(137, GWEI)]);

    let request = SourcingRequest { eoa: Address::repeat_byte(0x44), ..request(137, 5) };
    let err = env.orchestrator.find_routes(request).await.unwrap_err();
    assert!(matches!(err, RouterError::Sourcing(SourcingError::WalletAddressUnavailable(_))));
}

#[tokio::test]
async fn unsupported_destination() {
    let env = Environment::setup(vec![MockChain::legacy(137, GWEI)]);
    let err = env.orchestrator.find_routes(request(56, 5)).await.unwrap_err();
    assert!(matches!(err, RouterError::UnsupportedChain(56)));
}

#[tokio::test]
async fn failed_chains_are_excluded() -> eyre::Result<()> {
    let env = Environment::setup(vec![
        MockChain { balance: None, ..MockChain::legacy(1, GWEI) },
        MockChain::legacy(10, GWEI).with_balance(40),
        MockChain::legacy(137, GWEI),
    ]);

    let plan = env.orchestrator.find_routes(request(137, 40)).await?;
    assert_eq!(amounts(&plan), [(10, Decimal::from(40))]);

    Ok(())
}

#[tokio::test]
async fn unquoted_balances_are_not_used() {
    let env = Environment::setup(vec![
        MockChain { simulation: None, ..MockChain::legacy(10, GWEI).with_balance(40) },
        MockChain::legacy(137, GWEI),
    ]);

    let err = env.orchestrator.find_routes(request(137, 40)).await.unwrap_err();
    assert!(matches!(err, RouterError::Sourcing(SourcingError::QuotesUnavailable)));
}

#[tokio::test]
async fn all_chains_unavailable() {
    let env = Environment::setup(vec![
        MockChain { balance: None, ..MockChain::legacy(1, GWEI) },
        MockChain { balance: None, ..MockChain::legacy(10, GWEI) },
        MockChain::legacy(137, GWEI),
    ]);

    let err = env.orchestrator.find_routes(request(137, 40)).await.unwrap_err();
    assert!(matches!(err, RouterError::Sourcing(SourcingError::AllChainsUnavailable)));
}

#[tokio::test]
async fn chains_without_the_token_are_skipped() -> eyre::Result<()> {
    let env = Environment::setup(vec![
        MockChain { supports_usdc: false, ..MockChain::legacy(1, GWEI) },
        MockChain::legacy(10, GWEI).with_balance(40),
        MockChain::legacy(137, GWEI),
    ]);

    let plan = env.orchestrator.find_routes(request(137, 40)).await?;
    assert_eq!(amounts(&plan), [(10, Decimal::from(40))]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn slow_chains_time_out() -> eyre::Result<()> {
    let env = Environment::setup_with_config(
        vec![
            MockChain::legacy(1, GWEI).with_balance(100).with_delay(Duration::from_secs(60)),
            MockChain::legacy(10, 10 * GWEI).with_balance(100),
            MockChain::legacy(137, GWEI),
        ],
        EnvironmentConfig { chain_timeout: Duration::from_secs(5), ..Default::default() },
    );

    // the resolution chain is the slow one, so pass the wallet
    let request = SourcingRequest { wallet: Some(WALLET), ..request(137, 40) };
    let plan = env.orchestrator.find_routes(request).await?;
    assert_eq!(amounts(&plan), [(10, Decimal::from(40))]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn slow_quotes_keep_the_balance() {
    let env = Environment::setup_with_config(
        vec![
            MockChain {
                simulation_delay: Duration::from_secs(60),
                ..MockChain::legacy(10, GWEI).with_balance(40)
            },
            MockChain::legacy(137, GWEI),
        ],
        EnvironmentConfig { chain_timeout: Duration::from_secs(5), ..Default::default() },
    );

    // the balance arrived in time, only the quote is missing
    let err = env.orchestrator.find_routes(request(137, 40)).await.unwrap_err();
    assert!(matches!(err, RouterError::Sourcing(SourcingError::QuotesUnavailable)));
}
