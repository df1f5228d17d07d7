use crate::e2e::{Environment, GWEI, MockChain, WALLET};
use alloy::primitives::{Bytes, U256};
use route_finder::{
    error::EstimationError,
    types::{Nonce, WalletMetadata},
    wallet::MetadataMode,
};
use std::sync::atomic::Ordering;

fn failing_reads() -> MockChain {
    MockChain { required_signers: None, nonce: None, ..MockChain::legacy(137, GWEI) }
}

#[tokio::test]
async fn live_metadata() -> eyre::Result<()> {
    let env = Environment::setup(vec![MockChain {
        required_signers: Some(3),
        nonce: Some(U256::from(42)),
        ..MockChain::legacy(137, GWEI)
    }]);

    let metadata = env.metadata.metadata(env.chain(137), WALLET, MetadataMode::Strict).await?;
    assert_eq!(metadata.required_signers, 3);
    assert_eq!(metadata.next_nonce, Nonce::Sequential(U256::from(42)));

    Ok(())
}

#[tokio::test]
async fn zero_signers_reads_as_one() -> eyre::Result<()> {
    let env = Environment::setup(vec![MockChain {
        required_signers: Some(0),
        ..MockChain::legacy(137, GWEI)
    }]);

    let metadata = env.metadata.metadata(env.chain(137), WALLET, MetadataMode::Soft).await?;
    assert_eq!(metadata.required_signers, 1);

    Ok(())
}

#[tokio::test]
async fn reads_are_cached() -> eyre::Result<()> {
    let env = Environment::setup(vec![MockChain {
        required_signers: Some(2),
        ..MockChain::legacy(137, GWEI)
    }]);
    let chain = env.chain(137);

    for _ in 0..3 {
        let metadata = env.metadata.metadata(chain, WALLET, MetadataMode::Soft).await?;
        assert_eq!(metadata.required_signers, 2);
    }
    assert_eq!(env.mock(137).required_signers_reads.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn soft_mode_falls_back() -> eyre::Result<()> {
    let env = Environment::setup(vec![MockChain {
        code: Bytes::from_static(&[0x60, 0x80]),
        ..failing_reads()
    }]);

    let metadata = env.metadata.metadata(env.chain(137), WALLET, MetadataMode::Soft).await?;
    assert_eq!(metadata, WalletMetadata::default());

    Ok(())
}

#[tokio::test]
async fn strict_mode_accepts_undeployed_wallets() -> eyre::Result<()> {
    let env = Environment::setup(vec![failing_reads()]);

    let metadata = env.metadata.metadata(env.chain(137), WALLET, MetadataMode::Strict).await?;
    assert_eq!(metadata, WalletMetadata::default());

    Ok(())
}

#[tokio::test]
async fn strict_mode_rejects_deployed_wallets() {
    let env = Environment::setup(vec![MockChain {
        code: Bytes::from_static(&[0x60, 0x80]),
        ..failing_reads()
    }]);

    let err =
        env.metadata.metadata(env.chain(137), WALLET, MetadataMode::Strict).await.unwrap_err();
    assert!(matches!(err, EstimationError::MetadataUnavailable { chain_id: 137, .. }));
    assert!(err.is_hard());
}

#[tokio::test]
async fn failed_reads_on_deployed_wallets_are_not_cached() {
    let env = Environment::setup(vec![MockChain {
        code: Bytes::from_static(&[0x60, 0x80]),
        ..failing_reads()
    }]);
    let chain = env.chain(137);

    // a soft read must not leave a fallback behind for a later strict read
    let soft = env.metadata.metadata(chain, WALLET, MetadataMode::Soft).await.unwrap();
    assert_eq!(soft, WalletMetadata::default());

    for _ in 0..2 {
        let err = env.metadata.metadata(chain, WALLET, MetadataMode::Strict).await.unwrap_err();
        assert!(matches!(err, EstimationError::MetadataUnavailable { chain_id: 137, .. }));
    }
    assert_eq!(env.mock(137).required_signers_reads.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn undeployed_fallback_is_cached() -> eyre::Result<()> {
    let env = Environment::setup(vec![failing_reads()]);
    let chain = env.chain(137);

    for _ in 0..2 {
        let metadata = env.metadata.metadata(chain, WALLET, MetadataMode::Strict).await?;
        assert_eq!(metadata, WalletMetadata::default());
    }
    assert_eq!(env.mock(137).required_signers_reads.load(Ordering::SeqCst), 1);

    Ok(())
}
