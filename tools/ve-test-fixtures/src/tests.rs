use alloy_primitives::{Address, U256};
use ve_deploy_config::resolver::{TOKEN_NAME, TOKEN_SYMBOL, TOKEN_VERSION};

use crate::{
    deploy_escrow_fixture,
    fixture::{ether, mock_token_supply, user_funding, ESCROW_ARTIFACT, ONE_YEAR_IN_SECS},
    mock::GENESIS_TIMESTAMP,
    ConstructorArg, ContractDeployer, FixtureError, FixtureSigners, MockChain, MockChainError,
};

#[tokio::test]
async fn test_users_are_funded_and_approved() {
    let chain = MockChain::new(4);
    let fx = deploy_escrow_fixture(&chain, None).await.unwrap();

    let expected = U256::from(1_000_000_000_000_000_000_000u128);
    assert_eq!(user_funding(), expected);
    for user in [fx.user1, fx.user2, fx.user3] {
        assert_eq!(chain.balance_of(fx.token, user), expected);
        assert_eq!(chain.allowance(fx.token, user, fx.escrow), U256::MAX);
    }
    assert_eq!(chain.allowance(fx.token, fx.deployer, fx.escrow), U256::MAX);
    assert_eq!(
        chain.balance_of(fx.token, fx.deployer),
        mock_token_supply() - expected * U256::from(3u64)
    );
}

#[tokio::test]
async fn test_fixture_constants() {
    let chain = MockChain::new(4);
    chain.advance_time(42);
    let fx = deploy_escrow_fixture(&chain, None).await.unwrap();

    assert_eq!(fx.duration, 31_536_000);
    assert_eq!(fx.duration, ONE_YEAR_IN_SECS);
    assert_eq!(fx.lock_amount, ether(100));
    assert_eq!(fx.unlock_time, GENESIS_TIMESTAMP + 42 + ONE_YEAR_IN_SECS);
}

#[tokio::test]
async fn test_escrow_is_wired_to_mock_token() {
    let chain = MockChain::new(4);
    let fx = deploy_escrow_fixture(&chain, None).await.unwrap();

    assert_eq!(chain.deployed_artifact(fx.token).as_deref(), Some("MockERC20"));
    assert_eq!(chain.deployed_artifact(fx.escrow).as_deref(), Some(ESCROW_ARTIFACT));
    assert_eq!(
        chain.constructor_args(fx.escrow).unwrap(),
        vec![
            ConstructorArg::Address(fx.token),
            ConstructorArg::Str(TOKEN_NAME.to_string()),
            ConstructorArg::Str(TOKEN_SYMBOL.to_string()),
            ConstructorArg::Str(TOKEN_VERSION.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_default_signers_are_first_four() {
    let chain = MockChain::new(6);
    let fx = deploy_escrow_fixture(&chain, None).await.unwrap();
    assert_eq!(fx.deployer, Address::with_last_byte(1));
    assert_eq!(fx.user1, Address::with_last_byte(2));
    assert_eq!(fx.user2, Address::with_last_byte(3));
    assert_eq!(fx.user3, Address::with_last_byte(4));
}

#[tokio::test]
async fn test_supplied_signers_take_precedence() {
    let chain = MockChain::new(4);
    let signers = FixtureSigners {
        deployer: Address::with_last_byte(0xd0),
        user1: Address::with_last_byte(0xa1),
        user2: Address::with_last_byte(0xa2),
        user3: Address::with_last_byte(0xa3),
    };
    let fx = deploy_escrow_fixture(&chain, Some(signers)).await.unwrap();

    assert_eq!(fx.deployer, signers.deployer);
    for user in signers.users() {
        assert_eq!(chain.balance_of(fx.token, user), user_funding());
    }
    assert_eq!(chain.balance_of(fx.token, Address::with_last_byte(2)), U256::ZERO);
}

#[tokio::test]
async fn test_not_enough_signers() {
    let chain = MockChain::new(3);
    let err = deploy_escrow_fixture(&chain, None).await.unwrap_err();
    assert!(matches!(err, FixtureError::NotEnoughSigners(3)));
    assert_eq!(chain.deployment_count(), 0);
}

#[tokio::test]
async fn test_deploy_failure_propagates_and_aborts() {
    let chain = MockChain::new(4);
    chain.fail_deploy(ESCROW_ARTIFACT);

    let err = deploy_escrow_fixture(&chain, None).await.unwrap_err();
    match err {
        FixtureError::Deployer(e) => {
            assert_eq!(e, MockChainError::InjectedFailure(ESCROW_ARTIFACT.to_string()))
        }
        other => panic!("unexpected error: {other}"),
    }
    // Only the token made it on chain, and nobody was funded.
    assert_eq!(chain.deployment_count(), 1);
    let token = Address::with_last_byte(1).create(0);
    assert_eq!(chain.balance_of(token, Address::with_last_byte(2)), U256::ZERO);
    assert_eq!(chain.balance_of(token, Address::with_last_byte(1)), mock_token_supply());
}

#[tokio::test]
async fn test_error_message_is_the_deployers() {
    let chain = MockChain::new(4);
    chain.fail_deploy("MockERC20");
    let err = deploy_escrow_fixture(&chain, None).await.unwrap_err();
    assert_eq!(err.to_string(), "deployment of `MockERC20` failed (injected)");
}

#[tokio::test]
async fn test_mock_chain_rejects_overdraft() {
    let chain = MockChain::new(2);
    let [a, b] = [Address::with_last_byte(1), Address::with_last_byte(2)];
    let token = chain
        .deploy(
            a,
            "MockERC20",
            vec![
                ConstructorArg::Str("T".into()),
                ConstructorArg::Str("T".into()),
                ConstructorArg::Uint8(18),
                ConstructorArg::Uint(U256::from(10u64)),
            ],
        )
        .await
        .unwrap();

    chain.transfer(token, a, b, U256::from(4u64)).await.unwrap();
    let err = chain.transfer(token, b, a, U256::from(5u64)).await.unwrap_err();
    assert!(matches!(err, MockChainError::InsufficientBalance { .. }));
    assert_eq!(chain.balance_of(token, a), U256::from(6u64));
    assert_eq!(chain.balance_of(token, b), U256::from(4u64));
}

#[tokio::test]
async fn test_mock_chain_create_addresses() {
    let chain = MockChain::new(1);
    let from = Address::with_last_byte(1);
    let first = chain.deploy(from, "Other", vec![]).await.unwrap();
    let second = chain.deploy(from, "Other", vec![]).await.unwrap();
    assert_eq!(first, from.create(0));
    assert_eq!(second, from.create(1));
    assert!(chain
        .approve(first, from, second, U256::from(1u64))
        .await
        .is_err());
}

#[tokio::test]
async fn test_mock_token_args_are_checked() {
    let chain = MockChain::new(1);
    let err = chain
        .deploy(Address::with_last_byte(1), "MockERC20", vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, MockChainError::BadConstructorArgs { .. }));
}

#[tokio::test]
async fn test_failed_approval_stops_setup() {
    let chain = MockChain::new(4);
    let signers = FixtureSigners::from_accounts(&chain.signers().await.unwrap()).unwrap();
    chain.fail_approve(signers.user1);

    let err = deploy_escrow_fixture(&chain, Some(signers)).await.unwrap_err();
    let FixtureError::Deployer(inner) = err else {
        panic!("expected a deployer error");
    };
    assert_eq!(inner, MockChainError::ApproveRejected(signers.user1));

    let token = signers.deployer.create(0);
    for user in signers.users() {
        assert_eq!(chain.balance_of(token, user), U256::ZERO);
    }
    assert_eq!(chain.balance_of(token, signers.deployer), mock_token_supply());
    assert_eq!(chain.timestamp_reads(), 0);
}

#[tokio::test]
async fn test_failed_transfer_stops_setup() {
    let chain = MockChain::new(4);
    let signers = FixtureSigners::from_accounts(&chain.signers().await.unwrap()).unwrap();
    chain.fail_transfer(signers.user2);

    let err = deploy_escrow_fixture(&chain, Some(signers)).await.unwrap_err();
    let FixtureError::Deployer(inner) = err else {
        panic!("expected a deployer error");
    };
    assert_eq!(inner, MockChainError::TransferRejected(signers.user2));

    let token = signers.deployer.create(0);
    assert_eq!(chain.balance_of(token, signers.user2), U256::ZERO);
    assert_eq!(chain.balance_of(token, signers.user3), U256::ZERO);
    assert_eq!(chain.timestamp_reads(), 0);
}

#[tokio::test]
async fn test_unlock_time_overflow_is_an_error() {
    let chain = MockChain::new(4);
    chain.advance_time(u64::MAX);

    let err = deploy_escrow_fixture(&chain, None).await.unwrap_err();
    assert!(matches!(err, FixtureError::TimestampOverflow(u64::MAX)));
    assert_eq!(chain.timestamp_reads(), 1);
}
