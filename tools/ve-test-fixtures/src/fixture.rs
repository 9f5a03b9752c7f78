use alloy_primitives::{Address, U256};
use thiserror::Error;
use tracing::info;
use ve_deploy_config::{resolve, FixtureOverrides, Network};

use crate::deployer::{ConstructorArg, ContractDeployer};

pub const MOCK_TOKEN_ARTIFACT: &str = "MockERC20";
pub const ESCROW_ARTIFACT: &str = "VotingEscrow";

pub const MOCK_TOKEN_NAME: &str = "Mock Token";
pub const MOCK_TOKEN_SYMBOL: &str = "MOCK";
pub const MOCK_TOKEN_DECIMALS: u8 = 18;

pub const ONE_YEAR_IN_SECS: u64 = 365 * 24 * 60 * 60;

/// `whole * 10^18`.
pub fn ether(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(MOCK_TOKEN_DECIMALS))
}

/// Supply minted to the deployer.
pub fn mock_token_supply() -> U256 {
    ether(1_000_000_000)
}

/// Tokens sent to each test user.
pub fn user_funding() -> U256 {
    ether(1_000)
}

/// Amount tests lock by default.
pub fn lock_amount() -> U256 {
    ether(100)
}

#[derive(Debug, Error)]
pub enum FixtureError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Deployer(#[from] E),
    #[error("escrow fixture needs 4 signers, deployer exposes {0}")]
    NotEnoughSigners(usize),
    #[error("unlock time overflows: latest block timestamp is {0}")]
    TimestampOverflow(u64),
}

/// Accounts used by the fixture. `deployer` owns the mock supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixtureSigners {
    pub deployer: Address,
    pub user1: Address,
    pub user2: Address,
    pub user3: Address,
}

impl FixtureSigners {
    pub fn from_accounts(accounts: &[Address]) -> Option<Self> {
        match accounts {
            [deployer, user1, user2, user3, ..] => Some(Self {
                deployer: *deployer,
                user1: *user1,
                user2: *user2,
                user3: *user3,
            }),
            _ => None,
        }
    }

    pub fn users(&self) -> [Address; 3] {
        [self.user1, self.user2, self.user3]
    }
}

/// Handles returned to test bodies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowFixture {
    pub token: Address,
    pub escrow: Address,
    pub unlock_time: u64,
    pub lock_amount: U256,
    pub duration: u64,
    pub deployer: Address,
    pub user1: Address,
    pub user2: Address,
    pub user3: Address,
}

/// Deploy the mock token and the escrow, approve the escrow for every signer, fund the users.
///
/// Falls back to the deployer's first four signers when `signers` is `None`. The first failing
/// call aborts the setup and its error is returned unchanged.
pub async fn deploy_escrow_fixture<D: ContractDeployer>(
    deployer: &D,
    signers: Option<FixtureSigners>,
) -> Result<EscrowFixture, FixtureError<D::Error>> {
    let signers = match signers {
        Some(s) => s,
        None => {
            let accounts = deployer.signers().await?;
            FixtureSigners::from_accounts(&accounts)
                .ok_or(FixtureError::NotEnoughSigners(accounts.len()))?
        }
    };
    let owner = signers.deployer;

    let token = deployer
        .deploy(
            owner,
            MOCK_TOKEN_ARTIFACT,
            vec![
                ConstructorArg::Str(MOCK_TOKEN_NAME.to_string()),
                ConstructorArg::Str(MOCK_TOKEN_SYMBOL.to_string()),
                ConstructorArg::Uint8(MOCK_TOKEN_DECIMALS),
                ConstructorArg::Uint(mock_token_supply()),
            ],
        )
        .await?;
    info!(%token, "deployed mock lock token");

    let mut overrides = FixtureOverrides::default();
    overrides.contracts.lock_token = Some(token);
    let vars = resolve(Network::Hardhat, &overrides);

    let escrow = deployer
        .deploy(
            owner,
            ESCROW_ARTIFACT,
            vec![
                ConstructorArg::Address(vars.lock_token.existing().unwrap_or(token)),
                ConstructorArg::Str(vars.token_name),
                ConstructorArg::Str(vars.token_symbol),
                ConstructorArg::Str(vars.version),
            ],
        )
        .await?;
    info!(%escrow, "deployed escrow");

    let [user1, user2, user3] = signers.users();
    tokio::try_join!(
        deployer.approve(token, owner, escrow, U256::MAX),
        deployer.approve(token, user1, escrow, U256::MAX),
        deployer.approve(token, user2, escrow, U256::MAX),
        deployer.approve(token, user3, escrow, U256::MAX),
    )?;

    let funding = user_funding();
    tokio::try_join!(
        deployer.transfer(token, owner, user1, funding),
        deployer.transfer(token, owner, user2, funding),
        deployer.transfer(token, owner, user3, funding),
    )?;
    info!(%funding, "funded test users");

    let latest = deployer.latest_timestamp().await?;
    let unlock_time = latest
        .checked_add(ONE_YEAR_IN_SECS)
        .ok_or(FixtureError::TimestampOverflow(latest))?;

    Ok(EscrowFixture {
        token,
        escrow,
        unlock_time,
        lock_amount: lock_amount(),
        duration: ONE_YEAR_IN_SECS,
        deployer: owner,
        user1,
        user2,
        user3,
    })
}
