//! In-memory [`ContractDeployer`] for off-chain tests.
//!
//! Contracts get CREATE addresses derived from the sender nonce. Only `MockERC20` has behaviour
//! (balances and allowances); any other artifact is recorded with its constructor arguments.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;

use crate::{
    deployer::{ConstructorArg, ContractDeployer},
    fixture::MOCK_TOKEN_ARTIFACT,
};

/// Arbitrary but fixed genesis time so fixture timestamps are reproducible.
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MockChainError {
    #[error("deployment of `{0}` failed (injected)")]
    InjectedFailure(String),
    #[error("bad constructor arguments for `{artifact}`: {reason}")]
    BadConstructorArgs { artifact: String, reason: String },
    #[error("approve from {0} rejected (injected)")]
    ApproveRejected(Address),
    #[error("transfer to {0} rejected (injected)")]
    TransferRejected(Address),
    #[error("{0} is not a deployed token")]
    NotAToken(Address),
    #[error("{account} holds {balance}, cannot send {amount}")]
    InsufficientBalance {
        account: Address,
        balance: U256,
        amount: U256,
    },
}

#[derive(Clone, Debug)]
struct Deployment {
    artifact: String,
    args: Vec<ConstructorArg>,
}

#[derive(Debug, Default)]
struct TokenLedger {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

#[derive(Debug)]
struct ChainState {
    nonces: HashMap<Address, u64>,
    deployments: HashMap<Address, Deployment>,
    tokens: HashMap<Address, TokenLedger>,
    timestamp: u64,
    timestamp_reads: usize,
    failing_artifacts: HashSet<String>,
    failing_approvals: HashSet<Address>,
    failing_transfers: HashSet<Address>,
}

pub struct MockChain {
    signers: Vec<Address>,
    state: Mutex<ChainState>,
}

impl MockChain {
    /// Chain with `signer_count` accounts `0x..01`, `0x..02`, ...
    pub fn new(signer_count: u8) -> Self {
        let signers = (1..=signer_count).map(Address::with_last_byte).collect();
        Self::with_signers(signers)
    }

    pub fn with_signers(signers: Vec<Address>) -> Self {
        Self {
            signers,
            state: Mutex::new(ChainState {
                nonces: HashMap::new(),
                deployments: HashMap::new(),
                tokens: HashMap::new(),
                timestamp: GENESIS_TIMESTAMP,
                timestamp_reads: 0,
                failing_artifacts: HashSet::new(),
                failing_approvals: HashSet::new(),
                failing_transfers: HashSet::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        // Every mutation completes under a single lock, so a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every later deployment of `artifact` fail.
    pub fn fail_deploy(&self, artifact: &str) {
        self.state().failing_artifacts.insert(artifact.to_string());
    }

    /// Make every later approval signed by `owner` fail.
    pub fn fail_approve(&self, owner: Address) {
        self.state().failing_approvals.insert(owner);
    }

    /// Make every later transfer paying `to` fail.
    pub fn fail_transfer(&self, to: Address) {
        self.state().failing_transfers.insert(to);
    }

    pub fn advance_time(&self, secs: u64) {
        let mut state = self.state();
        state.timestamp = state.timestamp.saturating_add(secs);
    }

    /// How many times `latest_timestamp` has been queried.
    pub fn timestamp_reads(&self) -> usize {
        self.state().timestamp_reads
    }

    pub fn balance_of(&self, token: Address, account: Address) -> U256 {
        self.state()
            .tokens
            .get(&token)
            .and_then(|t| t.balances.get(&account).copied())
            .unwrap_or(U256::ZERO)
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state()
            .tokens
            .get(&token)
            .and_then(|t| t.allowances.get(&(owner, spender)).copied())
            .unwrap_or(U256::ZERO)
    }

    pub fn deployed_artifact(&self, address: Address) -> Option<String> {
        self.state()
            .deployments
            .get(&address)
            .map(|d| d.artifact.clone())
    }

    pub fn constructor_args(&self, address: Address) -> Option<Vec<ConstructorArg>> {
        self.state()
            .deployments
            .get(&address)
            .map(|d| d.args.clone())
    }

    pub fn deployment_count(&self) -> usize {
        self.state().deployments.len()
    }
}

/// `MockERC20(name, symbol, decimals, supply)`; returns the supply.
fn mock_token_supply(args: &[ConstructorArg]) -> Result<U256, MockChainError> {
    match args {
        [ConstructorArg::Str(_), ConstructorArg::Str(_), ConstructorArg::Uint8(_), ConstructorArg::Uint(supply)] => {
            Ok(*supply)
        }
        _ => Err(MockChainError::BadConstructorArgs {
            artifact: MOCK_TOKEN_ARTIFACT.to_string(),
            reason: "expected (string name, string symbol, uint8 decimals, uint256 supply)"
                .to_string(),
        }),
    }
}

#[async_trait]
impl ContractDeployer for MockChain {
    type Error = MockChainError;

    async fn signers(&self) -> Result<Vec<Address>, Self::Error> {
        Ok(self.signers.clone())
    }

    async fn deploy(
        &self,
        from: Address,
        artifact: &str,
        args: Vec<ConstructorArg>,
    ) -> Result<Address, Self::Error> {
        let mut state = self.state();
        if state.failing_artifacts.contains(artifact) {
            return Err(MockChainError::InjectedFailure(artifact.to_string()));
        }

        let supply = if artifact == MOCK_TOKEN_ARTIFACT {
            Some(mock_token_supply(&args)?)
        } else {
            None
        };

        let nonce = state.nonces.entry(from).or_insert(0);
        let address = from.create(*nonce);
        *nonce += 1;

        if let Some(supply) = supply {
            let mut ledger = TokenLedger::default();
            ledger.balances.insert(from, supply);
            state.tokens.insert(address, ledger);
        }
        state.deployments.insert(
            address,
            Deployment {
                artifact: artifact.to_string(),
                args,
            },
        );
        Ok(address)
    }

    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), Self::Error> {
        let mut state = self.state();
        if state.failing_approvals.contains(&owner) {
            return Err(MockChainError::ApproveRejected(owner));
        }
        let ledger = state
            .tokens
            .get_mut(&token)
            .ok_or(MockChainError::NotAToken(token))?;
        ledger.allowances.insert((owner, spender), amount);
        Ok(())
    }

    async fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Self::Error> {
        let mut state = self.state();
        if state.failing_transfers.contains(&to) {
            return Err(MockChainError::TransferRejected(to));
        }
        let ledger = state
            .tokens
            .get_mut(&token)
            .ok_or(MockChainError::NotAToken(token))?;

        let balance = ledger.balances.get(&from).copied().unwrap_or(U256::ZERO);
        if balance < amount {
            return Err(MockChainError::InsufficientBalance {
                account: from,
                balance,
                amount,
            });
        }
        ledger.balances.insert(from, balance - amount);
        *ledger.balances.entry(to).or_insert(U256::ZERO) += amount;
        Ok(())
    }

    async fn latest_timestamp(&self) -> Result<u64, Self::Error> {
        let mut state = self.state();
        state.timestamp_reads += 1;
        Ok(state.timestamp)
    }
}
