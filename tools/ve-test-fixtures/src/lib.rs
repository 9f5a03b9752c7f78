//! Test fixtures for the voting escrow contracts.
//!
//! [`deploy_escrow_fixture`] deploys a mock lock token and the escrow through any
//! [`ContractDeployer`], then funds three test accounts. [`MockChain`] is an in-memory deployer
//! for running the fixture without a node.

pub mod deployer;
pub mod fixture;
pub mod mock;

pub use deployer::{ConstructorArg, ContractDeployer};
pub use fixture::{deploy_escrow_fixture, EscrowFixture, FixtureError, FixtureSigners};
pub use mock::{MockChain, MockChainError};

#[cfg(test)]
mod tests;
