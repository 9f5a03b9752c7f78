use alloy_primitives::{Address, U256};
use async_trait::async_trait;

/// Constructor argument passed to [`ContractDeployer::deploy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructorArg {
    Address(Address),
    Uint(U256),
    Uint8(u8),
    Str(String),
}

/// Contract deployment capability, implemented by a chain client or by [`crate::MockChain`].
///
/// Errors are returned as-is to the fixture caller; implementations own any timeouts.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Unlocked accounts, deployer first.
    async fn signers(&self) -> Result<Vec<Address>, Self::Error>;

    /// Deploy `artifact` from `from` and return the new contract address.
    async fn deploy(
        &self,
        from: Address,
        artifact: &str,
        args: Vec<ConstructorArg>,
    ) -> Result<Address, Self::Error>;

    /// ERC-20 `approve`, sent by `owner`.
    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), Self::Error>;

    /// ERC-20 `transfer`, sent by `from`.
    async fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Self::Error>;

    /// Timestamp of the latest block.
    async fn latest_timestamp(&self) -> Result<u64, Self::Error>;
}
