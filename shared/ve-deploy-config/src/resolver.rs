//! Network defaults and the defaults-then-patch merge.

use alloy_primitives::{address, Address};
use tracing::debug;

use crate::{
    errors::ConfigError,
    network::Network,
    overrides::FixtureOverrides,
    schedule::MultiplierSchedule,
    variables::{AdminAccount, ContractSource, DeploymentVariables, NativeWrapper},
};

/// WBNB on BNB Smart Chain.
pub const BSC_WBNB: Address = address!("bb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c");
/// Lock token already deployed on BSC testnet.
pub const BSC_TESTNET_LOCK_TOKEN: Address = address!("edb8b85a779e872e2aeef39df96a7fcc7d5ea6af");

pub const TOKEN_NAME: &str = "Vote Escrowed Token";
pub const TOKEN_SYMBOL: &str = "veToken";
pub const TOKEN_VERSION: &str = "1";

/// Built-in record for `network`.
pub fn defaults(network: Network) -> DeploymentVariables {
    let (w_native, lock_token) = match network {
        Network::Bsc => (NativeWrapper::At(BSC_WBNB), ContractSource::Deploy),
        Network::BscTestnet => (
            NativeWrapper::Unset,
            ContractSource::Existing(BSC_TESTNET_LOCK_TOKEN),
        ),
        Network::Hardhat => (NativeWrapper::Unset, ContractSource::Deploy),
    };

    DeploymentVariables {
        admin_account: AdminAccount::Deployer,
        w_native,
        lock_token,
        escrow_implementation: ContractSource::Deploy,
        proxy_admin: ContractSource::Deploy,
        art_proxy: ContractSource::Deploy,
        token_name: TOKEN_NAME.to_string(),
        token_symbol: TOKEN_SYMBOL.to_string(),
        version: TOKEN_VERSION.to_string(),
        escrow_weight_lens: MultiplierSchedule::escrow_default(),
    }
}

/// Replace each field the patch sets; leave every other field as in `base`.
pub fn apply_overrides(
    base: DeploymentVariables,
    overrides: &FixtureOverrides,
) -> DeploymentVariables {
    let accounts = &overrides.accounts;
    let contracts = &overrides.contracts;
    let token = &overrides.token;

    let existing_or = |o: Option<Address>, default: ContractSource| {
        o.map(ContractSource::Existing).unwrap_or(default)
    };

    DeploymentVariables {
        admin_account: accounts
            .admin
            .map(AdminAccount::Address)
            .unwrap_or(base.admin_account),
        w_native: contracts
            .w_native
            .map(NativeWrapper::At)
            .unwrap_or(base.w_native),
        lock_token: existing_or(contracts.lock_token, base.lock_token),
        escrow_implementation: existing_or(
            contracts.escrow_implementation,
            base.escrow_implementation,
        ),
        proxy_admin: existing_or(contracts.proxy_admin, base.proxy_admin),
        art_proxy: existing_or(contracts.art_proxy, base.art_proxy),
        token_name: token.name.clone().unwrap_or(base.token_name),
        token_symbol: token.symbol.clone().unwrap_or(base.token_symbol),
        version: token.version.clone().unwrap_or(base.version),
        escrow_weight_lens: overrides
            .escrow_weight_lens
            .clone()
            .unwrap_or(base.escrow_weight_lens),
    }
}

pub fn resolve(network: Network, overrides: &FixtureOverrides) -> DeploymentVariables {
    debug!(
        network = %network,
        overridden = ?overrides.touched_fields(),
        "resolving deployment variables"
    );
    apply_overrides(defaults(network), overrides)
}

/// Resolve by network tag; fails without producing a record if the tag is not registered.
pub fn resolve_tag(
    tag: &str,
    overrides: &FixtureOverrides,
) -> Result<DeploymentVariables, ConfigError> {
    let network = Network::try_from(tag)?;
    Ok(resolve(network, overrides))
}
