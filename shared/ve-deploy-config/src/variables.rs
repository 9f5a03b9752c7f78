use std::{fmt, str::FromStr};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{errors::ConfigError, schedule::MultiplierSchedule};

/// Resolved deployment parameters for one network.
///
/// Field names are read by the deploy scripts; renaming one is a breaking change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentVariables {
    pub admin_account: AdminAccount,
    pub w_native: NativeWrapper,
    pub lock_token: ContractSource,
    pub escrow_implementation: ContractSource,
    pub proxy_admin: ContractSource,
    pub art_proxy: ContractSource,
    pub token_name: String,
    pub token_symbol: String,
    pub version: String,
    pub escrow_weight_lens: MultiplierSchedule,
}

/// Account that receives admin rights on the escrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AdminAccount {
    /// Whichever signer runs the deployment.
    Deployer,
    Address(Address),
}

/// Wrapped native token (eg. WBNB); `Unset` is written as `0x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum NativeWrapper {
    Unset,
    At(Address),
}

/// Where a dependency contract comes from: a fresh deployment, or an existing address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ContractSource {
    Deploy,
    Existing(Address),
}

const DEPLOYER: &str = "deployer";
const UNSET: &str = "0x";
const DEPLOY: &str = "deploy";

/// Parse a `0x`-prefixed 20-byte hex address. Checksums are not enforced.
pub fn parse_address(s: &str) -> Result<Address, ConfigError> {
    let s = s.trim();
    if !s.starts_with("0x") || s.len() != 42 {
        return Err(ConfigError::InvalidAddress(s.to_string()));
    }
    Address::from_str(s).map_err(|_| ConfigError::InvalidAddress(s.to_string()))
}

/// Like [`parse_address`], but `""`, whitespace and `0x` mean "not set".
pub fn parse_address_override(s: &str) -> Result<Option<Address>, ConfigError> {
    match s.trim() {
        "" | UNSET => Ok(None),
        s => parse_address(s).map(Some),
    }
}

/// Lowercase `0x` hex, the form the deploy scripts compare against.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

impl fmt::Display for AdminAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminAccount::Deployer => f.write_str(DEPLOYER),
            AdminAccount::Address(a) => f.write_str(&format_address(a)),
        }
    }
}

impl fmt::Display for NativeWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeWrapper::Unset => f.write_str(UNSET),
            NativeWrapper::At(a) => f.write_str(&format_address(a)),
        }
    }
}

impl fmt::Display for ContractSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractSource::Deploy => f.write_str(DEPLOY),
            ContractSource::Existing(a) => f.write_str(&format_address(a)),
        }
    }
}

impl From<AdminAccount> for String {
    fn from(value: AdminAccount) -> Self {
        value.to_string()
    }
}

impl From<NativeWrapper> for String {
    fn from(value: NativeWrapper) -> Self {
        value.to_string()
    }
}

impl From<ContractSource> for String {
    fn from(value: ContractSource) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for AdminAccount {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == DEPLOYER {
            return Ok(AdminAccount::Deployer);
        }
        parse_address(&value).map(AdminAccount::Address)
    }
}

impl TryFrom<String> for NativeWrapper {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() || value == UNSET {
            return Ok(NativeWrapper::Unset);
        }
        parse_address(&value).map(NativeWrapper::At)
    }
}

impl TryFrom<String> for ContractSource {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == DEPLOY {
            return Ok(ContractSource::Deploy);
        }
        parse_address(&value).map(ContractSource::Existing)
    }
}

impl ContractSource {
    pub fn existing(self) -> Option<Address> {
        match self {
            ContractSource::Deploy => None,
            ContractSource::Existing(a) => Some(a),
        }
    }
}
