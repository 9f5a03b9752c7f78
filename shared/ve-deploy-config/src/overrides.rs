//! Caller-supplied patches over the per-network defaults.
//!
//! Every field is optional. When read from JSON, an absent key, `""` and `"0x"` all mean "keep
//! the default".

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer};

use crate::{schedule::MultiplierSchedule, variables::parse_address_override};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FixtureOverrides {
    pub accounts: AccountOverrides,
    pub contracts: ContractOverrides,
    pub token: TokenOverrides,
    pub escrow_weight_lens: Option<MultiplierSchedule>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AccountOverrides {
    #[serde(deserialize_with = "address_or_empty")]
    pub admin: Option<Address>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ContractOverrides {
    #[serde(deserialize_with = "address_or_empty")]
    pub w_native: Option<Address>,
    #[serde(deserialize_with = "address_or_empty")]
    pub lock_token: Option<Address>,
    #[serde(deserialize_with = "address_or_empty")]
    pub escrow_implementation: Option<Address>,
    #[serde(deserialize_with = "address_or_empty")]
    pub proxy_admin: Option<Address>,
    #[serde(deserialize_with = "address_or_empty")]
    pub art_proxy: Option<Address>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenOverrides {
    #[serde(deserialize_with = "text_or_blank")]
    pub name: Option<String>,
    #[serde(deserialize_with = "text_or_blank")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "text_or_blank")]
    pub version: Option<String>,
}

impl FixtureOverrides {
    pub fn from_json(s: &str) -> Result<Self, crate::ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Names of the record fields this patch replaces, in record order.
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let c = &self.contracts;
        let t = &self.token;
        [
            ("adminAccount", self.accounts.admin.is_some()),
            ("wNative", c.w_native.is_some()),
            ("lockToken", c.lock_token.is_some()),
            ("escrowImplementation", c.escrow_implementation.is_some()),
            ("proxyAdmin", c.proxy_admin.is_some()),
            ("artProxy", c.art_proxy.is_some()),
            ("tokenName", t.name.is_some()),
            ("tokenSymbol", t.symbol.is_some()),
            ("version", t.version.is_some()),
            ("escrowWeightLens", self.escrow_weight_lens.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

fn address_or_empty<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_address_override(&s).map_err(serde::de::Error::custom),
    }
}

fn text_or_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
