use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Networks with a registered set of deployment defaults.
///
/// Adding a network means adding the variant, its tag, and its default record in
/// [`crate::resolver::defaults`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    #[serde(rename = "bsc")]
    Bsc,
    #[serde(rename = "bscTestnet")]
    BscTestnet,
    #[serde(rename = "hardhat")]
    Hardhat,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Bsc, Network::BscTestnet, Network::Hardhat];

    /// Tag used by the deploy scripts and on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            Network::Bsc => "bsc",
            Network::BscTestnet => "bscTestnet",
            Network::Hardhat => "hardhat",
        }
    }

    pub fn chain_id(self) -> u64 {
        match self {
            Network::Bsc => 56,
            Network::BscTestnet => 97,
            Network::Hardhat => 31337,
        }
    }

    /// Whether the network is a public chain (as opposed to a local simulation).
    pub fn is_live(self) -> bool {
        !matches!(self, Network::Hardhat)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl TryFrom<&str> for Network {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Network::ALL
            .into_iter()
            .find(|n| n.tag() == value)
            .ok_or_else(|| ConfigError::UnknownNetwork(value.to_string()))
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::try_from(s)
    }
}
