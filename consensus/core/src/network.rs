use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base network a bridgechain is bootstrapped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Main network
    Mainnet,
    /// Development network
    Devnet,
    /// Test network
    #[default]
    Testnet,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::Mainnet => write!(f, "mainnet"),
            NetworkType::Devnet => write!(f, "devnet"),
            NetworkType::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(NetworkType::Mainnet),
            "devnet" => Ok(NetworkType::Devnet),
            "testnet" => Ok(NetworkType::Testnet),
            _ => Err(format!("Unknown network: {}", s)),
        }
    }
}

impl NetworkType {
    /// Returns an iterator over all NetworkType variants
    pub fn iter() -> impl Iterator<Item = NetworkType> {
        [NetworkType::Mainnet, NetworkType::Devnet, NetworkType::Testnet].into_iter()
    }
}
