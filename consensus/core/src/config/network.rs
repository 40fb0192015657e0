//! Two-phase network descriptor.
//!
//! [`NetworkBuilder`] fixes the parameters into an immutable
//! [`ProvisionalNetwork`]; block assembly reads that snapshot, and only the
//! resulting payload hash can turn it into a [`NetworkConfig`] via
//! [`ProvisionalNetwork::stamp`], which consumes the snapshot.

use serde::{Deserialize, Serialize};

use crate::config::params::Params;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub token: String,
    pub symbol: String,
    pub explorer: String,
}

/// Network descriptor before the genesis block exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionalNetwork {
    name: String,
    message_prefix: String,
    pub_key_hash: u8,
    wif: u8,
    client: ClientInfo,
}

/// Final network descriptor, identified by its nethash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub message_prefix: String,
    pub pub_key_hash: u8,
    pub nethash: String,
    pub wif: u8,
    pub client: ClientInfo,
}

pub struct NetworkBuilder {
    name: String,
    pub_key_hash: u8,
    wif: u8,
    client: ClientInfo,
}

impl NetworkBuilder {
    pub fn from_params(params: &Params) -> Self {
        Self {
            name: params.name.clone(),
            pub_key_hash: params.pub_key_hash,
            wif: params.wif,
            client: ClientInfo {
                token: params.token.clone(),
                symbol: params.symbol.clone(),
                explorer: params.explorer.clone(),
            },
        }
    }

    pub fn build(self) -> ProvisionalNetwork {
        ProvisionalNetwork {
            message_prefix: format!("{} message:\n", self.name),
            name: self.name,
            pub_key_hash: self.pub_key_hash,
            wif: self.wif,
            client: self.client,
        }
    }
}

impl ProvisionalNetwork {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pub_key_hash(&self) -> u8 {
        self.pub_key_hash
    }

    pub fn wif(&self) -> u8 {
        self.wif
    }

    pub fn client(&self) -> &ClientInfo {
        &self.client
    }

    /// Attaches the genesis payload hash.
    pub fn stamp(self, nethash: impl Into<String>) -> NetworkConfig {
        NetworkConfig {
            name: self.name,
            message_prefix: self.message_prefix,
            pub_key_hash: self.pub_key_hash,
            nethash: nethash.into(),
            wif: self.wif,
            client: self.client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisional_has_no_nethash() {
        let params = Params { name: "mychain".to_string(), pub_key_hash: 30, wif: 186, ..Params::default() };
        let provisional = NetworkBuilder::from_params(&params).build();
        let json = serde_json::to_value(&provisional).unwrap();
        assert!(json.get("nethash").is_none());
        assert_eq!(json["messagePrefix"], "mychain message:\n");
        assert_eq!(json["pubKeyHash"], 30);
        assert_eq!(json["client"]["token"], "MINE");
    }

    #[test]
    fn test_stamp_keeps_fields() {
        let provisional = NetworkBuilder::from_params(&Params::default()).build();
        let copy = provisional.clone();
        let network = provisional.stamp("ab".repeat(32));
        assert_eq!(network.name, copy.name());
        assert_eq!(network.pub_key_hash, copy.pub_key_hash());
        assert_eq!(network.wif, copy.wif());
        assert_eq!(&network.client, copy.client());
        assert_eq!(network.nethash, "ab".repeat(32));
    }
}
