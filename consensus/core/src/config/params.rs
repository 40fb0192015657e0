use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::IpAddr;

use crate::amount::Amount;
use crate::errors::{ConsensusError, FieldError};
use crate::network::NetworkType;
use crate::tx::TransactionType;

/// Validated scalar parameters that every downstream generator consumes.
///
/// Loaded from the `[params]` table of a deploy config and overridden from
/// the command line; [`Params::validate`] must pass before anything is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Bridgechain name, also used as the network descriptor name
    pub name: String,
    /// Base network whose templates are copied
    pub network: NetworkType,
    pub token: String,
    pub symbol: String,
    pub explorer: String,
    /// Address prefix byte
    pub pub_key_hash: u8,
    /// Private key (WIF) prefix byte
    pub wif: u8,
    /// Number of forging delegates registered at genesis
    pub forgers: u32,
    /// Block time in seconds
    pub block_time: u32,
    pub transactions_per_block: u32,
    pub vendor_field_length: u32,
    /// Network epoch, ISO-8601 UTC
    pub epoch: String,
    pub total_premine: Amount,
    pub reward_height: u64,
    pub reward_per_block: u64,
    pub fees: StaticFees,
    pub dynamic_fees: DynamicFees,
    pub bindings: Bindings,
    pub database: DatabaseConfig,
    /// Seed peer IPs written to peers.json
    pub peers: Vec<String>,
}

/// Static fee per transaction type, in the smallest token unit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFees {
    pub transfer: u64,
    pub second_signature: u64,
    pub delegate_registration: u64,
    pub vote: u64,
    pub multi_signature: u64,
    pub ipfs: u64,
    pub multi_payment: u64,
    pub delegate_resignation: u64,
}

/// Per-type byte surcharges used by the transaction pool's dynamic fees
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AddonBytes {
    pub transfer: u64,
    pub second_signature: u64,
    pub delegate_registration: u64,
    pub vote: u64,
    pub multi_signature: u64,
    pub ipfs: u64,
    pub multi_payment: u64,
    pub delegate_resignation: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicFees {
    pub enabled: bool,
    pub min_fee_pool: u64,
    pub min_fee_broadcast: u64,
    pub addon_bytes: AddonBytes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    pub p2p_port: u16,
    pub api_port: u16,
    pub webhook_port: u16,
    pub json_rpc_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
}

impl StaticFees {
    pub fn get(&self, tx_type: TransactionType) -> u64 {
        match tx_type {
            TransactionType::Transfer => self.transfer,
            TransactionType::SecondSignature => self.second_signature,
            TransactionType::DelegateRegistration => self.delegate_registration,
            TransactionType::Vote => self.vote,
            TransactionType::MultiSignature => self.multi_signature,
            TransactionType::Ipfs => self.ipfs,
            TransactionType::MultiPayment => self.multi_payment,
            TransactionType::DelegateResignation => self.delegate_resignation,
        }
    }
}

impl AddonBytes {
    pub fn get(&self, tx_type: TransactionType) -> u64 {
        match tx_type {
            TransactionType::Transfer => self.transfer,
            TransactionType::SecondSignature => self.second_signature,
            TransactionType::DelegateRegistration => self.delegate_registration,
            TransactionType::Vote => self.vote,
            TransactionType::MultiSignature => self.multi_signature,
            TransactionType::Ipfs => self.ipfs,
            TransactionType::MultiPayment => self.multi_payment,
            TransactionType::DelegateResignation => self.delegate_resignation,
        }
    }
}

impl Params {
    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<(), ConsensusError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        } else if !self.name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-') {
            errors.push(FieldError::new("name", "only lowercase letters, digits, '_' and '-' are allowed"));
        }
        if self.token.is_empty() || !self.token.chars().all(|c| c.is_ascii_alphanumeric()) {
            errors.push(FieldError::new("token", "must be a non-empty alphanumeric string"));
        }
        if self.symbol.trim().is_empty() {
            errors.push(FieldError::new("symbol", "must not be empty"));
        }
        if !(self.explorer.starts_with("http://") || self.explorer.starts_with("https://")) {
            errors.push(FieldError::new("explorer", "must be an http(s) URL"));
        }
        if self.forgers == 0 {
            errors.push(FieldError::new("forgers", "must be a positive integer"));
        }
        if self.block_time == 0 {
            errors.push(FieldError::new("block_time", "must be a positive integer"));
        }
        if self.transactions_per_block == 0 {
            errors.push(FieldError::new("transactions_per_block", "must be a positive integer"));
        }
        if self.vendor_field_length > u8::MAX as u32 {
            errors.push(FieldError::new("vendor_field_length", "must not exceed 255"));
        }
        if !is_iso_utc(&self.epoch) {
            errors.push(FieldError::new("epoch", "must be an ISO-8601 UTC timestamp such as 2017-03-21T13:00:00.000Z"));
        }
        if self.reward_height == 0 {
            errors.push(FieldError::new("reward_height", "must be a positive integer"));
        }

        let ports = [
            ("bindings.p2p_port", self.bindings.p2p_port),
            ("bindings.api_port", self.bindings.api_port),
            ("bindings.webhook_port", self.bindings.webhook_port),
            ("bindings.json_rpc_port", self.bindings.json_rpc_port),
            ("database.port", self.database.port),
        ];
        let mut seen = HashSet::new();
        for (field, port) in ports {
            if port == 0 {
                errors.push(FieldError::new(field, "must be a non-zero port"));
            } else if !seen.insert(port) {
                errors.push(FieldError::new(field, format!("port {port} is already bound by another service")));
            }
        }

        if self.database.host.is_empty() {
            errors.push(FieldError::new("database.host", "must not be empty"));
        }
        if self.database.name.is_empty() {
            errors.push(FieldError::new("database.name", "must not be empty"));
        }
        for peer in &self.peers {
            if peer.parse::<IpAddr>().is_err() {
                errors.push(FieldError::new("peers", format!("'{peer}' is not an IP address")));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConsensusError::InvalidParameters(errors))
        }
    }

    /// Maximum payload bytes of a block holding `transactions_per_block`
    /// transactions.
    pub fn max_payload(&self) -> u64 {
        crate::constants::PAYLOAD_BYTES_PER_TRANSACTION * self.transactions_per_block as u64
    }
}

/// Accepts RFC 3339 timestamps in UTC (`Z` suffix) naming a real instant
fn is_iso_utc(s: &str) -> bool {
    s.ends_with('Z') && DateTime::parse_from_rfc3339(s).is_ok()
}

impl Default for Params {
    fn default() -> Self {
        Self {
            name: "bridgechain".to_string(),
            network: NetworkType::Testnet,
            token: "MINE".to_string(),
            symbol: "M".to_string(),
            explorer: "http://localhost:4200".to_string(),
            pub_key_hash: 25,
            wif: 170,
            forgers: 51,
            block_time: 8,
            transactions_per_block: 150,
            vendor_field_length: 255,
            epoch: "2017-03-21T13:00:00.000Z".to_string(),
            total_premine: Amount::from(12_500_000_000_000_000),
            reward_height: 1,
            reward_per_block: 200_000_000,
            fees: StaticFees::default(),
            dynamic_fees: DynamicFees::default(),
            bindings: Bindings::default(),
            database: DatabaseConfig::default(),
            peers: Vec::new(),
        }
    }
}

impl Default for StaticFees {
    fn default() -> Self {
        Self {
            transfer: 10_000_000,
            second_signature: 500_000_000,
            delegate_registration: 2_500_000_000,
            vote: 100_000_000,
            multi_signature: 500_000_000,
            ipfs: 500_000_000,
            multi_payment: 10_000_000,
            delegate_resignation: 2_500_000_000,
        }
    }
}

impl Default for AddonBytes {
    fn default() -> Self {
        Self {
            transfer: 100,
            second_signature: 250,
            delegate_registration: 400_000,
            vote: 100,
            multi_signature: 500,
            ipfs: 250,
            multi_payment: 500,
            delegate_resignation: 400_000,
        }
    }
}

impl Default for DynamicFees {
    fn default() -> Self {
        Self { enabled: true, min_fee_pool: 3000, min_fee_broadcast: 3000, addon_bytes: AddonBytes::default() }
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self { p2p_port: 4102, api_port: 4103, webhook_port: 4104, json_rpc_port: 8080 }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "core".to_string(),
            password: "password".to_string(),
            name: "core_bridgechain".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(err: ConsensusError) -> Vec<&'static str> {
        match err {
            ConsensusError::InvalidParameters(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        Params::default().validate().unwrap();
    }

    #[test]
    fn test_reports_every_bad_field() {
        let mut params = Params::default();
        params.name = "Bad Name".to_string();
        params.forgers = 0;
        params.reward_height = 0;
        params.epoch = "yesterday".to_string();
        params.peers = vec!["10.0.0.1".to_string(), "not-an-ip".to_string()];

        let fields = field_names(params.validate().unwrap_err());
        assert_eq!(fields, vec!["name", "forgers", "epoch", "reward_height", "peers"]);
    }

    #[test]
    fn test_default_reward_starts_at_first_block() {
        assert_eq!(Params::default().reward_height, 1);
    }

    #[test]
    fn test_epoch_must_be_a_real_utc_instant() {
        for epoch in ["2017-02-30T00:00:00.000Z", "2017-99-99T99:99:99garbageZ", "2017-03-21T13:00:00.000+02:00", "2017-03-21"] {
            let params = Params { epoch: epoch.to_string(), ..Params::default() };
            assert_eq!(field_names(params.validate().unwrap_err()), vec!["epoch"], "{epoch}");
        }
        for epoch in ["2017-03-21T13:00:00.000Z", "2024-02-29T23:59:59Z"] {
            let params = Params { epoch: epoch.to_string(), ..Params::default() };
            params.validate().unwrap();
        }
    }

    #[test]
    fn test_rejects_port_collisions() {
        let mut params = Params::default();
        params.bindings.api_port = params.bindings.p2p_port;
        let fields = field_names(params.validate().unwrap_err());
        assert_eq!(fields, vec!["bindings.api_port"]);
    }

    #[test]
    fn test_max_payload() {
        let mut params = Params::default();
        params.transactions_per_block = 150;
        assert_eq!(params.max_payload(), 41_943 * 150);
    }

    #[test]
    fn test_partial_toml_like_input_uses_defaults() {
        let params: Params = serde_json::from_str(r#"{"name":"mychain","total_premine":"100","fees":{"vote":5}}"#).unwrap();
        assert_eq!(params.name, "mychain");
        assert_eq!(params.total_premine, Amount::from(100));
        assert_eq!(params.fees.vote, 5);
        assert_eq!(params.fees.transfer, StaticFees::default().transfer);
        assert_eq!(params.forgers, 51);
    }
}
