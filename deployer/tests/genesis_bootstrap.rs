use consensus_core::block::GenesisBlock;
use consensus_core::config::Params;
use consensus_core::network::NetworkType;
use consensus_core::Amount;
use deployer::{DeployConfig, DeployError, Deployer};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PLUGINS: &str = r#"module.exports = {
    "@arkecosystem/core-p2p": {
        server: {
            port: process.env.CORE_P2P_PORT || 4000,
        },
    },
    "@arkecosystem/core-transaction-pool": {
        dynamicFees: {
            enabled: true,
            minFeePool: 1000,
            minFeeBroadcast: 1000,
            addonBytes: {
                transfer: 100,
                secondSignature: 250,
                delegateRegistration: 400000,
                vote: 100,
                multiSignature: 500,
                ipfs: 250,
                multiPayment: 500,
                delegateResignation: 400000,
            },
        },
    },
    "@arkecosystem/core-api": {
        port: process.env.CORE_API_PORT || 4003,
    },
};
"#;

const ENV: &str = "CORE_LOG_LEVEL=info\nCORE_DB_HOST=localhost\nCORE_DB_PORT=5432\nCORE_P2P_HOST=0.0.0.0\nCORE_P2P_PORT=4000\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(network: NetworkType) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("core/packages/core/bin/config").join(network.to_string());
        let crypto = dir.path().join("core/packages/crypto/src/networks").join(network.to_string());
        fs::create_dir_all(&config).unwrap();
        fs::create_dir_all(&crypto).unwrap();
        fs::write(config.join("plugins.js"), PLUGINS).unwrap();
        fs::write(config.join(".env"), ENV).unwrap();
        fs::write(config.join("delegates.json"), "{\"secrets\": []}\n").unwrap();
        fs::write(crypto.join("index.ts"), "export {};\n").unwrap();
        Self { dir }
    }

    fn core_path(&self) -> PathBuf {
        self.dir.path().join("core")
    }

    fn destination(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn config(&self, params: Params, overwrite: bool) -> DeployConfig {
        DeployConfig { core_path: self.core_path(), destination: self.destination(), overwrite, params }
    }
}

fn small_params() -> Params {
    Params {
        name: "tinychain".to_string(),
        forgers: 1,
        total_premine: "100".parse().unwrap(),
        reward_height: 1,
        reward_per_block: 10,
        ..Params::default()
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_single_forger_bootstrap() {
    let fixture = Fixture::new(NetworkType::Testnet);
    let summary = Deployer::new(fixture.config(small_params(), false)).run().unwrap();
    let out = fixture.destination();

    let milestones = read_json(&out.join("crypto/milestones.json"));
    let milestones = milestones.as_array().unwrap();
    assert_eq!(milestones.len(), 2);
    assert_eq!(milestones[0]["height"], 1);
    assert_eq!(milestones[0]["reward"], 10);
    assert_eq!(milestones[1]["height"], 2);
    assert_eq!(milestones[1]["aip11"], true);

    let block: GenesisBlock = serde_json::from_str(&fs::read_to_string(out.join("crypto/genesisBlock.json")).unwrap()).unwrap();
    assert_eq!(block.transactions.len(), 3);
    assert_eq!(block.transactions[0].amount, Amount::from(100));
    assert_eq!(block.height, 1);
    assert!(block.previous_block.is_none());

    // the nethash is the payload digest of the persisted transactions
    let (payload_hash, _) = block.recompute_payload().unwrap();
    let network = read_json(&out.join("crypto/network.json"));
    assert_eq!(network["nethash"], payload_hash.as_str());
    assert_eq!(block.payload_hash, payload_hash);
    assert_eq!(summary.nethash, payload_hash);
    assert_eq!(network["name"], "tinychain");
    assert_eq!(network["messagePrefix"], "tinychain message:\n");

    let wallet = read_json(&out.join("core/genesisWallet.json"));
    assert_eq!(wallet["address"], summary.genesis_address.as_str());
    assert_eq!(wallet["passphrase"].as_str().unwrap().split(' ').count(), 12);

    let delegates = read_json(&out.join("core/delegates.json"));
    assert_eq!(delegates["secrets"].as_array().unwrap().len(), 1);

    let exceptions = read_json(&out.join("crypto/exceptions.json"));
    assert_eq!(exceptions["blocks"], Value::Array(vec![]));
    assert!(out.join("crypto/index.ts").is_file());
}

#[test]
fn test_templates_are_patched() {
    let fixture = Fixture::new(NetworkType::Testnet);
    let mut params = small_params();
    params.bindings.p2p_port = 4700;
    params.peers = vec!["10.1.1.1".to_string()];
    Deployer::new(fixture.config(params, false)).run().unwrap();
    let core = fixture.destination().join("core");

    let plugins = fs::read_to_string(core.join("plugins.js")).unwrap();
    assert!(plugins.contains("port: process.env.CORE_P2P_PORT || 4700,"));
    assert!(plugins.contains("minFeePool: 3000,"));

    let env = fs::read_to_string(core.join(".env")).unwrap();
    assert!(env.starts_with("CORE_LOG_LEVEL=info\n"));
    assert!(env.contains("CORE_P2P_PORT=4700\nCORE_P2P_MINIMUM_NETWORK_REACH=1\n"));
    assert!(env.contains("CORE_NETWORK_NAME=tinychain\n"));
    assert!(env.ends_with('\n'));

    let peers = read_json(&core.join("peers.json"));
    assert_eq!(peers["list"][0]["ip"], "10.1.1.1");
    assert_eq!(peers["list"][0]["port"], 4700);
}

#[test]
fn test_existing_destination_without_overwrite_is_untouched() {
    let fixture = Fixture::new(NetworkType::Testnet);
    fs::create_dir_all(fixture.destination()).unwrap();
    fs::write(fixture.destination().join("keep.txt"), "mine").unwrap();

    let err = Deployer::new(fixture.config(small_params(), false)).run().unwrap_err();
    assert!(matches!(err, DeployError::Precondition(_)));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(fs::read_to_string(fixture.destination().join("keep.txt")).unwrap(), "mine");
    assert!(!fixture.destination().join("crypto").exists());
}

#[test]
fn test_overwrite_replaces_destination() {
    let fixture = Fixture::new(NetworkType::Testnet);
    fs::create_dir_all(fixture.destination()).unwrap();
    fs::write(fixture.destination().join("stale.txt"), "old").unwrap();

    Deployer::new(fixture.config(small_params(), true)).run().unwrap();
    assert!(!fixture.destination().join("stale.txt").exists());
    assert!(fixture.destination().join("crypto/genesisBlock.json").is_file());
}

#[test]
fn test_missing_template_aborts_before_writing() {
    let fixture = Fixture::new(NetworkType::Testnet);
    let params = Params { network: NetworkType::Mainnet, ..small_params() };

    let err = Deployer::new(fixture.config(params, false)).run().unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(!fixture.destination().exists());
}

#[test]
fn test_invalid_parameters_abort_before_writing() {
    let fixture = Fixture::new(NetworkType::Testnet);
    let params = Params { forgers: 0, ..small_params() };

    let err = Deployer::new(fixture.config(params, true)).run().unwrap_err();
    assert!(matches!(err, DeployError::Validation(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(!fixture.destination().exists());
}

#[test]
fn test_runs_produce_distinct_networks() {
    let fixture = Fixture::new(NetworkType::Testnet);
    let first = Deployer::new(fixture.config(small_params(), false)).run().unwrap();
    let second = Deployer::new(fixture.config(small_params(), true)).run().unwrap();
    assert_ne!(first.nethash, second.nethash);
    assert_ne!(first.genesis_address, second.genesis_address);
}

#[cfg(unix)]
#[test]
fn test_secrets_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = Fixture::new(NetworkType::Testnet);
    Deployer::new(fixture.config(small_params(), false)).run().unwrap();
    for file in ["core/delegates.json", "core/genesisWallet.json"] {
        let mode = fs::metadata(fixture.destination().join(file)).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "{file}");
    }
}
