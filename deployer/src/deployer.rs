//! The bootstrap pipeline.
//!
//! Everything that can fail without side effects runs first: parameter
//! validation, template and destination checks, milestone composition, key
//! generation, transaction and block assembly and rendering of every JSON
//! artifact. Only then is the destination prepared and written.

use std::path::{Path, PathBuf};

use consensus_core::config::milestones::{check_order, StaticFeeTable};
use consensus_core::config::{compose_milestones, Milestone, NetworkBuilder};
use tracing::info;

use crate::artifacts::{
    to_canonical_json, ArtifactWriter, DelegatesFile, Exceptions, GenesisWalletFile, Peers, DELEGATES_FILE,
    EXCEPTIONS_FILE, GENESIS_BLOCK_FILE, GENESIS_WALLET_FILE, MILESTONES_FILE, NETWORK_FILE, PEERS_FILE,
};
use crate::config::DeployConfig;
use crate::errors::{DeployError, DeployResult};
use crate::genesis::build_genesis;
use crate::patch::{apply_rules, env_rules, patch_file, plugin_rules, EnvFile};
use crate::template::{TemplateSource, CORE_DIR, CRYPTO_DIR, ENV_FILE, PLUGINS_FILE};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct DeploySummary {
    pub nethash: String,
    pub block_id: String,
    pub genesis_address: String,
    pub delegates: usize,
    pub transactions: u32,
    pub destination: PathBuf,
    /// Every file written or patched, in write order
    pub artifacts: Vec<PathBuf>,
}

/// Rendered artifacts, ready to be written
struct Rendered {
    provisional_network: String,
    milestones: String,
    exceptions: String,
    peers: String,
    delegates: String,
    genesis_wallet: String,
    genesis_block: String,
    network: String,
}

pub struct Deployer {
    config: DeployConfig,
}

impl Deployer {
    pub fn new(config: DeployConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub fn run(&self) -> DeployResult<DeploySummary> {
        let config = &self.config;
        let params = &config.params;

        params.validate()?;
        info!(name = %params.name, network = %params.network, forgers = params.forgers, "parameters validated");

        let source = TemplateSource::locate(&config.core_path, params.network)?;
        source.check_disjoint(&config.destination)?;
        ArtifactWriter::check(&config.destination, config.overwrite)?;

        let milestones = compose_milestones(params);
        check_order(&milestones)?;
        info!(count = milestones.len(), "composed milestones");

        let network = NetworkBuilder::from_params(params).build();
        let genesis = build_genesis(params, base_fees(&milestones)?, &network)?;
        let plugin_rules = plugin_rules(params)?;
        let env_rules = env_rules(params);

        let provisional_network = to_canonical_json(&network)?;
        let nethash = genesis.block.nethash().to_string();
        let stamped = network.stamp(nethash.clone());
        let rendered = Rendered {
            provisional_network,
            milestones: to_canonical_json(&milestones)?,
            exceptions: to_canonical_json(&Exceptions::default())?,
            peers: to_canonical_json(&Peers::from_params(params))?,
            delegates: to_canonical_json(&DelegatesFile::from(&genesis.identities))?,
            genesis_wallet: to_canonical_json(&GenesisWalletFile::from(&genesis.identities.genesis))?,
            genesis_block: to_canonical_json(&genesis.block)?,
            network: to_canonical_json(&stamped)?,
        };

        // nothing on disk has changed up to here
        let writer = ArtifactWriter::prepare(&config.destination, config.overwrite)?;
        source.copy_into(writer.root())?;
        let mut artifacts = write_artifacts(&writer, &rendered)?;

        let plugins_path = writer.root().join(CORE_DIR).join(PLUGINS_FILE);
        if patch_file(&plugins_path, |text| Ok(apply_rules(text, &plugin_rules).text))? {
            artifacts.push(plugins_path);
        }
        let env_path = writer.root().join(CORE_DIR).join(ENV_FILE);
        if patch_file(&env_path, |text| {
            let mut env = EnvFile::parse(text);
            env.apply(&env_rules);
            Ok(env.to_string())
        })? {
            artifacts.push(env_path);
        }
        info!(destination = %writer.root().display(), files = artifacts.len(), "artifacts written");

        Ok(DeploySummary {
            nethash,
            block_id: genesis.block.id.clone(),
            genesis_address: genesis.identities.genesis.address().to_string(),
            delegates: genesis.identities.delegates.len(),
            transactions: genesis.block.number_of_transactions,
            destination: writer.root().to_path_buf(),
            artifacts,
        })
    }
}

fn base_fees(milestones: &[Milestone]) -> DeployResult<&StaticFeeTable> {
    milestones
        .first()
        .and_then(|milestone| milestone.fees.as_ref())
        .map(|fees| &fees.static_fees)
        .ok_or_else(|| DeployError::Genesis("base milestone carries no fee schedule".to_string()))
}

fn write_artifacts(writer: &ArtifactWriter, rendered: &Rendered) -> DeployResult<Vec<PathBuf>> {
    let crypto = Path::new(CRYPTO_DIR);
    let core = Path::new(CORE_DIR);

    // the descriptor goes out first without a nethash and is replaced once the block is on disk
    let provisional = writer.write_text(crypto.join(NETWORK_FILE), &rendered.provisional_network)?;
    let mut artifacts = vec![
        writer.write_text(crypto.join(MILESTONES_FILE), &rendered.milestones)?,
        writer.write_text(crypto.join(EXCEPTIONS_FILE), &rendered.exceptions)?,
        writer.write_text(core.join(PEERS_FILE), &rendered.peers)?,
        writer.write_secret_text(core.join(DELEGATES_FILE), &rendered.delegates)?,
        writer.write_secret_text(core.join(GENESIS_WALLET_FILE), &rendered.genesis_wallet)?,
        writer.write_text(crypto.join(GENESIS_BLOCK_FILE), &rendered.genesis_block)?,
    ];
    let stamped = writer.write_text(crypto.join(NETWORK_FILE), &rendered.network)?;
    debug_assert_eq!(provisional, stamped);
    artifacts.push(stamped);
    Ok(artifacts)
}
