use consensus_core::config::Params;
use consensus_core::Amount;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::errors::{DeployError, DeployResult};

/// `[deploy]` table: where templates come from and where output goes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploySection {
    pub core_path: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub overwrite: bool,
}

/// On-disk layout of a deploy configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub deploy: DeploySection,
    pub params: Params,
}

impl ConfigFile {
    pub fn load(path: &Path) -> DeployResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| DeployError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> DeployResult<Self> {
        toml::from_str(content).map_err(|e| DeployError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Fully resolved input of one deploy run
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub core_path: PathBuf,
    pub destination: PathBuf,
    pub overwrite: bool,
    pub params: Params,
}

impl DeployConfig {
    /// Config file (if any) overridden by command line flags
    pub fn from_args(args: &Args) -> DeployResult<Self> {
        let mut file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        file.apply_cli_overrides(args)?;
        Self::resolve(file)
    }

    pub fn resolve(file: ConfigFile) -> DeployResult<Self> {
        let ConfigFile { deploy, params } = file;
        let core_path = deploy
            .core_path
            .ok_or_else(|| DeployError::Config("core path is required (--core-path or [deploy].core_path)".to_string()))?;
        let destination = deploy.destination.unwrap_or_else(|| PathBuf::from(&params.name));
        Ok(Self { core_path, destination, overwrite: deploy.overwrite, params })
    }
}

/// Splits a comma-separated list, dropping empty entries
pub fn parse_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

macro_rules! override_fields {
    ($args:expr, $( $arg:ident => $target:expr ),+ $(,)?) => {
        $(
            if let Some(value) = &$args.$arg {
                $target = value.clone();
            }
        )+
    };
}

impl ConfigFile {
    /// Override config with CLI arguments
    pub fn apply_cli_overrides(&mut self, args: &Args) -> DeployResult<()> {
        if args.core_path.is_some() {
            self.deploy.core_path = args.core_path.clone();
        }
        if args.destination.is_some() {
            self.deploy.destination = args.destination.clone();
        }
        // a flag only ever turns overwrite on
        if args.overwrite {
            self.deploy.overwrite = true;
        }

        let params = &mut self.params;
        override_fields!(args,
            name => params.name,
            network => params.network,
            token => params.token,
            symbol => params.symbol,
            explorer => params.explorer,
            pub_key_hash => params.pub_key_hash,
            wif => params.wif,
            forgers => params.forgers,
            block_time => params.block_time,
            transactions_per_block => params.transactions_per_block,
            vendor_field_length => params.vendor_field_length,
            epoch => params.epoch,
            reward_height => params.reward_height,
            reward_per_block => params.reward_per_block,
            fee_transfer => params.fees.transfer,
            fee_second_signature => params.fees.second_signature,
            fee_delegate_registration => params.fees.delegate_registration,
            fee_vote => params.fees.vote,
            fee_multi_signature => params.fees.multi_signature,
            fee_ipfs => params.fees.ipfs,
            fee_multi_payment => params.fees.multi_payment,
            fee_delegate_resignation => params.fees.delegate_resignation,
            min_fee_pool => params.dynamic_fees.min_fee_pool,
            min_fee_broadcast => params.dynamic_fees.min_fee_broadcast,
            addon_bytes_transfer => params.dynamic_fees.addon_bytes.transfer,
            addon_bytes_second_signature => params.dynamic_fees.addon_bytes.second_signature,
            addon_bytes_delegate_registration => params.dynamic_fees.addon_bytes.delegate_registration,
            addon_bytes_vote => params.dynamic_fees.addon_bytes.vote,
            addon_bytes_multi_signature => params.dynamic_fees.addon_bytes.multi_signature,
            addon_bytes_ipfs => params.dynamic_fees.addon_bytes.ipfs,
            addon_bytes_multi_payment => params.dynamic_fees.addon_bytes.multi_payment,
            addon_bytes_delegate_resignation => params.dynamic_fees.addon_bytes.delegate_resignation,
            p2p_port => params.bindings.p2p_port,
            api_port => params.bindings.api_port,
            webhook_port => params.bindings.webhook_port,
            json_rpc_port => params.bindings.json_rpc_port,
            db_host => params.database.host,
            db_port => params.database.port,
            db_username => params.database.username,
            db_password => params.database.password,
            db_name => params.database.name,
        );

        if args.dynamic_fees {
            params.dynamic_fees.enabled = true;
        }
        if args.no_dynamic_fees {
            params.dynamic_fees.enabled = false;
        }

        if let Some(premine) = &args.premine {
            params.total_premine = premine
                .parse::<Amount>()
                .map_err(|e| DeployError::Config(format!("Invalid premine '{}': {}", premine, e)))?;
        }

        if let Some(peers) = &args.peers {
            params.peers = parse_list(peers);
        }

        Ok(())
    }
}
