//! Destination directory handling and the JSON artifacts written into it.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use consensus_core::config::Params;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wallet::{GenesisIdentities, Wallet};

use crate::errors::{DeployError, DeployResult};

pub const MILESTONES_FILE: &str = "milestones.json";
pub const EXCEPTIONS_FILE: &str = "exceptions.json";
pub const NETWORK_FILE: &str = "network.json";
pub const GENESIS_BLOCK_FILE: &str = "genesisBlock.json";
pub const PEERS_FILE: &str = "peers.json";
pub const DELEGATES_FILE: &str = "delegates.json";
pub const GENESIS_WALLET_FILE: &str = "genesisWallet.json";

/// Empty exception tables for a fresh network
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exceptions {
    pub blocks: Vec<String>,
    pub transactions: Vec<String>,
    pub outlook_table: BTreeMap<String, String>,
    pub transaction_id_fix_table: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEntry {
    pub ip: String,
    pub port: u16,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peers {
    pub list: Vec<PeerEntry>,
    pub sources: Vec<String>,
}

impl Peers {
    /// Every configured peer, reachable on the network's p2p port
    pub fn from_params(params: &Params) -> Self {
        let port = params.bindings.p2p_port;
        Self { list: params.peers.iter().map(|ip| PeerEntry { ip: ip.clone(), port }).collect(), sources: Vec::new() }
    }
}

#[derive(Debug, Serialize)]
pub struct GenesisWalletFile<'a> {
    pub address: &'a str,
    pub passphrase: &'a str,
}

impl<'a> From<&'a Wallet> for GenesisWalletFile<'a> {
    fn from(wallet: &'a Wallet) -> Self {
        Self { address: wallet.address(), passphrase: wallet.passphrase() }
    }
}

/// Forging secrets, one per delegate in registration order
#[derive(Debug, Serialize)]
pub struct DelegatesFile<'a> {
    pub secrets: Vec<&'a str>,
}

impl<'a> From<&'a GenesisIdentities> for DelegatesFile<'a> {
    fn from(identities: &'a GenesisIdentities) -> Self {
        Self { secrets: identities.delegates.iter().map(Wallet::passphrase).collect() }
    }
}

/// Pretty JSON followed by a newline
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> DeployResult<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Writes artifacts below a prepared destination root
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    /// Decides whether `root` may be prepared, without touching it
    pub fn check(root: &Path, overwrite: bool) -> DeployResult<()> {
        if root.exists() && !overwrite {
            return Err(DeployError::Precondition(format!(
                "destination {} already exists, pass --overwrite to replace it",
                root.display()
            )));
        }
        if root.exists() && !root.is_dir() {
            return Err(DeployError::Precondition(format!("destination {} is not a directory", root.display())));
        }
        Ok(())
    }

    /// Removes an existing `root` when `overwrite` is set, then creates it
    pub fn prepare(root: &Path, overwrite: bool) -> DeployResult<Self> {
        Self::check(root, overwrite)?;
        if root.exists() {
            fs::remove_dir_all(root).map_err(|e| DeployError::io(root, e))?;
            info!(path = %root.display(), "removed existing destination");
        }
        fs::create_dir_all(root).map_err(|e| DeployError::io(root, e))?;
        Ok(Self { root: root.to_path_buf() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target(&self, relative: &Path) -> DeployResult<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| DeployError::io(parent, e))?;
        }
        Ok(path)
    }

    pub fn write_text(&self, relative: impl AsRef<Path>, text: &str) -> DeployResult<PathBuf> {
        let path = self.target(relative.as_ref())?;
        fs::write(&path, text).map_err(|e| DeployError::io(&path, e))?;
        debug!(path = %path.display(), "wrote artifact");
        Ok(path)
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, relative: impl AsRef<Path>, value: &T) -> DeployResult<PathBuf> {
        self.write_text(relative, &to_canonical_json(value)?)
    }

    /// Like [`Self::write_json`], but readable by the owner only
    pub fn write_secret_json<T: Serialize + ?Sized>(&self, relative: impl AsRef<Path>, value: &T) -> DeployResult<PathBuf> {
        self.write_secret_text(relative, &to_canonical_json(value)?)
    }

    pub fn write_secret_text(&self, relative: impl AsRef<Path>, text: &str) -> DeployResult<PathBuf> {
        let path = self.target(relative.as_ref())?;
        let mut file = open_private(&path).map_err(|e| DeployError::io(&path, e))?;
        file.write_all(text.as_bytes()).map_err(|e| DeployError::io(&path, e))?;
        debug!(path = %path.display(), "wrote secret artifact");
        Ok(path)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)?;
    // the mode only applies to newly created files
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create(true).truncate(true).open(path)
}
