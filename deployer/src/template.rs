use std::fs;
use std::path::{Path, PathBuf};

use consensus_core::network::NetworkType;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::{DeployError, DeployResult};

pub const PLUGINS_FILE: &str = "plugins.js";
pub const ENV_FILE: &str = ".env";

/// Destination subdirectory receiving the runtime configuration tree
pub const CORE_DIR: &str = "core";
/// Destination subdirectory receiving the crypto network tree
pub const CRYPTO_DIR: &str = "crypto";

/// Base network template directories inside a core checkout
#[derive(Debug, Clone)]
pub struct TemplateSource {
    config_root: PathBuf,
    crypto_root: PathBuf,
}

impl TemplateSource {
    /// Resolves and checks the template roots of `network` under `core_path`
    pub fn locate(core_path: &Path, network: NetworkType) -> DeployResult<Self> {
        let name = network.to_string();
        let config_root = core_path.join("packages").join("core").join("bin").join("config").join(&name);
        let crypto_root = core_path.join("packages").join("crypto").join("src").join("networks").join(&name);

        for root in [&config_root, &crypto_root] {
            if !root.is_dir() {
                return Err(DeployError::Precondition(format!("template directory {} does not exist", root.display())));
            }
        }
        for file in [PLUGINS_FILE, ENV_FILE] {
            if !config_root.join(file).is_file() {
                return Err(DeployError::Precondition(format!(
                    "template {} is missing {file}",
                    config_root.display()
                )));
            }
        }

        Ok(Self { config_root, crypto_root })
    }

    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    pub fn crypto_root(&self) -> &Path {
        &self.crypto_root
    }

    /// Fails if `destination` is inside a template root or contains one, since
    /// preparing it would destroy the source.
    pub fn check_disjoint(&self, destination: &Path) -> DeployResult<()> {
        let destination = absolute(destination);
        for root in [&self.config_root, &self.crypto_root] {
            let root = absolute(root);
            if destination.starts_with(&root) || root.starts_with(&destination) {
                return Err(DeployError::Precondition(format!(
                    "destination {} overlaps template {}",
                    destination.display(),
                    root.display()
                )));
            }
        }
        Ok(())
    }

    /// Copies both template trees to `<destination>/core` and `<destination>/crypto`
    pub fn copy_into(&self, destination: &Path) -> DeployResult<(PathBuf, PathBuf)> {
        let core_dir = destination.join(CORE_DIR);
        let crypto_dir = destination.join(CRYPTO_DIR);
        let copied = copy_tree(&self.config_root, &core_dir)? + copy_tree(&self.crypto_root, &crypto_dir)?;
        info!(files = copied, destination = %destination.display(), "copied base network templates");
        Ok((core_dir, crypto_dir))
    }
}

/// Canonical form of `path`, resolved through its nearest existing ancestor
fn absolute(path: &Path) -> PathBuf {
    let path = match std::env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };
    for ancestor in path.ancestors() {
        if let (Ok(resolved), Ok(rest)) = (fs::canonicalize(ancestor), path.strip_prefix(ancestor)) {
            return resolved.join(rest);
        }
    }
    path
}

fn copy_tree(source: &Path, target: &Path) -> DeployResult<usize> {
    let mut files = 0;
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            DeployError::io(path, e.into())
        })?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let dest = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| DeployError::io(&dest, e))?;
        } else {
            fs::copy(entry.path(), &dest).map_err(|e| DeployError::io(&dest, e))?;
            files += 1;
        }
    }
    debug!(from = %source.display(), to = %target.display(), files, "copied template tree");
    Ok(files)
}
