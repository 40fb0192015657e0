//! Bridgechain deployer
//!
//! Turns a base network template and a parameter set into a ready-to-run
//! bridgechain: milestones, signed genesis block, network descriptor, seed
//! peers, delegate secrets and patched runtime configuration.

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod deployer;
pub mod errors;
pub mod genesis;
pub mod patch;
pub mod template;
pub mod ui;

pub use cli::Args;
pub use config::DeployConfig;
pub use deployer::{DeploySummary, Deployer};
pub use errors::{DeployError, DeployResult};
