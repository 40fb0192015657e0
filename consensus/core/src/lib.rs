//! Core data model for bridgechain bootstrap: exact amounts, parameter sets,
//! milestone schedules, network descriptors and the canonical byte forms of
//! genesis transactions and blocks.

pub mod amount;
pub mod block;
pub mod config;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod network;
pub mod sign;
pub mod tx;

pub use amount::Amount;
pub use errors::{ConsensusError, ConsensusResult};

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];
