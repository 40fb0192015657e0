use consensus_core::ConsensusError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Secure randomness unavailable: {0}")]
    Entropy(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Signature error: {0}")]
    Signature(String),

    #[error("Record expects signer {expected}, got {actual}")]
    SignerMismatch { expected: String, actual: String },

    #[error(transparent)]
    Consensus(#[from] ConsensusError),
}

pub type WalletResult<T> = std::result::Result<T, WalletError>;
