use consensus_core::ConsensusError;
use std::path::PathBuf;
use thiserror::Error;
use wallet::WalletError;

#[derive(Error, Debug)]
pub enum DeployError {
    /// Malformed or out-of-range parameters; nothing has been touched yet
    #[error(transparent)]
    Validation(ConsensusError),

    /// Destination exists without overwrite consent, or a source template is missing
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error(transparent)]
    Wallet(WalletError),

    #[error("Genesis assembly failed: {0}")]
    Genesis(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid patch rule '{name}': {source}")]
    Patch {
        name: String,
        #[source]
        source: regex::Error,
    },
}

impl DeployError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::Validation(_) | DeployError::Config(_) => 2,
            DeployError::Precondition(_) => 3,
            DeployError::Wallet(WalletError::Entropy(_)) => 4,
            _ => 1,
        }
    }
}

impl From<ConsensusError> for DeployError {
    fn from(err: ConsensusError) -> Self {
        match err {
            ConsensusError::InvalidParameters(_) => DeployError::Validation(err),
            other => DeployError::Genesis(other.to_string()),
        }
    }
}

impl From<WalletError> for DeployError {
    fn from(err: WalletError) -> Self {
        DeployError::Wallet(err)
    }
}

pub type DeployResult<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::errors::FieldError;

    #[test]
    fn test_exit_codes() {
        let validation: DeployError = ConsensusError::InvalidParameters(vec![FieldError::new("forgers", "zero")]).into();
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(DeployError::Precondition("exists".to_string()).exit_code(), 3);
        assert_eq!(DeployError::from(WalletError::Entropy("none".to_string())).exit_code(), 4);
        assert_eq!(DeployError::Genesis("bad".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err: DeployError = ConsensusError::InvalidParameters(vec![
            FieldError::new("forgers", "must be a positive integer"),
            FieldError::new("peers", "'x' is not an IP address"),
        ])
        .into();
        let message = err.to_string();
        assert!(message.contains("forgers: must be a positive integer"));
        assert!(message.contains("peers: 'x' is not an IP address"));
    }
}
