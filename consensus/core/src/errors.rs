use std::fmt;
use thiserror::Error;

/// A single rejected parameter, reported alongside all other rejected fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error("Invalid parameters: {}", join_fields(.0))]
    InvalidParameters(Vec<FieldError>),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Unknown transaction type {0}")]
    UnknownTransactionType(u16),

    #[error("Invalid hex in {field}: {source}")]
    InvalidHex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("Field {0} does not fit its serialized width")]
    FieldOverflow(&'static str),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Milestone heights are not strictly ascending at height {0}")]
    MilestoneOrder(u64),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type ConsensusResult<T> = std::result::Result<T, ConsensusError>;
