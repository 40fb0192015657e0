use sha2::{Digest, Sha256};

use crate::errors::ConsensusResult;
use crate::tx::Transaction;
use crate::Hash;

/// Digest over the concatenated signed bytes of `transactions`, in order,
/// together with the total byte length that went into it.
pub fn calc_payload_hash(transactions: &[Transaction]) -> ConsensusResult<(Hash, u32)> {
    let mut hasher = Sha256::new();
    let mut length: u64 = 0;
    for tx in transactions {
        let bytes = tx.to_bytes(true)?;
        length += bytes.len() as u64;
        hasher.update(&bytes);
    }
    let length = u32::try_from(length).map_err(|_| crate::errors::ConsensusError::FieldOverflow("payloadLength"))?;
    Ok((hasher.finalize().into(), length))
}
