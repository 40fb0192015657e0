use sha2::{Digest, Sha256};

use crate::Hash;

pub mod tx;

pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// First four bytes of the double SHA-256, as used by Base58Check.
pub fn checksum(data: &[u8]) -> [u8; 4] {
    let digest = Sha256::digest(Sha256::digest(data));
    [digest[0], digest[1], digest[2], digest[3]]
}
