use ripemd::Ripemd160;
use secp256k1::PublicKey;
use sha2::Digest;

use consensus_core::hashing;

/// Base58Check addresses: prefix byte || RIPEMD-160(compressed public key).
///
/// Decoding lives in [`consensus_core::tx::decode_address`].
pub struct Address;

impl Address {
    /// Generate address from public key for the network's prefix byte
    pub fn from_public_key(public_key: &PublicKey, prefix: u8) -> String {
        // RIPEMD160 of the compressed key itself
        let ripemd_hash = Ripemd160::digest(public_key.serialize());

        let mut versioned_payload = vec![prefix];
        versioned_payload.extend_from_slice(&ripemd_hash);
        versioned_payload.extend_from_slice(&hashing::checksum(&versioned_payload));

        bs58::encode(&versioned_payload).into_string()
    }
}
