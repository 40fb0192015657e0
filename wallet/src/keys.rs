use rand::{rngs::OsRng, RngCore};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

use crate::errors::{WalletError, WalletResult};

/// Bytes of entropy behind a 12-word phrase
const PHRASE_ENTROPY_BYTES: usize = 16;

/// Key pair derived from a secret phrase
#[derive(Clone)]
pub struct Keys {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Keys {
    /// Derive keys from a secret phrase: the private key is the SHA-256 of the
    /// phrase's UTF-8 bytes.
    pub fn from_passphrase(passphrase: &str) -> WalletResult<Self> {
        let digest = Zeroizing::new(<[u8; 32]>::from(Sha256::digest(passphrase.as_bytes())));
        let secret_key = SecretKey::from_slice(digest.as_slice()).map_err(|e| WalletError::InvalidSecretKey(e.to_string()))?;
        Ok(Self::from_secret_key(secret_key))
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self { secret_key, public_key }
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Compressed public key, hex encoded
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }
}

impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys").field("public_key", &self.public_key_hex()).finish_non_exhaustive()
    }
}

/// Generate a fresh 12-word BIP39 phrase from the operating system's CSPRNG.
///
/// Fails instead of falling back to a weaker source.
pub fn generate_passphrase() -> WalletResult<String> {
    let mut entropy = Zeroizing::new([0u8; PHRASE_ENTROPY_BYTES]);
    OsRng.try_fill_bytes(entropy.as_mut_slice()).map_err(|e| WalletError::Entropy(e.to_string()))?;
    let mnemonic = bip39::Mnemonic::from_entropy(entropy.as_slice()).map_err(|e| WalletError::Mnemonic(e.to_string()))?;
    Ok(mnemonic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation_is_deterministic() {
        let a = Keys::from_passphrase("this is a top secret passphrase").unwrap();
        let b = Keys::from_passphrase("this is a top secret passphrase").unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.public_key_hex().len(), 66);

        let c = Keys::from_passphrase("this is another passphrase").unwrap();
        assert_ne!(a.public_key(), c.public_key());
    }

    #[test]
    fn test_secret_is_sha256_of_phrase() {
        let keys = Keys::from_passphrase("abc").unwrap();
        let expected = Sha256::digest(b"abc");
        assert_eq!(keys.secret_key().secret_bytes().as_slice(), expected.as_slice());
    }

    #[test]
    fn test_generated_phrases_are_twelve_words_and_distinct() {
        let a = generate_passphrase().unwrap();
        let b = generate_passphrase().unwrap();
        assert_eq!(a.split(' ').count(), 12);
        assert!(bip39::Mnemonic::parse(&a).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_hides_secret() {
        let keys = Keys::from_passphrase("hidden").unwrap();
        let debug = format!("{keys:?}");
        assert!(!debug.contains(&hex::encode(keys.secret_key().secret_bytes())));
    }
}
