use consensus_core::sign::Signable;
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1};

use crate::errors::{WalletError, WalletResult};
use crate::keys::Keys;

/// ECDSA signer for genesis transactions and blocks
pub struct Signer {
    secp: Secp256k1<secp256k1::All>,
}

impl Default for Signer {
    fn default() -> Self {
        Self::new()
    }
}

impl Signer {
    /// Create new signer
    pub fn new() -> Self {
        Self { secp: Secp256k1::new() }
    }

    /// Signs `item` with `keys`; the keys must belong to the record's declared
    /// signer.
    pub fn sign<T: Signable>(&self, item: &mut T, keys: &Keys) -> WalletResult<()> {
        let public_key = keys.public_key_hex();
        if item.signer_public_key() != public_key {
            return Err(WalletError::SignerMismatch { expected: item.signer_public_key().to_string(), actual: public_key });
        }

        let hash = item.signing_hash()?;
        let message = Message::from_slice(&hash).map_err(|e| WalletError::Signature(format!("Invalid message: {}", e)))?;
        let signature = self.secp.sign_ecdsa(&message, keys.secret_key());

        item.apply_signature(hex::encode(signature.serialize_der()))?;
        Ok(())
    }

    /// Checks the stored signature against the record's declared signer.
    /// Unsigned records verify as `false`.
    pub fn verify<T: Signable>(&self, item: &T) -> WalletResult<bool> {
        let Some(signature) = item.signature() else {
            return Ok(false);
        };

        let signature = hex::decode(signature).map_err(|e| WalletError::Signature(format!("Invalid signature hex: {}", e)))?;
        let signature = Signature::from_der(&signature).map_err(|e| WalletError::Signature(format!("Invalid signature: {}", e)))?;

        let public_key = hex::decode(item.signer_public_key()).map_err(|e| WalletError::InvalidPublicKey(e.to_string()))?;
        let public_key = PublicKey::from_slice(&public_key).map_err(|e| WalletError::InvalidPublicKey(e.to_string()))?;

        let hash = item.signing_hash()?;
        let message = Message::from_slice(&hash).map_err(|e| WalletError::Signature(format!("Invalid message: {}", e)))?;

        Ok(self.secp.verify_ecdsa(&message, &signature, &public_key).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::tx::{DelegateAsset, Transaction, TransactionAsset, TransactionType};
    use consensus_core::Amount;

    fn registration(keys: &Keys) -> Transaction {
        let mut tx = Transaction::new(TransactionType::DelegateRegistration, 23, keys.public_key_hex(), 1, Amount::from(25));
        tx.asset = Some(TransactionAsset { delegate: Some(DelegateAsset { username: "genesis_1".to_string() }), votes: None });
        tx
    }

    #[test]
    fn test_sign_and_verify() {
        let keys = Keys::from_passphrase("signer").unwrap();
        let signer = Signer::new();

        let mut tx = registration(&keys);
        assert!(!signer.verify(&tx).unwrap());

        signer.sign(&mut tx, &keys).unwrap();
        assert!(tx.signature.is_some());
        assert_eq!(tx.id.len(), 64);
        assert!(signer.verify(&tx).unwrap());
    }

    #[test]
    fn test_tampering_breaks_signature() {
        let keys = Keys::from_passphrase("signer").unwrap();
        let signer = Signer::new();
        let mut tx = registration(&keys);
        signer.sign(&mut tx, &keys).unwrap();

        tx.fee = Amount::from(26);
        assert!(!signer.verify(&tx).unwrap());
    }

    #[test]
    fn test_refuses_foreign_keys() {
        let owner = Keys::from_passphrase("owner").unwrap();
        let other = Keys::from_passphrase("other").unwrap();
        let mut tx = registration(&owner);
        assert!(matches!(Signer::new().sign(&mut tx, &other), Err(WalletError::SignerMismatch { .. })));
        assert!(tx.signature.is_none());
    }
}
