use crate::errors::ConsensusResult;
use crate::Hash;

/// A record that carries a single signature over its own canonical bytes.
///
/// Implemented by genesis transactions and the genesis block so that one
/// signer can produce and check both.
pub trait Signable {
    /// SHA-256 of the canonical bytes without the signature.
    fn signing_hash(&self) -> ConsensusResult<Hash>;

    /// Hex-encoded compressed public key expected to have signed this record.
    fn signer_public_key(&self) -> &str;

    /// Hex-encoded DER signature, if signed.
    fn signature(&self) -> Option<&str>;

    /// Stores the signature and refreshes anything derived from it (ids).
    fn apply_signature(&mut self, signature: String) -> ConsensusResult<()>;
}
