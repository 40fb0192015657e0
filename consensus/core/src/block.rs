use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::constants::{BLOCK_VERSION, GENESIS_HEIGHT, GENESIS_TIMESTAMP, PUBLIC_KEY_LENGTH};
use crate::errors::{ConsensusError, ConsensusResult};
use crate::hashing::{self, tx::calc_payload_hash};
use crate::sign::Signable;
use crate::tx::{decode_fixed, Transaction};
use crate::Hash;

/// The height-1 block that seeds balances and the delegate set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisBlock {
    pub id: String,
    pub version: u32,
    pub timestamp: u32,
    pub height: u32,
    /// Always null: the genesis block has no predecessor
    pub previous_block: Option<String>,
    pub number_of_transactions: u32,
    pub total_amount: Amount,
    pub total_fee: Amount,
    pub reward: Amount,
    pub payload_length: u32,
    pub payload_hash: String,
    pub generator_public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_signature: Option<String>,
    pub transactions: Vec<Transaction>,
}

impl GenesisBlock {
    /// Builds an unsigned genesis block over `transactions`, in the given order.
    pub fn new(generator_public_key: String, transactions: Vec<Transaction>) -> ConsensusResult<Self> {
        let (payload_hash, payload_length) = calc_payload_hash(&transactions)?;
        let number_of_transactions =
            u32::try_from(transactions.len()).map_err(|_| ConsensusError::FieldOverflow("numberOfTransactions"))?;
        let total_amount = transactions.iter().map(|tx| &tx.amount).sum();
        let total_fee = transactions.iter().map(|tx| &tx.fee).sum();

        Ok(Self {
            id: String::new(),
            version: BLOCK_VERSION,
            timestamp: GENESIS_TIMESTAMP,
            height: GENESIS_HEIGHT,
            previous_block: None,
            number_of_transactions,
            total_amount,
            total_fee,
            reward: Amount::zero(),
            payload_length,
            payload_hash: hex::encode(payload_hash),
            generator_public_key,
            block_signature: None,
            transactions,
        })
    }

    /// Canonical header bytes, optionally followed by the block signature.
    pub fn header_bytes(&self, include_signature: bool) -> ConsensusResult<Vec<u8>> {
        let mut out = Vec::with_capacity(160);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&[0u8; 8]); // previous block
        out.extend_from_slice(&self.number_of_transactions.to_le_bytes());
        out.extend_from_slice(&self.total_amount.to_bytes()?);
        out.extend_from_slice(&self.total_fee.to_bytes()?);
        out.extend_from_slice(&self.reward.to_bytes()?);
        out.extend_from_slice(&self.payload_length.to_le_bytes());
        out.extend_from_slice(&decode_fixed::<32>("payloadHash", &self.payload_hash)?);
        out.extend_from_slice(&decode_fixed::<PUBLIC_KEY_LENGTH>("generatorPublicKey", &self.generator_public_key)?);
        if include_signature {
            if let Some(signature) = &self.block_signature {
                out.extend_from_slice(
                    &hex::decode(signature).map_err(|source| ConsensusError::InvalidHex { field: "blockSignature", source })?,
                );
            }
        }
        Ok(out)
    }

    /// Content identifier: SHA-256 of the signed header.
    pub fn calc_id(&self) -> ConsensusResult<Hash> {
        Ok(hashing::sha256(&self.header_bytes(true)?))
    }

    /// Payload hash recomputed from the transaction list, independent of the
    /// stored `payload_hash` field.
    pub fn recompute_payload(&self) -> ConsensusResult<(String, u32)> {
        let (hash, length) = calc_payload_hash(&self.transactions)?;
        Ok((hex::encode(hash), length))
    }

    /// The network identifier derived from this block.
    pub fn nethash(&self) -> &str {
        &self.payload_hash
    }
}

impl Signable for GenesisBlock {
    fn signing_hash(&self) -> ConsensusResult<Hash> {
        Ok(hashing::sha256(&self.header_bytes(false)?))
    }

    fn signer_public_key(&self) -> &str {
        &self.generator_public_key
    }

    fn signature(&self) -> Option<&str> {
        self.block_signature.as_deref()
    }

    fn apply_signature(&mut self, signature: String) -> ConsensusResult<()> {
        self.block_signature = Some(signature);
        self.id = hex::encode(self.calc_id()?);
        Ok(())
    }
}
