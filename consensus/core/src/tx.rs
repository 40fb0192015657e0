//!
//! # Transaction
//!
//! Genesis transaction records and their canonical byte form. The byte form
//! feeds three digests: the signing hash, the transaction id and the block
//! payload hash, so it must not change for identical field values.
//!

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Display;

use crate::amount::Amount;
use crate::constants::{ADDRESS_LENGTH, CORE_TYPE_GROUP, PUBLIC_KEY_LENGTH, TRANSACTION_HEADER, TRANSACTION_VERSION, VOTE_ADD, VOTE_REMOVE};
use crate::errors::{ConsensusError, ConsensusResult};
use crate::hashing;
use crate::sign::Signable;
use crate::Hash;

/// Core transaction types. The numeric value is the on-wire `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum TransactionType {
    Transfer = 0,
    SecondSignature = 1,
    DelegateRegistration = 2,
    Vote = 3,
    MultiSignature = 4,
    Ipfs = 5,
    MultiPayment = 6,
    DelegateResignation = 7,
}

impl TransactionType {
    /// Types whose fees are part of the base (height 1) schedule
    pub const CORE: [TransactionType; 5] = [
        TransactionType::Transfer,
        TransactionType::SecondSignature,
        TransactionType::DelegateRegistration,
        TransactionType::Vote,
        TransactionType::MultiSignature,
    ];

    /// Types enabled together with aip11
    pub const EXTENDED: [TransactionType; 3] =
        [TransactionType::Ipfs, TransactionType::MultiPayment, TransactionType::DelegateResignation];

    /// Key used for this type in fee tables
    pub fn fee_key(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "transfer",
            TransactionType::SecondSignature => "secondSignature",
            TransactionType::DelegateRegistration => "delegateRegistration",
            TransactionType::Vote => "vote",
            TransactionType::MultiSignature => "multiSignature",
            TransactionType::Ipfs => "ipfs",
            TransactionType::MultiPayment => "multiPayment",
            TransactionType::DelegateResignation => "delegateResignation",
        }
    }
}

impl TryFrom<u16> for TransactionType {
    type Error = ConsensusError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => TransactionType::Transfer,
            1 => TransactionType::SecondSignature,
            2 => TransactionType::DelegateRegistration,
            3 => TransactionType::Vote,
            4 => TransactionType::MultiSignature,
            5 => TransactionType::Ipfs,
            6 => TransactionType::MultiPayment,
            7 => TransactionType::DelegateResignation,
            other => return Err(ConsensusError::UnknownTransactionType(other)),
        })
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.fee_key())
    }
}

impl Serialize for TransactionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(*self as u16)
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u16::deserialize(deserializer)?;
        TransactionType::try_from(raw).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateAsset {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionAsset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate: Option<DelegateAsset>,
    /// Votes as `+<publicKey>` / `-<publicKey>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<Vec<String>>,
}

/// Represents a signed genesis transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub version: u8,
    pub network: u8,
    pub type_group: u32,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub nonce: u64,
    pub sender_public_key: String,
    pub fee: Amount,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<TransactionAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Transaction {
    /// Creates an unsigned transaction of `tx_type` for the given network byte.
    pub fn new(tx_type: TransactionType, network: u8, sender_public_key: String, nonce: u64, fee: Amount) -> Self {
        Self {
            id: String::new(),
            version: TRANSACTION_VERSION,
            network,
            type_group: CORE_TYPE_GROUP,
            tx_type,
            nonce,
            sender_public_key,
            fee,
            amount: Amount::zero(),
            recipient_id: None,
            vendor_field: None,
            asset: None,
            signature: None,
        }
    }

    /// Canonical bytes, optionally followed by the DER signature.
    pub fn to_bytes(&self, include_signature: bool) -> ConsensusResult<Vec<u8>> {
        let mut out = Vec::with_capacity(128);
        out.push(TRANSACTION_HEADER);
        out.push(self.version);
        out.push(self.network);
        out.extend_from_slice(&self.type_group.to_le_bytes());
        out.extend_from_slice(&(self.tx_type as u16).to_le_bytes());
        out.extend_from_slice(&self.nonce.to_le_bytes());
        out.extend_from_slice(&decode_fixed::<PUBLIC_KEY_LENGTH>("senderPublicKey", &self.sender_public_key)?);
        out.extend_from_slice(&self.fee.to_bytes()?);

        let vendor = self.vendor_field.as_deref().unwrap_or_default().as_bytes();
        out.push(u8::try_from(vendor.len()).map_err(|_| ConsensusError::FieldOverflow("vendorField"))?);
        out.extend_from_slice(vendor);

        self.write_asset(&mut out)?;

        if include_signature {
            if let Some(signature) = &self.signature {
                out.extend_from_slice(&hex::decode(signature).map_err(|source| ConsensusError::InvalidHex { field: "signature", source })?);
            }
        }
        Ok(out)
    }

    fn write_asset(&self, out: &mut Vec<u8>) -> ConsensusResult<()> {
        match self.tx_type {
            TransactionType::Transfer => {
                let recipient = self
                    .recipient_id
                    .as_deref()
                    .ok_or_else(|| ConsensusError::InvalidTransaction("transfer without recipient".to_string()))?;
                let recipient = decode_address(recipient)?;
                out.extend_from_slice(&self.amount.to_bytes()?);
                out.extend_from_slice(&0u32.to_le_bytes()); // expiration
                out.extend_from_slice(&recipient);
            }
            TransactionType::DelegateRegistration => {
                let username = self
                    .asset
                    .as_ref()
                    .and_then(|asset| asset.delegate.as_ref())
                    .map(|delegate| delegate.username.as_bytes())
                    .ok_or_else(|| ConsensusError::InvalidTransaction("registration without username".to_string()))?;
                out.push(u8::try_from(username.len()).map_err(|_| ConsensusError::FieldOverflow("username"))?);
                out.extend_from_slice(username);
            }
            TransactionType::Vote => {
                let votes = self
                    .asset
                    .as_ref()
                    .and_then(|asset| asset.votes.as_ref())
                    .ok_or_else(|| ConsensusError::InvalidTransaction("vote without votes".to_string()))?;
                out.push(u8::try_from(votes.len()).map_err(|_| ConsensusError::FieldOverflow("votes"))?);
                for vote in votes {
                    let (marker, key) = if let Some(key) = vote.strip_prefix('+') {
                        (VOTE_ADD, key)
                    } else if let Some(key) = vote.strip_prefix('-') {
                        (VOTE_REMOVE, key)
                    } else {
                        return Err(ConsensusError::InvalidTransaction(format!("malformed vote '{vote}'")));
                    };
                    out.push(marker);
                    out.extend_from_slice(&decode_fixed::<PUBLIC_KEY_LENGTH>("votes", key)?);
                }
            }
            other => {
                return Err(ConsensusError::InvalidTransaction(format!("{other} transactions are not produced at genesis")));
            }
        }
        Ok(())
    }

    /// Recomputes and stores the id from the signed bytes.
    pub fn finalize(&mut self) -> ConsensusResult<()> {
        self.id = hex::encode(hashing::sha256(&self.to_bytes(true)?));
        Ok(())
    }
}

impl Signable for Transaction {
    fn signing_hash(&self) -> ConsensusResult<Hash> {
        Ok(hashing::sha256(&self.to_bytes(false)?))
    }

    fn signer_public_key(&self) -> &str {
        &self.sender_public_key
    }

    fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    fn apply_signature(&mut self, signature: String) -> ConsensusResult<()> {
        self.signature = Some(signature);
        self.finalize()
    }
}

pub(crate) fn decode_fixed<const N: usize>(field: &'static str, value: &str) -> ConsensusResult<[u8; N]> {
    let bytes = hex::decode(value).map_err(|source| ConsensusError::InvalidHex { field, source })?;
    bytes.try_into().map_err(|_| ConsensusError::InvalidTransaction(format!("{field} must be {N} bytes")))
}

/// Base58Check-decodes an address to its prefix byte + 20-byte hash.
pub fn decode_address(address: &str) -> ConsensusResult<[u8; ADDRESS_LENGTH]> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| ConsensusError::InvalidTransaction(format!("malformed address '{address}': {e}")))?;
    if decoded.len() != ADDRESS_LENGTH + 4 {
        return Err(ConsensusError::InvalidTransaction(format!("address '{address}' has the wrong length")));
    }
    let (payload, checksum) = decoded.split_at(ADDRESS_LENGTH);
    if hashing::checksum(payload) != checksum {
        return Err(ConsensusError::InvalidTransaction(format!("address '{address}' has a bad checksum")));
    }
    let mut out = [0u8; ADDRESS_LENGTH];
    out.copy_from_slice(payload);
    Ok(out)
}
