use consensus_core::tx::{DelegateAsset, Transaction, TransactionAsset, TransactionType};
use consensus_core::Amount;

use crate::errors::WalletResult;
use crate::identity::Wallet;
use crate::signer::Signer;

/// Transaction builder for creating and signing transactions
pub struct TxBuilder {
    tx: Transaction,
}

impl TxBuilder {
    fn new(tx_type: TransactionType, network: u8, sender: &Wallet) -> Self {
        Self { tx: Transaction::new(tx_type, network, sender.public_key(), 1, Amount::zero()) }
    }

    /// Transfer of `amount` to `recipient`
    pub fn transfer(network: u8, sender: &Wallet, recipient: &str, amount: Amount) -> Self {
        let mut builder = Self::new(TransactionType::Transfer, network, sender);
        builder.tx.recipient_id = Some(recipient.to_string());
        builder.tx.amount = amount;
        builder
    }

    /// Registers the sender as a delegate under `username`
    pub fn delegate_registration(network: u8, sender: &Wallet, username: &str) -> Self {
        let mut builder = Self::new(TransactionType::DelegateRegistration, network, sender);
        builder.tx.asset = Some(TransactionAsset {
            delegate: Some(DelegateAsset { username: username.to_string() }),
            votes: None,
        });
        builder
    }

    /// Votes for the delegates behind `public_keys`
    pub fn vote(network: u8, sender: &Wallet, public_keys: &[String]) -> Self {
        let mut builder = Self::new(TransactionType::Vote, network, sender);
        builder.tx.asset = Some(TransactionAsset {
            delegate: None,
            votes: Some(public_keys.iter().map(|key| format!("+{key}")).collect()),
        });
        builder
    }

    /// Set fee
    pub fn fee(mut self, fee: impl Into<Amount>) -> Self {
        self.tx.fee = fee.into();
        self
    }

    /// Set sender nonce
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.tx.nonce = nonce;
        self
    }

    /// Signs with the sender's keys and returns the finished transaction
    pub fn sign(self, signer: &Signer, sender: &Wallet) -> WalletResult<Transaction> {
        let mut tx = self.tx;
        signer.sign(&mut tx, sender.keys())?;
        Ok(tx)
    }
}
