use consensus_core::block::GenesisBlock;
use consensus_core::config::ProvisionalNetwork;
use consensus_core::tx::Transaction;
use consensus_core::Amount;
use tracing::debug;
use wallet::{Signer, Wallet};

use crate::errors::{DeployError, DeployResult};

/// Assembles and signs the genesis block over `transactions`, kept in the
/// given order. Every transaction must target the provisional network.
pub fn assemble_block(
    transactions: Vec<Transaction>,
    genesis: &Wallet,
    network: &ProvisionalNetwork,
    signer: &Signer,
) -> DeployResult<GenesisBlock> {
    if let Some(tx) = transactions.iter().find(|tx| tx.network != network.pub_key_hash()) {
        return Err(DeployError::Genesis(format!(
            "transaction {} targets network byte {}, expected {}",
            tx.id,
            tx.network,
            network.pub_key_hash()
        )));
    }

    let mut block = GenesisBlock::new(genesis.public_key(), transactions)?;
    signer.sign(&mut block, genesis.keys())?;
    debug!(id = %block.id, payload_hash = %block.payload_hash, "assembled genesis block");
    Ok(block)
}

/// Local consistency check of an assembled block: recomputed payload and
/// totals, zero reward, and valid signatures on the block and on every
/// transaction.
pub fn verify_block(block: &GenesisBlock, signer: &Signer) -> DeployResult<()> {
    let (payload_hash, payload_length) = block.recompute_payload()?;
    if payload_hash != block.payload_hash || payload_length != block.payload_length {
        return Err(DeployError::Genesis("payload hash does not match the transaction list".to_string()));
    }
    if block.number_of_transactions as usize != block.transactions.len() {
        return Err(DeployError::Genesis("transaction count does not match the transaction list".to_string()));
    }
    let total_amount: Amount = block.transactions.iter().map(|tx| &tx.amount).sum();
    let total_fee: Amount = block.transactions.iter().map(|tx| &tx.fee).sum();
    if total_amount != block.total_amount || total_fee != block.total_fee {
        return Err(DeployError::Genesis("block totals do not match the transaction list".to_string()));
    }
    if !block.reward.is_zero() || block.previous_block.is_some() {
        return Err(DeployError::Genesis("genesis block must have no reward and no predecessor".to_string()));
    }
    if !signer.verify(block)? {
        return Err(DeployError::Genesis("block signature does not verify".to_string()));
    }
    if block.id != hex::encode(block.calc_id()?) {
        return Err(DeployError::Genesis("block id does not match the signed header".to_string()));
    }
    for tx in &block.transactions {
        if !signer.verify(tx)? {
            return Err(DeployError::Genesis(format!("transaction {} has an invalid signature", tx.id)));
        }
    }
    Ok(())
}
