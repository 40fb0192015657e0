//! Genesis state: identities, the signed transaction set and the block.

pub mod block;
pub mod transactions;

use consensus_core::block::GenesisBlock;
use consensus_core::config::milestones::StaticFeeTable;
use consensus_core::config::{Params, ProvisionalNetwork};
use tracing::info;
use wallet::{GenesisIdentities, Signer};

use crate::errors::DeployResult;

pub use block::{assemble_block, verify_block};
pub use transactions::assemble_transactions;

/// Everything the genesis phase hands to the writer
#[derive(Debug)]
pub struct Genesis {
    pub identities: GenesisIdentities,
    pub block: GenesisBlock,
}

/// Derives identities, assembles and signs the transactions and the block,
/// then self-checks the result. Nothing here touches the filesystem.
pub fn build_genesis(params: &Params, base_fees: &StaticFeeTable, network: &ProvisionalNetwork) -> DeployResult<Genesis> {
    let identities = wallet::derive_identities(params.forgers, network.pub_key_hash())?;
    info!(delegates = identities.delegates.len(), genesis = %identities.genesis.address(), "derived genesis identities");

    let signer = Signer::new();
    let transactions = assemble_transactions(&identities, params, base_fees, network, &signer)?;
    let block = assemble_block(transactions, &identities.genesis, network, &signer)?;
    verify_block(&block, &signer)?;
    info!(id = %block.id, nethash = %block.nethash(), transactions = block.number_of_transactions, "genesis block ready");

    Ok(Genesis { identities, block })
}
