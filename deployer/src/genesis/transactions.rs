use consensus_core::config::milestones::StaticFeeTable;
use consensus_core::config::{Params, ProvisionalNetwork};
use consensus_core::tx::{Transaction, TransactionType};
use consensus_core::Amount;
use tracing::{debug, warn};
use wallet::{GenesisIdentities, Signer, TxBuilder};

use crate::errors::{DeployError, DeployResult};

/// Username registered by the delegate at `index` (zero based)
pub fn delegate_username(index: usize) -> String {
    format!("genesis_{}", index + 1)
}

fn static_fee(fees: &StaticFeeTable, tx_type: TransactionType) -> DeployResult<Amount> {
    fees.get(tx_type)
        .map(Amount::from)
        .ok_or_else(|| DeployError::Genesis(format!("base milestone has no static fee for {tx_type}")))
}

/// Builds the signed genesis transaction set in block order: every funding
/// transfer, then every delegate registration, then every self-vote.
///
/// The premine is split evenly with the remainder going to the last
/// delegate. Funding transfers carry no fee so the genesis wallet spends
/// exactly the premine; registration and vote fees come out of each
/// delegate's own share.
pub fn assemble_transactions(
    identities: &GenesisIdentities,
    params: &Params,
    base_fees: &StaticFeeTable,
    network: &ProvisionalNetwork,
    signer: &Signer,
) -> DeployResult<Vec<Transaction>> {
    let net = network.pub_key_hash();
    let genesis = &identities.genesis;
    let delegates = &identities.delegates;
    let forgers = u32::try_from(delegates.len()).map_err(|_| DeployError::Genesis("too many delegates".to_string()))?;
    if forgers == 0 {
        return Err(DeployError::Genesis("at least one delegate is required".to_string()));
    }

    let registration_fee = static_fee(base_fees, TransactionType::DelegateRegistration)?;
    let vote_fee = static_fee(base_fees, TransactionType::Vote)?;
    let shares = params.total_premine.split(forgers);

    let mut transactions = Vec::with_capacity(delegates.len() * 3);

    for (index, (delegate, share)) in delegates.iter().zip(&shares).enumerate() {
        if *share < &registration_fee + &vote_fee {
            warn!(delegate = index + 1, "delegate share does not cover its registration and vote fees");
        }
        let tx = TxBuilder::transfer(net, genesis, delegate.address(), share.clone())
            .nonce(index as u64 + 1)
            .fee(Amount::zero())
            .sign(signer, genesis)?;
        transactions.push(tx);
    }

    for (index, delegate) in delegates.iter().enumerate() {
        let tx = TxBuilder::delegate_registration(net, delegate, &delegate_username(index))
            .nonce(1)
            .fee(registration_fee.clone())
            .sign(signer, delegate)?;
        transactions.push(tx);
    }

    for delegate in delegates {
        let tx = TxBuilder::vote(net, delegate, &[delegate.public_key()])
            .nonce(2)
            .fee(vote_fee.clone())
            .sign(signer, delegate)?;
        transactions.push(tx);
    }

    check_genesis_spend(&transactions, &genesis.public_key(), &params.total_premine)?;
    debug!(count = transactions.len(), "assembled genesis transactions");
    Ok(transactions)
}

/// The genesis wallet has no balance beyond the premine: its outgoing
/// amounts plus fees may not exceed it.
pub fn check_genesis_spend(transactions: &[Transaction], genesis_public_key: &str, premine: &Amount) -> DeployResult<()> {
    let spent: Amount = transactions
        .iter()
        .filter(|tx| tx.sender_public_key == genesis_public_key)
        .map(|tx| &tx.amount + &tx.fee)
        .sum();
    if spent > *premine {
        return Err(DeployError::Genesis(format!("genesis wallet spends {spent}, more than the premine of {premine}")));
    }
    Ok(())
}
