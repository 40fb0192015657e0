use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::params::{Params, StaticFees};
use crate::errors::{ConsensusError, ConsensusResult};
use crate::tx::TransactionType;

/// Block limits carried by the base milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLimits {
    pub version: u32,
    pub max_transactions: u32,
    pub max_payload: u64,
}

/// Sparse static fee table; absent types inherit from earlier milestones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticFeeTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_signature: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate_registration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_signature: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipfs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_payment: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate_resignation: Option<u64>,
}

impl StaticFeeTable {
    /// Table holding only the given types' fees.
    pub fn for_types(fees: &StaticFees, types: &[TransactionType]) -> Self {
        let mut table = Self::default();
        for &tx_type in types {
            *table.slot(tx_type) = Some(fees.get(tx_type));
        }
        table
    }

    pub fn get(&self, tx_type: TransactionType) -> Option<u64> {
        match tx_type {
            TransactionType::Transfer => self.transfer,
            TransactionType::SecondSignature => self.second_signature,
            TransactionType::DelegateRegistration => self.delegate_registration,
            TransactionType::Vote => self.vote,
            TransactionType::MultiSignature => self.multi_signature,
            TransactionType::Ipfs => self.ipfs,
            TransactionType::MultiPayment => self.multi_payment,
            TransactionType::DelegateResignation => self.delegate_resignation,
        }
    }

    fn slot(&mut self, tx_type: TransactionType) -> &mut Option<u64> {
        match tx_type {
            TransactionType::Transfer => &mut self.transfer,
            TransactionType::SecondSignature => &mut self.second_signature,
            TransactionType::DelegateRegistration => &mut self.delegate_registration,
            TransactionType::Vote => &mut self.vote,
            TransactionType::MultiSignature => &mut self.multi_signature,
            TransactionType::Ipfs => &mut self.ipfs,
            TransactionType::MultiPayment => &mut self.multi_payment,
            TransactionType::DelegateResignation => &mut self.delegate_resignation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneFees {
    pub static_fees: StaticFeeTable,
}

/// A height-keyed override of protocol parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub height: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_delegates: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocktime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockLimits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<MilestoneFees>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_field_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub htlc_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aip11: Option<bool>,
}

impl Milestone {
    pub fn at(height: u64) -> Self {
        Self { height, ..Default::default() }
    }
}

/// Builds the milestone schedule for a parameter set.
///
/// Height 1 carries the full base schedule, height 2 turns on aip11 with the
/// extended fee types. The reward either lands on height 1 or on its own
/// activation height; an activation height that already has a milestone is
/// merged into it so heights stay unique.
pub fn compose_milestones(params: &Params) -> Vec<Milestone> {
    let immediate_reward = params.reward_height <= 1;

    let base = Milestone {
        height: 1,
        reward: Some(if immediate_reward { params.reward_per_block } else { 0 }),
        active_delegates: Some(params.forgers),
        blocktime: Some(params.block_time),
        block: Some(BlockLimits {
            version: 0,
            max_transactions: params.transactions_per_block,
            max_payload: params.max_payload(),
        }),
        epoch: Some(params.epoch.clone()),
        fees: Some(MilestoneFees { static_fees: StaticFeeTable::for_types(&params.fees, &TransactionType::CORE) }),
        vendor_field_length: Some(params.vendor_field_length),
        htlc_enabled: Some(false),
        aip11: Some(false),
    };

    let aip11 = Milestone {
        aip11: Some(true),
        fees: Some(MilestoneFees { static_fees: StaticFeeTable::for_types(&params.fees, &TransactionType::EXTENDED) }),
        ..Milestone::at(2)
    };

    let mut milestones = vec![base, aip11];
    if !immediate_reward {
        set_reward_at(&mut milestones, params.reward_height, params.reward_per_block);
    }
    debug!(count = milestones.len(), reward_height = params.reward_height, "composed milestones");
    milestones
}

/// Sets `reward` at `height`, reusing an existing milestone at that height or
/// inserting a new one in ascending position.
fn set_reward_at(milestones: &mut Vec<Milestone>, height: u64, reward: u64) {
    match milestones.binary_search_by_key(&height, |m| m.height) {
        Ok(index) => milestones[index].reward = Some(reward),
        Err(index) => milestones.insert(index, Milestone { reward: Some(reward), ..Milestone::at(height) }),
    }
}

/// Confirms heights are strictly ascending, hence unique, and that the
/// schedule starts at height 1.
pub fn check_order(milestones: &[Milestone]) -> ConsensusResult<()> {
    match milestones.first() {
        Some(first) if first.height == 1 => {}
        Some(first) => return Err(ConsensusError::MilestoneOrder(first.height)),
        None => return Err(ConsensusError::MilestoneOrder(0)),
    }
    for pair in milestones.windows(2) {
        if pair[1].height <= pair[0].height {
            return Err(ConsensusError::MilestoneOrder(pair[1].height));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(reward_height: u64) -> Params {
        Params { reward_height, reward_per_block: 10, ..Params::default() }
    }

    fn heights(milestones: &[Milestone]) -> Vec<u64> {
        milestones.iter().map(|m| m.height).collect()
    }

    #[test]
    fn test_heights_ascending_for_any_reward_height() {
        for reward_height in [1, 2, 3, 100, 75_600, u64::MAX] {
            let milestones = compose_milestones(&params(reward_height));
            check_order(&milestones).unwrap();
        }
    }

    #[test]
    fn test_immediate_reward_goes_on_base() {
        let milestones = compose_milestones(&params(1));
        assert_eq!(heights(&milestones), vec![1, 2]);
        assert_eq!(milestones[0].reward, Some(10));
        assert_eq!(milestones[1].reward, None);
    }

    #[test]
    fn test_later_reward_gets_own_milestone() {
        let milestones = compose_milestones(&params(75_600));
        assert_eq!(heights(&milestones), vec![1, 2, 75_600]);
        assert_eq!(milestones[0].reward, Some(0));
        assert_eq!(milestones[2], Milestone { reward: Some(10), ..Milestone::at(75_600) });
    }

    #[test]
    fn test_default_params_reward_from_first_block() {
        let defaults = Params::default();
        let milestones = compose_milestones(&defaults);
        assert_eq!(heights(&milestones), vec![1, 2]);
        assert_eq!(milestones[0].reward, Some(defaults.reward_per_block));
    }

    #[test]
    fn test_reward_at_height_two_is_merged() {
        let milestones = compose_milestones(&params(2));
        assert_eq!(heights(&milestones), vec![1, 2]);
        assert_eq!(milestones[1].reward, Some(10));
        assert_eq!(milestones[1].aip11, Some(true));
    }

    #[test]
    fn test_base_schedule() {
        let p = Params { forgers: 25, transactions_per_block: 100, ..params(1) };
        let base = &compose_milestones(&p)[0];
        assert_eq!(base.active_delegates, Some(25));
        assert_eq!(base.block.as_ref().unwrap().max_payload, (2_097_152 / 50) * 100);
        assert_eq!(base.htlc_enabled, Some(false));

        let fees = &base.fees.as_ref().unwrap().static_fees;
        for tx_type in TransactionType::CORE {
            assert_eq!(fees.get(tx_type), Some(p.fees.get(tx_type)));
        }
        for tx_type in TransactionType::EXTENDED {
            assert_eq!(fees.get(tx_type), None);
        }
    }

    #[test]
    fn test_json_is_sparse_camel_case() {
        let json = serde_json::to_value(compose_milestones(&params(1))).unwrap();
        assert_eq!(json[0]["activeDelegates"], 51);
        assert_eq!(json[0]["fees"]["staticFees"]["delegateRegistration"], 2_500_000_000u64);
        assert!(json[1].get("activeDelegates").is_none());
        assert!(json[1]["fees"]["staticFees"].get("transfer").is_none());
        assert_eq!(json[1]["fees"]["staticFees"]["multiPayment"], 10_000_000);
    }

    #[test]
    fn test_check_order_rejects_duplicates() {
        let milestones = vec![Milestone::at(1), Milestone::at(2), Milestone::at(2)];
        assert!(matches!(check_order(&milestones), Err(ConsensusError::MilestoneOrder(2))));
        assert!(check_order(&[Milestone::at(2)]).is_err());
    }
}
