//! Wires the domain operations/store functions to the [`MinerManagerApi`]
//! port, owning the active-proposer-set mirror.

use crate::adapters::proposal_set::ProposalSet;
use crate::domain::errors::MinerError;
use crate::domain::operations::{self, MinerOperationMessage};
use crate::domain::store;
use crate::ports::inbound::MinerManagerApi;
use qc_04_state_management::AccountDB;
use shared_types::{Address, Miner, MinerType, StakeDetail};
use std::sync::Arc;

pub struct MinerManagerService {
    proposal_set: Arc<ProposalSet>,
}

impl MinerManagerService {
    pub fn new(proposal_set: Arc<ProposalSet>) -> Self {
        Self { proposal_set }
    }
}

impl MinerManagerApi for MinerManagerService {
    fn execute_operation(&self, db: &mut dyn AccountDB, op: &MinerOperationMessage) -> Result<(), MinerError> {
        operations::execute_operation(db, op)
    }

    fn miner_freeze(&self, db: &mut dyn AccountDB, target: &Address, mtype: MinerType) -> Result<(), MinerError> {
        operations::miner_freeze(db, target, mtype)
    }

    fn miner_penalty(&self, db: &mut dyn AccountDB, penalty_targets: &[Address], reward_targets: &[Address], mtype: MinerType) -> Result<(), MinerError> {
        operations::miner_penalty(db, penalty_targets, reward_targets, mtype)
    }

    fn get_miner(&self, db: &dyn AccountDB, addr: &Address, mtype: MinerType) -> Option<Miner> {
        store::get_miner(db, addr, mtype)
    }

    fn get_all_miners(&self, db: &dyn AccountDB, mtype: MinerType) -> Vec<Miner> {
        store::get_all_miners(db, mtype)
    }

    fn get_proposal_total_stake(&self, db: &dyn AccountDB) -> u64 {
        store::get_proposal_total_stake(db)
    }

    fn get_stake_details(&self, db: &dyn AccountDB, target: &Address, source: &Address) -> Vec<StakeDetail> {
        store::get_stake_details(db, target, source)
    }

    fn get_all_stake_details(&self, db: &dyn AccountDB, target: &Address) -> Vec<StakeDetail> {
        store::get_all_stake_details(db, target)
    }

    fn is_active_proposer(&self, addr: &Address) -> bool {
        self.proposal_set.contains(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operations::MinerOperationKind;
    use qc_04_state_management::InMemoryAccountDb;
    use shared_types::BigInt;

    #[test]
    fn service_delegates_to_domain_functions() {
        let service = MinerManagerService::new(ProposalSet::new());
        let mut db = InMemoryAccountDb::new();
        let addr = Address([4u8; 32]);
        db.add_balance(&addr, BigInt::from(1_000_000u64));

        service
            .execute_operation(
                &mut db,
                &MinerOperationMessage {
                    kind: MinerOperationKind::StakeAdd,
                    source: addr,
                    target: addr,
                    mtype: MinerType::Verify,
                    value: 600_000,
                    height: 1,
                },
            )
            .unwrap();

        assert!(!service.is_active_proposer(&addr));
        assert_eq!(service.get_all_miners(&db, MinerType::Verify).len(), 1);
    }
}
