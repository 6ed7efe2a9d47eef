//! # Transaction Executor Service
//!
//! Wires the deterministic executor (`domain::executor`) to the
//! `ContractVm` (qc-11) and `MinerManagerApi` (qc-13) capabilities it
//! dispatches into.

use crate::domain::entities::BlockExecutionOutcome;
use crate::domain::executor;
use crate::ports::inbound::TransactionExecutorApi;
use qc_04_state_management::AccountDB;
use qc_11_smart_contracts::ContractVm;
use qc_13_miner_manager::MinerManagerApi;
use shared_types::{BlockHeader, RawTransaction};
use std::sync::Arc;

pub struct TransactionExecutorService {
    vm: Arc<dyn ContractVm>,
    miner_manager: Arc<dyn MinerManagerApi>,
}

impl TransactionExecutorService {
    pub fn new(vm: Arc<dyn ContractVm>, miner_manager: Arc<dyn MinerManagerApi>) -> Self {
        Self { vm, miner_manager }
    }
}

impl TransactionExecutorApi for TransactionExecutorService {
    fn execute(&self, db: &mut dyn AccountDB, header: &BlockHeader, txs: &[RawTransaction], packing: bool) -> BlockExecutionOutcome {
        executor::execute(db, self.vm.as_ref(), self.miner_manager.as_ref(), header, txs, packing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_04_state_management::InMemoryAccountDb;
    use qc_11_smart_contracts::ReferenceVm;
    use qc_13_miner_manager::MinerManagerService;
    use shared_types::{Address, BlockHeader};

    #[test]
    fn service_delegates_to_domain_executor() {
        let service = TransactionExecutorService::new(
            Arc::new(ReferenceVm::new()),
            Arc::new(MinerManagerService::new(qc_13_miner_manager::ProposalSet::new())),
        );
        let mut db = InMemoryAccountDb::new();
        let header = BlockHeader {
            height: 1,
            pre_hash: [0u8; 32],
            elapsed_ms: 100,
            prove_value: vec![],
            total_qn: 0,
            cur_time: 0,
            castor: Address([1u8; 32]),
            group: [0u8; 32],
            signature: vec![],
            nonce: 0,
            tx_tree: [0u8; 32],
            receipt_tree: [0u8; 32],
            state_tree: [0u8; 32],
            extra_data: vec![],
            random: vec![],
            gas_fee: 0,
        };
        let outcome = service.execute(&mut db, &header, &[], false);
        assert!(outcome.executed.is_empty());
    }
}
