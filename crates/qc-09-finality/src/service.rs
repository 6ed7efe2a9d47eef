//! Wires [`Finalizer`] to the [`FinalityApi`] port.

use crate::domain::entities::FinalizationOutcome;
use crate::domain::errors::FinalityError;
use crate::domain::finalizer::Finalizer;
use crate::ports::inbound::FinalityApi;
use qc_04_state_management::{AccountDB, ChainStore};
use qc_06_mempool::MempoolApi;
use qc_08_consensus::RecoveredBlock;
use qc_12_transaction_executor::TransactionExecutorApi;
use std::sync::Arc;

pub struct FinalityService {
    finalizer: Finalizer,
}

impl FinalityService {
    pub fn new(chain: Arc<dyn ChainStore>, executor: Arc<dyn TransactionExecutorApi>, mempool: Arc<dyn MempoolApi>) -> Self {
        Self { finalizer: Finalizer::new(chain, executor, mempool) }
    }
}

impl FinalityApi for FinalityService {
    fn apply_recovered(&self, db: &mut dyn AccountDB, recovered: RecoveredBlock) -> Result<FinalizationOutcome, FinalityError> {
        self.finalizer.apply_recovered(db, recovered)
    }
}
