//! Wires [`BlockProductionDriver`] to the [`BlockProductionApi`] port.

use crate::domain::driver::BlockProductionDriver;
use crate::domain::entities::{DriverOutcome, NodeIdentity};
use crate::domain::errors::DriverError;
use crate::ports::inbound::BlockProductionApi;
use qc_04_state_management::{AccountDB, ChainStore};
use qc_06_mempool::MempoolApi;
use qc_08_consensus::ports::outbound::LocalSigner;
use qc_08_consensus::{CastOutcome, ConsensusApi, ConsensusError, VerifyOutcome};
use qc_12_transaction_executor::TransactionExecutorApi;
use qc_13_miner_manager::MinerManagerApi;
use shared_types::{ConsensusCastMessage, ConsensusVerifyMessage, Hash, RawTransaction};
use std::sync::Arc;

pub struct BlockProductionService {
    driver: BlockProductionDriver,
}

impl BlockProductionService {
    pub fn new(
        chain: Arc<dyn ChainStore>,
        mempool: Arc<dyn MempoolApi>,
        executor: Arc<dyn TransactionExecutorApi>,
        miner_manager: Arc<dyn MinerManagerApi>,
        consensus: Arc<dyn ConsensusApi>,
        signer: Arc<dyn LocalSigner>,
        identity: NodeIdentity,
    ) -> Self {
        Self { driver: BlockProductionDriver::new(chain, mempool, executor, miner_manager, consensus, signer, identity) }
    }
}

impl BlockProductionApi for BlockProductionService {
    fn on_tick(&self, db: &mut dyn AccountDB, height: u64, pre_hash: Hash, now_ms: i64) -> Result<DriverOutcome, DriverError> {
        self.driver.on_tick(db, height, pre_hash, now_ms)
    }

    fn on_message_cast(
        &self,
        db: &dyn AccountDB,
        msg: &ConsensusCastMessage,
        txs: &[RawTransaction],
    ) -> Result<(CastOutcome, Vec<ConsensusVerifyMessage>), ConsensusError> {
        self.driver.on_message_cast(db, msg, txs)
    }

    fn on_message_verify(&self, msg: &ConsensusVerifyMessage) -> Result<VerifyOutcome, ConsensusError> {
        self.driver.on_message_verify(msg)
    }
}
