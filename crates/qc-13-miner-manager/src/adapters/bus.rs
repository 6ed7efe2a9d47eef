//! # Event Bus Adapter
//!
//! Publishes miner status and stake changes so the proposer-set listener
//! and observability consumers see them without polling the account DB.

use crate::domain::errors::MinerError;
use crate::domain::operations::MinerOperationMessage;
use crate::ports::inbound::MinerManagerApi;
use qc_04_state_management::AccountDB;
use shared_bus::events::BlockchainEvent;
use shared_bus::publisher::EventPublisher;
use std::sync::Arc;

pub struct MinerManagerBusAdapter<M: MinerManagerApi, P: EventPublisher> {
    manager: Arc<M>,
    bus: Arc<P>,
}

impl<M: MinerManagerApi, P: EventPublisher> MinerManagerBusAdapter<M, P> {
    pub fn new(manager: Arc<M>, bus: Arc<P>) -> Self {
        Self { manager, bus }
    }

    pub async fn execute_and_publish(&self, db: &mut dyn AccountDB, op: &MinerOperationMessage) -> Result<(), MinerError> {
        self.manager.execute_operation(db, op)?;

        let miner = self.manager.get_miner(db, &op.target, op.mtype);
        if let Some(miner) = miner {
            self.bus
                .publish(BlockchainEvent::MinerStatusChanged {
                    address: miner.id,
                    status: miner.status,
                    height: op.height,
                })
                .await;
            self.bus
                .publish(BlockchainEvent::StakeOperationCommitted {
                    address: op.target,
                    height: op.height,
                    new_total_stake: miner.stake,
                })
                .await;
        }
        Ok(())
    }
}
