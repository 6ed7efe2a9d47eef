//! # Event Bus Adapter
//!
//! Publishes cast/reject outcomes so consensus (qc-08) and observability
//! consumers see proposals the instant they're sealed, without polling.

use crate::domain::entities::DriverOutcome;
use crate::domain::errors::DriverError;
use crate::ports::inbound::BlockProductionApi;
use crate::ports::outbound::Broadcaster;
use qc_04_state_management::AccountDB;
use shared_bus::events::BlockchainEvent;
use shared_bus::publisher::EventPublisher;
use shared_types::Hash;
use std::sync::Arc;

pub struct BlockProductionBusAdapter<D: BlockProductionApi, B: Broadcaster, P: EventPublisher> {
    driver: Arc<D>,
    broadcaster: Arc<B>,
    bus: Arc<P>,
}

impl<D: BlockProductionApi, B: Broadcaster, P: EventPublisher> BlockProductionBusAdapter<D, B, P> {
    pub fn new(driver: Arc<D>, broadcaster: Arc<B>, bus: Arc<P>) -> Self {
        Self { driver, broadcaster, bus }
    }

    pub async fn tick_and_publish(
        &self,
        db: &mut dyn AccountDB,
        height: u64,
        pre_hash: Hash,
        now_ms: i64,
    ) -> Result<DriverOutcome, DriverError> {
        let result = self.driver.on_tick(db, height, pre_hash, now_ms);

        match &result {
            Ok(DriverOutcome::Cast { message, .. }) => {
                self.broadcaster.broadcast_cast(message);
                self.bus
                    .publish(BlockchainEvent::BlockCast {
                        height: message.bh.height,
                        pre_hash: message.bh.pre_hash,
                        hash: message.bh.hash(),
                        proposer: message.bh.castor,
                    })
                    .await;
            }
            Err(err) => {
                self.bus
                    .publish(BlockchainEvent::BlockCastRejected { height, reason: err.to_string() })
                    .await;
            }
            _ => {}
        }

        result
    }
}
