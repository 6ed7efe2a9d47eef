//! # Event Bus Adapter
//!
//! Publishes admission outcomes so the block-production driver and
//! observability consumers see pool activity without polling it.

use crate::domain::entities::Tier;
use crate::domain::errors::MempoolError;
use crate::ports::inbound::MempoolApi;
use shared_bus::events::BlockchainEvent;
use shared_bus::publisher::EventPublisher;
use shared_types::RawTransaction;
use std::sync::Arc;

pub struct MempoolBusAdapter<M: MempoolApi, P: EventPublisher> {
    pool: Arc<M>,
    bus: Arc<P>,
}

impl<M: MempoolApi, P: EventPublisher> MempoolBusAdapter<M, P> {
    pub fn new(pool: Arc<M>, bus: Arc<P>) -> Self {
        Self { pool, bus }
    }

    pub async fn push_and_publish(&self, tx: RawTransaction) -> Result<Tier, MempoolError> {
        let hash = tx.hash();
        let sender = tx.source.unwrap_or(shared_types::Address::ZERO);
        let nonce = tx.nonce;

        match self.pool.push(tx) {
            Ok((tier, _evictions)) => {
                self.bus
                    .publish(BlockchainEvent::TransactionAdmitted { hash, sender, nonce })
                    .await;
                Ok(tier)
            }
            Err(err) => {
                self.bus
                    .publish(BlockchainEvent::TransactionRejected {
                        hash,
                        reason: err.to_string(),
                    })
                    .await;
                Err(err)
            }
        }
    }
}
