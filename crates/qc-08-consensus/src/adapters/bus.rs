//! # Event Bus Adapter
//!
//! Wraps Cast/Verify handling so every accepted signature share and every
//! height-level supersession is visible to qc-17 and observability
//! consumers without them polling `ConsensusCore`'s internal maps.
//! Recovery (threshold reached) is qc-09's concern, not published here.

use crate::domain::entities::{CastOutcome, GroupInfo, VerifyOutcome};
use crate::domain::errors::ConsensusError;
use crate::ports::inbound::ConsensusApi;
use qc_04_state_management::AccountDB;
use shared_bus::events::BlockchainEvent;
use shared_bus::publisher::EventPublisher;
use shared_types::{ConsensusCastMessage, ConsensusVerifyMessage, Hash, RawTransaction};
use std::sync::Arc;

pub struct ConsensusBusAdapter<C: ConsensusApi, P: EventPublisher> {
    consensus: Arc<C>,
    bus: Arc<P>,
}

impl<C: ConsensusApi, P: EventPublisher> ConsensusBusAdapter<C, P> {
    pub fn new(consensus: Arc<C>, bus: Arc<P>) -> Self {
        Self { consensus, bus }
    }

    pub fn register_group(&self, group_id: Hash, info: GroupInfo) {
        self.consensus.register_group(group_id, info);
    }

    pub async fn on_message_cast(
        &self,
        db: &dyn AccountDB,
        msg: &ConsensusCastMessage,
        txs: &[RawTransaction],
    ) -> Result<CastOutcome, ConsensusError> {
        let outcome = self.consensus.on_message_cast(db, msg, txs)?;

        if let CastOutcome::Accepted { signer_count, superseded, .. } = &outcome {
            self.bus
                .publish(BlockchainEvent::BlockVerified {
                    height: msg.bh.height,
                    hash: msg.bh.hash(),
                    signer_count: *signer_count,
                })
                .await;
            if let Some((old_hash, new_hash)) = superseded {
                self.bus
                    .publish(BlockchainEvent::BlockSuperseded {
                        height: msg.bh.height,
                        old_hash: *old_hash,
                        new_hash: *new_hash,
                    })
                    .await;
            }
        }

        Ok(outcome)
    }

    pub async fn on_message_verify(&self, msg: &ConsensusVerifyMessage) -> Result<VerifyOutcome, ConsensusError> {
        let outcome = self.consensus.on_message_verify(msg)?;

        if let VerifyOutcome::Accepted { signer_count } = &outcome {
            let height = self.consensus.height_of(&msg.block_hash).unwrap_or_default();
            self.bus
                .publish(BlockchainEvent::BlockVerified {
                    height,
                    hash: msg.block_hash,
                    signer_count: *signer_count,
                })
                .await;
        }

        Ok(outcome)
    }

    pub fn replay_pending(&self, hash: &Hash) -> Vec<ConsensusVerifyMessage> {
        self.consensus.replay_pending(hash)
    }
}
