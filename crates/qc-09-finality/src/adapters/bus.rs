//! # Event Bus Adapter
//!
//! Publishes `BlockFinalized` and `BlockRewardDistributed` once a recovered
//! block has been appended to the chain, for telemetry and any other
//! subsystem that cares about confirmed height rather than in-flight
//! consensus state.

use crate::domain::entities::FinalizationOutcome;
use crate::domain::errors::FinalityError;
use crate::ports::inbound::FinalityApi;
use qc_04_state_management::AccountDB;
use qc_08_consensus::RecoveredBlock;
use shared_bus::events::BlockchainEvent;
use shared_bus::publisher::EventPublisher;
use std::sync::Arc;

pub struct FinalityBusAdapter<F: FinalityApi, P: EventPublisher> {
    finality: Arc<F>,
    bus: Arc<P>,
}

impl<F: FinalityApi, P: EventPublisher> FinalityBusAdapter<F, P> {
    pub fn new(finality: Arc<F>, bus: Arc<P>) -> Self {
        Self { finality, bus }
    }

    pub async fn apply_recovered(&self, db: &mut dyn AccountDB, recovered: RecoveredBlock) -> Result<FinalizationOutcome, FinalityError> {
        let outcome = self.finality.apply_recovered(db, recovered)?;

        self.bus
            .publish(BlockchainEvent::BlockFinalized { height: outcome.header.height, hash: outcome.header.hash() })
            .await;
        self.bus
            .publish(BlockchainEvent::BlockRewardDistributed {
                height: outcome.header.height,
                proposer: outcome.proposer,
                proposer_reward: outcome.proposer_reward,
                verifier_reward_each: outcome.verifier_reward_each,
            })
            .await;

        Ok(outcome)
    }
}
