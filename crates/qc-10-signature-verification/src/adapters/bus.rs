//! # Event Bus Adapter
//!
//! Wraps a `ThresholdAggregator` so every accepted share, and the
//! transition into "recovered", is published on the shared bus for the
//! verify-group's slot state machine (qc-08) and observability consumers
//! to pick up without polling the aggregator directly.

use crate::domain::aggregator::ThresholdAggregator;
use crate::domain::entities::{AggregationOutcome, SignatureShare};
use shared_bus::events::BlockchainEvent;
use shared_bus::publisher::EventPublisher;
use shared_crypto::BlsSignature;
use shared_types::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Publishes `SignatureShareAdded` / `ThresholdReached` as an aggregator
/// instance accumulates witnesses for one `(height, hash)` slot.
pub struct AggregatorBusAdapter<P: EventPublisher> {
    aggregator: Arc<ThresholdAggregator>,
    bus: Arc<P>,
    height: u64,
    block_hash: Hash,
    announced_threshold: AtomicBool,
}

impl<P: EventPublisher> AggregatorBusAdapter<P> {
    pub fn new(aggregator: Arc<ThresholdAggregator>, bus: Arc<P>, height: u64, block_hash: Hash) -> Self {
        Self {
            aggregator,
            bus,
            height,
            block_hash,
            announced_threshold: AtomicBool::new(false),
        }
    }

    pub async fn add(&self, share: SignatureShare, sig: BlsSignature) -> AggregationOutcome {
        let outcome = self.aggregator.add(share, sig);
        self.announce(outcome).await;
        outcome
    }

    pub async fn add_force(&self, share: SignatureShare, sig: BlsSignature) -> AggregationOutcome {
        let outcome = self.aggregator.add_force(share, sig);
        self.announce(outcome).await;
        outcome
    }

    async fn announce(&self, outcome: AggregationOutcome) {
        if !outcome.accepted {
            return;
        }
        let signer_count = self.aggregator.witness_count() as u32;
        debug!(height = self.height, signer_count, "signature share accepted");
        self.bus
            .publish(BlockchainEvent::SignatureShareAdded {
                block_hash: self.block_hash,
                height: self.height,
                signer_count,
            })
            .await;

        if outcome.recovered
            && self
                .announced_threshold
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        {
            self.bus
                .publish(BlockchainEvent::ThresholdReached {
                    block_hash: self.block_hash,
                    height: self.height,
                    signer_count,
                })
                .await;
        }
    }

    pub fn aggregator(&self) -> &Arc<ThresholdAggregator> {
        &self.aggregator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SignatureShare;
    use shared_bus::publisher::InMemoryEventBus;
    use shared_crypto::BlsSecretKey;

    #[tokio::test]
    async fn publishes_threshold_reached_exactly_once() {
        let bus = Arc::new(InMemoryEventBus::new());
        let aggregator = Arc::new(ThresholdAggregator::new(2));
        let adapter = AggregatorBusAdapter::new(aggregator, bus.clone(), 10, [1u8; 32]);
        let message = [1u8; 32];

        let mut sub = bus.subscribe(shared_bus::events::EventFilter::all());

        for seed in 1u8..=2 {
            let sk = BlsSecretKey::from_seed(&[seed; 32]).unwrap();
            let sig = sk.sign(&message);
            let share = SignatureShare::new(seed as usize, sig.to_bytes().to_vec());
            adapter.add(share, sig).await;
        }

        let mut saw_threshold = 0;
        while let Ok(Some(event)) = sub.try_recv() {
            if matches!(event, BlockchainEvent::ThresholdReached { .. }) {
                saw_threshold += 1;
            }
        }
        assert_eq!(saw_threshold, 1);
    }
}
