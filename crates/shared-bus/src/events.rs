//! # Consensus Core Events
//!
//! Defines all event types that flow through the shared bus between the
//! mempool, signature aggregator, miner manager, consensus, and finality
//! subsystems.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, MinerStatus};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BlockchainEvent {
    // =========================================================================
    // QC-06: MEMPOOL
    // =========================================================================
    /// A transaction was admitted into the pending tier and is packable.
    TransactionAdmitted {
        hash: Hash,
        sender: Address,
        nonce: u64,
    },

    /// A transaction was rejected by admission (stale nonce, pool full, etc).
    TransactionRejected { hash: Hash, reason: String },

    // =========================================================================
    // QC-10: SIGNATURE AGGREGATION
    // =========================================================================
    /// A signature share was added to the aggregator for a given block hash.
    SignatureShareAdded {
        block_hash: Hash,
        height: u64,
        signer_count: u32,
    },

    /// The aggregator reached the threshold and produced a group signature.
    ThresholdReached {
        block_hash: Hash,
        height: u64,
        signer_count: u32,
    },

    // =========================================================================
    // QC-13: MINER MANAGER / STAKE STORE
    // =========================================================================
    /// A miner's status transitioned (e.g. Prepare -> Normal, Normal -> Frozen).
    MinerStatusChanged {
        address: Address,
        status: MinerStatus,
        height: u64,
    },

    /// A stake operation (add/refund/reduce) committed against the stake store.
    StakeOperationCommitted {
        address: Address,
        height: u64,
        new_total_stake: u64,
    },

    // =========================================================================
    // QC-17: BLOCK PRODUCTION / PROPOSER DRIVER
    // =========================================================================
    /// A proposer cast a new block for its verify group to validate.
    BlockCast {
        height: u64,
        pre_hash: Hash,
        hash: Hash,
        proposer: Address,
    },

    /// A block failed proposer-side validation before being cast.
    BlockCastRejected { height: u64, reason: String },

    // =========================================================================
    // QC-08: CONSENSUS (Verify Context / Slot State Machine)
    // =========================================================================
    /// A verify-group member accepted and signed a cast block.
    BlockVerified {
        height: u64,
        hash: Hash,
        signer_count: u32,
    },

    /// A block was superseded by a heavier `BlockWeight` at the same height.
    BlockSuperseded {
        height: u64,
        old_hash: Hash,
        new_hash: Hash,
    },

    // =========================================================================
    // QC-09: FINALITY / REWARD
    // =========================================================================
    /// A block reached finality (its group signature verified against the
    /// verify group's aggregate public key).
    BlockFinalized { height: u64, hash: Hash },

    /// Block reward was distributed to the proposer and verify group.
    BlockRewardDistributed {
        height: u64,
        proposer: Address,
        proposer_reward: u64,
        verifier_reward_each: u64,
    },

    // =========================================================================
    // CRITICAL EVENTS (DLQ)
    // =========================================================================
    /// Critical error requiring operator attention.
    CriticalError {
        /// Name of the subsystem that encountered the error.
        subsystem: &'static str,
        error: String,
    },
}

impl BlockchainEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::TransactionAdmitted { .. } | Self::TransactionRejected { .. } => {
                EventTopic::Mempool
            }
            Self::SignatureShareAdded { .. } | Self::ThresholdReached { .. } => {
                EventTopic::SignatureAggregation
            }
            Self::MinerStatusChanged { .. } | Self::StakeOperationCommitted { .. } => {
                EventTopic::MinerManagement
            }
            Self::BlockCast { .. } | Self::BlockCastRejected { .. } => EventTopic::BlockProduction,
            Self::BlockVerified { .. } | Self::BlockSuperseded { .. } => EventTopic::Consensus,
            Self::BlockFinalized { .. } | Self::BlockRewardDistributed { .. } => {
                EventTopic::Finality
            }
            Self::CriticalError { .. } => EventTopic::DeadLetterQueue,
        }
    }

    /// Get the originating subsystem crate name.
    #[must_use]
    pub fn source_subsystem(&self) -> &'static str {
        match self {
            Self::TransactionAdmitted { .. } | Self::TransactionRejected { .. } => {
                "qc-06-mempool"
            }
            Self::SignatureShareAdded { .. } | Self::ThresholdReached { .. } => {
                "qc-10-signature-verification"
            }
            Self::MinerStatusChanged { .. } | Self::StakeOperationCommitted { .. } => {
                "qc-13-miner-manager"
            }
            Self::BlockCast { .. } | Self::BlockCastRejected { .. } => "qc-17-block-production",
            Self::BlockVerified { .. } | Self::BlockSuperseded { .. } => "qc-08-consensus",
            Self::BlockFinalized { .. } | Self::BlockRewardDistributed { .. } => "qc-09-finality",
            Self::CriticalError { subsystem, .. } => subsystem,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Mempool,
    SignatureAggregation,
    MinerManagement,
    BlockProduction,
    Consensus,
    Finality,
    /// Dead Letter Queue for critical errors.
    DeadLetterQueue,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source subsystems to include. Empty means all sources.
    pub source_subsystems: Vec<&'static str>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_subsystems: Vec::new(),
        }
    }

    /// Create a filter for events from specific subsystems.
    #[must_use]
    pub fn from_subsystems(subsystems: Vec<&'static str>) -> Self {
        Self {
            topics: Vec::new(),
            source_subsystems: subsystems,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &BlockchainEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.source_subsystems.is_empty()
            || self.source_subsystems.contains(&event.source_subsystem());

        topic_match && source_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_finalized() -> BlockchainEvent {
        BlockchainEvent::BlockFinalized {
            height: 10,
            hash: [7u8; 32],
        }
    }

    #[test]
    fn event_topic_mapping() {
        let event = sample_finalized();
        assert_eq!(event.topic(), EventTopic::Finality);
        assert_eq!(event.source_subsystem(), "qc-09-finality");
    }

    #[test]
    fn filter_all_matches_everything() {
        let filter = EventFilter::all();
        assert!(filter.matches(&sample_finalized()));
    }

    #[test]
    fn filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Finality]);
        assert!(filter.matches(&sample_finalized()));

        let mempool_event = BlockchainEvent::TransactionRejected {
            hash: [1u8; 32],
            reason: "pool full".into(),
        };
        assert!(!filter.matches(&mempool_event));
    }

    #[test]
    fn filter_by_subsystem() {
        let filter = EventFilter::from_subsystems(vec!["qc-09-finality", "qc-08-consensus"]);
        assert!(filter.matches(&sample_finalized()));

        let mempool_event = BlockchainEvent::TransactionAdmitted {
            hash: [1u8; 32],
            sender: Address([2u8; 32]),
            nonce: 0,
        };
        assert!(!filter.matches(&mempool_event));
    }

    #[test]
    fn threshold_reached_is_signature_aggregation_topic() {
        let event = BlockchainEvent::ThresholdReached {
            block_hash: [3u8; 32],
            height: 5,
            signer_count: 4,
        };
        assert_eq!(event.topic(), EventTopic::SignatureAggregation);
        assert_eq!(event.source_subsystem(), "qc-10-signature-verification");
    }
}
