//! Driver-local entities: this node's casting identity and the outcome of
//! a tick.

use qc_12_transaction_executor::EvictedTransaction;
use shared_crypto::Secp256k1KeyPair;
use shared_types::{ConsensusCastMessage, Hash, RawTransaction};

/// The VRF keypair and addressing this node casts blocks under. Distinct
/// from the BLS [`qc_08_consensus::LocalSigner`] identity used to sign
/// verify shares — a miner's proposal key and verify-group key are
/// independent per spec §3 "Miner".
pub struct NodeIdentity {
    pub address: shared_types::Address,
    pub group_id: Hash,
    pub vrf_keypair: Secp256k1KeyPair,
}

/// Result of a single `on_tick` call.
pub enum DriverOutcome {
    /// This node holds no proposer duty at this height (failed VRF
    /// ranking, not in the active set, or not `Normal`).
    NotProposer,
    /// Already cast an equal-or-heavier block at this height; casting
    /// again would only waste a round of group messaging.
    AlreadyCast,
    /// A new block was assembled and sealed; broadcast `message` to the
    /// verify group.
    Cast {
        message: ConsensusCastMessage,
        executed: Vec<RawTransaction>,
        evicted: Vec<EvictedTransaction>,
    },
}
