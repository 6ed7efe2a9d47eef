//! # Inbound Ports (Driving Ports / API)
//!
//! The public API the block-production driver (qc-17) and node-runtime
//! wiring call into: register a verify group, and feed incoming Cast/Verify
//! messages through the slot state machine.

use crate::domain::entities::{CastOutcome, GroupInfo, VerifyOutcome};
use crate::domain::errors::ConsensusError;
use qc_04_state_management::AccountDB;
use shared_types::{ConsensusCastMessage, ConsensusVerifyMessage, Hash, RawTransaction};

pub trait ConsensusApi: Send + Sync {
    /// Register (or replace) a verify group's roster and per-member BLS
    /// public keys, keyed by its `groupId`.
    fn register_group(&self, group_id: Hash, info: GroupInfo);

    /// Handle an incoming Cast proposal (spec §4.E). `txs` is the
    /// proposal's own packed transactions when this node is the proposer,
    /// or empty for a remote proposal whose body was not gossiped.
    fn on_message_cast(
        &self,
        db: &dyn AccountDB,
        msg: &ConsensusCastMessage,
        txs: &[RawTransaction],
    ) -> Result<CastOutcome, ConsensusError>;

    /// Handle an incoming Verify signature share (spec §4.E).
    fn on_message_verify(&self, msg: &ConsensusVerifyMessage) -> Result<VerifyOutcome, ConsensusError>;

    /// Replay Verify messages cached for `hash` (spec §4.E scenario 5),
    /// typically called right after a Cast for that hash was accepted.
    fn replay_pending(&self, hash: &Hash) -> Vec<ConsensusVerifyMessage>;

    /// The height a block hash's context was opened at, if known. Lets
    /// callers that only hold a hash (a Verify message) label events.
    fn height_of(&self, hash: &Hash) -> Option<u64>;
}
