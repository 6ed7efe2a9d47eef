//! Verify Context / Slot State Machine entities (spec §3, §4.E).

use qc_10_signature_verification::ThresholdAggregator;
use shared_crypto::{BlsPublicKey, BlsSignature, CryptoError};
use shared_types::{Address, BlockHeader, Hash, MemberId, RawTransaction, VerifyGroup};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// A registered verify group plus the per-member BLS public keys needed to
/// check individual signature shares (`VerifyGroup.public_key` is only the
/// aggregate key used for the final threshold check).
pub struct GroupInfo {
    pub group: VerifyGroup,
    pub member_public_keys: Vec<BlsPublicKey>,
}

impl GroupInfo {
    pub fn public_key_of(&self, member: MemberId) -> Option<&BlsPublicKey> {
        self.member_public_keys.get(member)
    }

    pub fn aggregate_public_key(&self) -> Result<BlsPublicKey, CryptoError> {
        BlsPublicKey::from_bytes(&self.group.public_key)
    }
}

/// Per-proposed-hash slot (spec §3 "SlotContext"). Created on the first
/// valid Cast for `bh.hash()`, destroyed with its parent `VerifyContext`.
pub struct SlotContext {
    pub bh: BlockHeader,
    pub castor: MemberId,
    pub g_sign_gen: ThresholdAggregator,
    pub r_sign_gen: ThresholdAggregator,
    pub txs: Vec<RawTransaction>,
}

/// Per-`(height, preHash)` context (spec §3 "VerifyContext (slot-set)").
pub struct VerifyContextState {
    pub pre_hash: Hash,
    pub group: Hash,
    pub cast_height: u64,
    pub signed_block_hashes: HashSet<Hash>,
    pub slots: HashMap<Hash, SlotContext>,
    pub terminal: bool,
}

impl VerifyContextState {
    pub fn new(pre_hash: Hash, group: Hash, cast_height: u64) -> Self {
        Self {
            pre_hash,
            group,
            cast_height,
            signed_block_hashes: HashSet::new(),
            slots: HashMap::new(),
            terminal: false,
        }
    }
}

/// A Verify message that arrived before its Cast proposal (spec §4.E
/// "Cached pre-proposal Verify messages"), held until its proposal creates
/// the slot or it ages past the freshness window.
pub struct CachedVerify {
    pub message: shared_types::ConsensusVerifyMessage,
    pub received_at: Instant,
}

/// The result of a recovered threshold signature: a block ready for
/// finality (component G) to apply to the chain.
pub struct RecoveredBlock {
    pub header: BlockHeader,
    pub aggregate_signature: BlsSignature,
    pub random_signature: BlsSignature,
    pub verifiers: Vec<Address>,
    pub transactions: Vec<RawTransaction>,
}

/// Outcome of `on_message_cast`.
pub enum CastOutcome {
    /// Own verify signature produced; broadcast it to the verify group.
    /// `superseded` carries `(old_hash, new_hash)` when this proposal beat
    /// out a lighter one already recorded for the same height.
    Accepted {
        verify_message: shared_types::ConsensusVerifyMessage,
        signer_count: u32,
        superseded: Option<(Hash, Hash)>,
    },
    /// This node's own signature alone reached threshold (degenerate
    /// `threshold == 1` group).
    Recovered(RecoveredBlock),
}

/// Outcome of `on_message_verify`.
pub enum VerifyOutcome {
    Accepted { signer_count: u32 },
    Recovered(RecoveredBlock),
}
