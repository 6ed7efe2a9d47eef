//! `ConsensusCore`: the Verify Context / Slot State Machine (spec §4.E).
//!
//! Holds every `(height, preHash)` context this node is tracking plus the
//! cross-context bookkeeping (per-height best proposal, per-height self-sign
//! watermark, pre-proposal Verify cache) the step 8/9 checks and the
//! "cache msg" scenario need. Pure domain state: no bus, no async. The
//! adapters layer wraps these calls to publish `BlockVerified`/
//! `BlockSuperseded` once a call returns successfully.

use crate::domain::entities::{
    CachedVerify, CastOutcome, GroupInfo, RecoveredBlock, SlotContext, VerifyContextState,
    VerifyOutcome,
};
use crate::domain::errors::ConsensusError;
use crate::domain::proposer;
use crate::ports::outbound::LocalSigner;
use parking_lot::RwLock;
use qc_04_state_management::{AccountDB, ChainStore};
use qc_10_signature_verification::{SignatureShare, SignatureVerificationApi};
use qc_13_miner_manager::MinerManagerApi;
use shared_types::{
    BlockWeight, ConsensusCastMessage, ConsensusVerifyMessage, CoreError, Hash, RawTransaction,
    SignedInfo,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Messages cached pending arrival of their proposal age out after this
/// long; `replay_pending` drops anything older when it next looks.
const PENDING_VERIFY_TTL: Duration = Duration::from_secs(30);

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

pub struct ConsensusCore {
    chain: Arc<dyn ChainStore>,
    miner_manager: Arc<dyn MinerManagerApi>,
    sig_api: Arc<dyn SignatureVerificationApi>,
    signer: Arc<dyn LocalSigner>,

    groups: RwLock<HashMap<Hash, Arc<GroupInfo>>>,
    contexts: RwLock<HashMap<(u64, Hash), Arc<RwLock<VerifyContextState>>>>,
    /// `blockHash -> (height, preHash)`, to resolve a `Verify` message's
    /// `blockHash` back to the context/slot holding its aggregator.
    hash_index: RwLock<HashMap<Hash, (u64, Hash)>>,
    /// `height -> (preHash, blockHash, weight)` of the heaviest proposal
    /// seen for that height, for the step 8 uniqueness/supersession check.
    height_best: RwLock<HashMap<u64, (Hash, Hash, BlockWeight)>>,
    /// `height -> weight` of the heaviest block this node has itself added
    /// a verify signature to, for the step 9 "already signed" gate.
    self_signed: RwLock<HashMap<u64, BlockWeight>>,
    /// `blockHash -> cached Verify messages`, awaiting that hash's `Cast`.
    pending_verifies: RwLock<HashMap<Hash, Vec<CachedVerify>>>,
}

impl ConsensusCore {
    pub fn new(
        chain: Arc<dyn ChainStore>,
        miner_manager: Arc<dyn MinerManagerApi>,
        sig_api: Arc<dyn SignatureVerificationApi>,
        signer: Arc<dyn LocalSigner>,
    ) -> Self {
        Self {
            chain,
            miner_manager,
            sig_api,
            signer,
            groups: RwLock::new(HashMap::new()),
            contexts: RwLock::new(HashMap::new()),
            hash_index: RwLock::new(HashMap::new()),
            height_best: RwLock::new(HashMap::new()),
            self_signed: RwLock::new(HashMap::new()),
            pending_verifies: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or replace) the verify group keyed by its `groupId`, so
    /// later Cast/Verify messages naming it can resolve membership and the
    /// aggregate public key.
    pub fn register_group(&self, group_id: Hash, info: GroupInfo) {
        self.groups.write().insert(group_id, Arc::new(info));
    }

    fn group_of(&self, group_id: &Hash) -> Result<Arc<GroupInfo>, ConsensusError> {
        self.groups
            .read()
            .get(group_id)
            .cloned()
            .ok_or(ConsensusError::UnknownGroup)
    }

    /// Handle an incoming Cast proposal (spec §4.E steps 1-10). `txs` are
    /// the proposal's transaction bodies, known locally when this node is
    /// the proposer and otherwise empty (tx-body gossip is out of scope).
    pub fn on_message_cast(
        &self,
        db: &dyn AccountDB,
        msg: &ConsensusCastMessage,
        txs: &[RawTransaction],
    ) -> Result<CastOutcome, ConsensusError> {
        let bh = &msg.bh;
        let hash = bh.hash();

        if hash != msg.si.data_hash {
            return Err(ConsensusError::Core(CoreError::HashMismatch));
        }
        if bh.castor == self.signer.address() {
            return Err(ConsensusError::Core(CoreError::SelfMessage));
        }
        if bh.elapsed_ms <= 0 {
            return Err(ConsensusError::ElapsedError(bh.elapsed_ms));
        }
        if now_millis() - bh.cur_time < -1000 {
            return Err(ConsensusError::BlockTooEarly);
        }
        if self.chain.contains(&hash) {
            return Err(ConsensusError::BlockOnChainAlready);
        }
        if !self.chain.contains(&bh.pre_hash) {
            return Err(ConsensusError::Core(CoreError::ParentMissing));
        }
        proposer::verify_cast_legality(db, self.miner_manager.as_ref(), bh)?;

        let weight = bh.weight();
        let superseded = self.record_height_best(bh.height, bh.pre_hash, hash, weight)?;

        {
            let self_signed = self.self_signed.read();
            if let Some(existing) = self_signed.get(&bh.height) {
                if existing.total_qn >= bh.total_qn {
                    return Err(ConsensusError::HigherQnSigned);
                }
            }
        }

        let group = self.group_of(&bh.group)?;
        let member_id = group
            .group
            .member_index(&self.signer.address())
            .ok_or(ConsensusError::Core(CoreError::NotInVerifyGroup))?;

        let ctx_key = (bh.height, bh.pre_hash);
        let ctx = {
            let mut contexts = self.contexts.write();
            Arc::clone(contexts.entry(ctx_key).or_insert_with(|| {
                Arc::new(RwLock::new(VerifyContextState::new(bh.pre_hash, bh.group, bh.height)))
            }))
        };
        self.hash_index.write().insert(hash, ctx_key);

        let threshold = group.group.threshold as usize;
        let verify_sig = self.signer.sign(&hash);
        let random_sig = self.signer.sign(&bh.pre_hash);

        let (verify_message, signer_count, recovered_block) = {
            let mut ctx_guard = ctx.write();
            if !ctx_guard.slots.contains_key(&hash) {
                ctx_guard.slots.insert(
                    hash,
                    SlotContext {
                        bh: bh.clone(),
                        castor: member_id,
                        g_sign_gen: self.sig_api.new_aggregator(threshold),
                        r_sign_gen: self.sig_api.new_aggregator(threshold),
                        txs: txs.to_vec(),
                    },
                );
            }
            ctx_guard.signed_block_hashes.insert(hash);

            let slot = ctx_guard.slots.get_mut(&hash).expect("inserted above");
            slot.g_sign_gen.add(
                SignatureShare::new(member_id, verify_sig.to_bytes().to_vec()),
                verify_sig.clone(),
            );
            slot.r_sign_gen.add(
                SignatureShare::new(member_id, random_sig.to_bytes().to_vec()),
                random_sig.clone(),
            );
            let signer_count = slot.g_sign_gen.witness_count() as u32;

            let verify_message = ConsensusVerifyMessage {
                block_hash: hash,
                si: SignedInfo {
                    signer: self.signer.address(),
                    data_hash: hash,
                    sign: verify_sig.to_bytes().to_vec(),
                },
                random_sign: random_sig.to_bytes().to_vec(),
            };

            let recovered = self.try_recover(&group, &mut ctx_guard, &hash)?;
            (verify_message, signer_count, recovered)
        };

        self.self_signed.write().insert(bh.height, weight);

        if let Some(recovered) = recovered_block {
            return Ok(CastOutcome::Recovered(recovered));
        }

        Ok(CastOutcome::Accepted { verify_message, signer_count, superseded })
    }

    /// Handle an incoming Verify share (spec §4.E Verify steps 1-7).
    pub fn on_message_verify(&self, msg: &ConsensusVerifyMessage) -> Result<VerifyOutcome, ConsensusError> {
        let ctx_key = match self.hash_index.read().get(&msg.block_hash).copied() {
            Some(key) => key,
            None => {
                self.cache_pending(msg.clone());
                return Err(ConsensusError::ContextCached);
            }
        };

        if self.chain.contains(&msg.block_hash) {
            return Err(ConsensusError::BlockAlreadyOnChain);
        }

        let ctx = self
            .contexts
            .read()
            .get(&ctx_key)
            .cloned()
            .ok_or(ConsensusError::SlotNil)?;

        let group = self.group_of(&ctx.read().group)?;

        if msg.si.signer == self.signer.address() {
            return Err(ConsensusError::Core(CoreError::SelfMessage));
        }
        if group.group.member_index(&self.signer.address()).is_none() {
            return Err(ConsensusError::Core(CoreError::NotInVerifyGroup));
        }
        let sender_member = group
            .group
            .member_index(&msg.si.signer)
            .ok_or(ConsensusError::Core(CoreError::SenderNotInVerifyGroup))?;

        let signer_pk = group
            .public_key_of(sender_member)
            .ok_or(ConsensusError::Core(CoreError::SenderNotInVerifyGroup))?;
        let verify_sig = self
            .sig_api
            .verify_signed_info(&msg.si, &msg.block_hash, signer_pk)
            .map_err(ConsensusError::Signature)?;

        let (signer_count, recovered_block) = {
            let mut ctx_guard = ctx.write();
            if !ctx_guard.slots.contains_key(&msg.block_hash) {
                return Err(ConsensusError::SlotNil);
            }

            let slot = ctx_guard.slots.get_mut(&msg.block_hash).expect("checked above");
            slot.g_sign_gen.add_force(
                SignatureShare::new(sender_member, verify_sig.to_bytes().to_vec()),
                verify_sig.clone(),
            );
            if !msg.random_sign.is_empty() {
                if let Ok(random_sig) = shared_crypto::BlsSignature::from_bytes(&msg.random_sign) {
                    slot.r_sign_gen.add_force(
                        SignatureShare::new(sender_member, msg.random_sign.clone()),
                        random_sig,
                    );
                }
            }
            let signer_count = slot.g_sign_gen.witness_count() as u32;

            let recovered = self.try_recover(&group, &mut ctx_guard, &msg.block_hash)?;
            (signer_count, recovered)
        };

        match recovered_block {
            Some(recovered) => Ok(VerifyOutcome::Recovered(recovered)),
            None => Ok(VerifyOutcome::Accepted { signer_count }),
        }
    }

    /// Step 8: a different `preHash` at the same height either loses
    /// (`DuplicateProposal`) or supersedes the recorded best, reporting the
    /// superseded hash so the caller can publish `BlockSuperseded`.
    fn record_height_best(
        &self,
        height: u64,
        pre_hash: Hash,
        hash: Hash,
        weight: BlockWeight,
    ) -> Result<Option<(Hash, Hash)>, ConsensusError> {
        let mut height_best = self.height_best.write();
        match height_best.get(&height).copied() {
            Some((existing_pre, existing_hash, existing_weight)) => {
                if existing_pre != pre_hash {
                    if weight > existing_weight {
                        height_best.insert(height, (pre_hash, hash, weight));
                        Ok(Some((existing_hash, hash)))
                    } else {
                        Err(ConsensusError::Core(CoreError::DuplicateProposal))
                    }
                } else {
                    if weight > existing_weight {
                        height_best.insert(height, (pre_hash, hash, weight));
                    }
                    Ok(None)
                }
            }
            None => {
                height_best.insert(height, (pre_hash, hash, weight));
                Ok(None)
            }
        }
    }

    /// If the slot's aggregator just reached threshold, verify the
    /// recovered aggregate against the group's public key and build the
    /// `RecoveredBlock` finality (qc-09) will apply to the chain.
    fn try_recover(
        &self,
        group: &GroupInfo,
        ctx: &mut VerifyContextState,
        hash: &Hash,
    ) -> Result<Option<RecoveredBlock>, ConsensusError> {
        if ctx.terminal {
            return Ok(None);
        }
        let slot = ctx.slots.get(hash).expect("caller holds the slot");
        let Some(aggregate) = slot.g_sign_gen.aggregate_signature() else {
            return Ok(None);
        };
        let group_pk = group.aggregate_public_key().map_err(|_| ConsensusError::SignatureInvalid)?;
        if !slot.g_sign_gen.verify(&group_pk, hash) {
            return Ok(None);
        }
        let random_aggregate = slot
            .r_sign_gen
            .aggregate_signature()
            .unwrap_or_else(|| aggregate.clone());

        ctx.terminal = true;
        Ok(Some(RecoveredBlock {
            header: slot.bh.clone(),
            aggregate_signature: aggregate,
            random_signature: random_aggregate,
            verifiers: group.group.members.clone(),
            transactions: slot.txs.clone(),
        }))
    }

    fn cache_pending(&self, msg: ConsensusVerifyMessage) {
        let mut pending = self.pending_verifies.write();
        pending
            .entry(msg.block_hash)
            .or_default()
            .push(CachedVerify { message: msg, received_at: std::time::Instant::now() });
    }

    /// The height a known block hash's context was opened at, for callers
    /// (the bus adapter) that only have the hash on hand.
    pub fn height_of(&self, hash: &Hash) -> Option<u64> {
        self.hash_index.read().get(hash).map(|(height, _)| *height)
    }

    /// Replay any Verify messages cached for `hash` now that its proposal
    /// has created a context, dropping entries older than
    /// [`PENDING_VERIFY_TTL`]. Call after a successful `on_message_cast`.
    pub fn replay_pending(&self, hash: &Hash) -> Vec<ConsensusVerifyMessage> {
        let cached = self.pending_verifies.write().remove(hash).unwrap_or_default();
        cached
            .into_iter()
            .filter(|c| c.received_at.elapsed() < PENDING_VERIFY_TTL)
            .map(|c| c.message)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::InMemoryLocalSigner;
    use qc_04_state_management::{InMemoryAccountDb, InMemoryChainStore};
    use qc_10_signature_verification::SignatureVerificationService;
    use qc_13_miner_manager::{MinerManagerService, ProposalSet};
    use shared_crypto::BlsSecretKey;
    use shared_types::{Address, BlockHeader, VerifyGroup};

    fn header(height: u64, pre_hash: Hash, castor: Address, group: Hash) -> BlockHeader {
        BlockHeader {
            height,
            pre_hash,
            elapsed_ms: 1000,
            prove_value: vec![],
            total_qn: height,
            cur_time: now_millis(),
            castor,
            group,
            signature: vec![],
            nonce: 0,
            tx_tree: [0u8; 32],
            receipt_tree: [0u8; 32],
            state_tree: [0u8; 32],
            extra_data: vec![],
            random: vec![],
            gas_fee: 0,
        }
    }

    fn setup() -> (ConsensusCore, Arc<InMemoryChainStore>, InMemoryAccountDb, Hash) {
        let chain = Arc::new(InMemoryChainStore::new());
        let db = InMemoryAccountDb::new();
        let proposal_set = ProposalSet::new();
        let miner_manager = Arc::new(MinerManagerService::new(proposal_set));
        let sig_api = Arc::new(SignatureVerificationService::new());

        let own_sk = BlsSecretKey::from_seed(&[1u8; 32]).unwrap();
        let own_pk = own_sk.public_key();
        let own_addr = Address([9u8; 32]);
        let signer = Arc::new(InMemoryLocalSigner::new(0, own_addr, own_sk));

        let core = ConsensusCore::new(chain.clone(), miner_manager, sig_api, signer);

        let group_id = [5u8; 32];
        let other_sk = BlsSecretKey::from_seed(&[2u8; 32]).unwrap();
        let other_pk = other_sk.public_key();
        let group = VerifyGroup {
            seed: group_id,
            members: vec![own_addr, Address([8u8; 32])],
            threshold: 2,
            public_key: shared_crypto::aggregate_public_keys(&[own_pk.clone(), other_pk.clone()])
                .unwrap()
                .to_bytes()
                .to_vec(),
            work_height: 0,
            dismiss_height: u64::MAX,
        };
        core.register_group(
            group_id,
            GroupInfo { group, member_public_keys: vec![own_pk, other_pk] },
        );

        (core, chain, db, group_id)
    }

    #[test]
    fn rejects_hash_mismatch() {
        let (core, chain, db, group_id) = setup();
        let bh = header(1, chain.top_hash(), Address([1u8; 32]), group_id);
        let msg = ConsensusCastMessage {
            si: SignedInfo { signer: bh.castor, data_hash: [0xFFu8; 32], sign: vec![] },
            bh,
        };
        let result = core.on_message_cast(&db, &msg, &[]);
        assert!(matches!(result, Err(ConsensusError::Core(CoreError::HashMismatch))));
    }

    #[test]
    fn rejects_self_cast() {
        let (core, chain, db, group_id) = setup();
        let own_addr = Address([9u8; 32]);
        let bh = header(1, chain.top_hash(), own_addr, group_id);
        let hash = bh.hash();
        let msg = ConsensusCastMessage { si: SignedInfo { signer: own_addr, data_hash: hash, sign: vec![] }, bh };
        let result = core.on_message_cast(&db, &msg, &[]);
        assert!(matches!(result, Err(ConsensusError::Core(CoreError::SelfMessage))));
    }

    #[test]
    fn rejects_non_positive_elapsed() {
        let (core, chain, db, group_id) = setup();
        let mut bh = header(1, chain.top_hash(), Address([1u8; 32]), group_id);
        bh.elapsed_ms = -1;
        let hash = bh.hash();
        let msg = ConsensusCastMessage { si: SignedInfo { signer: bh.castor, data_hash: hash, sign: vec![] }, bh };
        let result = core.on_message_cast(&db, &msg, &[]);
        assert!(matches!(result, Err(ConsensusError::ElapsedError(-1))));
    }

    #[test]
    fn unresolved_verify_is_cached() {
        let (core, _chain, _db, _group_id) = setup();
        let msg = ConsensusVerifyMessage {
            block_hash: [0x42u8; 32],
            si: SignedInfo { signer: Address([8u8; 32]), data_hash: [0x42u8; 32], sign: vec![] },
            random_sign: vec![],
        };
        let result = core.on_message_verify(&msg);
        assert!(matches!(result, Err(ConsensusError::ContextCached)));
        assert_eq!(core.replay_pending(&[0x42u8; 32]).len(), 1);
    }
}
