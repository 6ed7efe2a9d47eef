//! Proposer/verifier driver (spec §4.F): on each tick, checks whether this
//! node holds proposer duty for the next height and, if so, drains the
//! mempool, runs the executor in packing mode, and seals a `Cast` message.
//! Incoming Cast/Verify wire messages are routed straight through to
//! `qc_08_consensus`, replaying any pre-proposal Verify messages a Cast
//! just unblocked.
//!
//! Grounded in `core/blockchain_cast.go`'s tick-driven casting loop and
//! `message_block_test.go`'s cache-then-replay sequencing.

use crate::domain::entities::{DriverOutcome, NodeIdentity};
use crate::domain::errors::DriverError;
use qc_04_state_management::AccountDB;
use qc_06_mempool::MempoolApi;
use qc_08_consensus::ports::outbound::LocalSigner;
use qc_08_consensus::{domain::proposer, CastOutcome, ConsensusApi, ConsensusError, VerifyOutcome};
use qc_12_transaction_executor::TransactionExecutorApi;
use qc_13_miner_manager::MinerManagerApi;
use parking_lot::RwLock;
use shared_crypto::{merkle_fold, slot_seed, vrf_evaluate};
use shared_types::{
    BlockHeader, BlockWeight, ConsensusCastMessage, ConsensusVerifyMessage, Hash, RawTransaction,
    Receipt, SignedInfo,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Heights older than this many ticks behind the current one are pruned
/// from `recent_casted`; casting only ever needs to dedupe against very
/// recent heights.
const RECENT_CASTED_WINDOW: u64 = 64;

fn receipt_digest(receipt: &Receipt) -> Hash {
    let mut buf = Vec::with_capacity(41);
    buf.extend_from_slice(&receipt.tx_hash);
    buf.push(receipt.status as u8);
    buf.extend_from_slice(&receipt.cumulative_gas_used.to_be_bytes());
    shared_types::hash_bytes(&buf)
}

pub struct BlockProductionDriver {
    chain: Arc<dyn qc_04_state_management::ChainStore>,
    mempool: Arc<dyn MempoolApi>,
    executor: Arc<dyn TransactionExecutorApi>,
    miner_manager: Arc<dyn MinerManagerApi>,
    consensus: Arc<dyn ConsensusApi>,
    signer: Arc<dyn LocalSigner>,
    identity: NodeIdentity,
    recent_casted: RwLock<HashMap<u64, (Hash, BlockWeight)>>,
}

impl BlockProductionDriver {
    pub fn new(
        chain: Arc<dyn qc_04_state_management::ChainStore>,
        mempool: Arc<dyn MempoolApi>,
        executor: Arc<dyn TransactionExecutorApi>,
        miner_manager: Arc<dyn MinerManagerApi>,
        consensus: Arc<dyn ConsensusApi>,
        signer: Arc<dyn LocalSigner>,
        identity: NodeIdentity,
    ) -> Self {
        Self {
            chain,
            mempool,
            executor,
            miner_manager,
            consensus,
            signer,
            identity,
            recent_casted: RwLock::new(HashMap::new()),
        }
    }

    /// Proposer-duty check plus, if eligible, block assembly (spec §4.F).
    pub fn on_tick(
        &self,
        db: &mut dyn AccountDB,
        height: u64,
        pre_hash: Hash,
        now_ms: i64,
    ) -> Result<DriverOutcome, DriverError> {
        let parent = self.chain.header_by_hash(&pre_hash).ok_or(DriverError::ParentMissing)?;
        let elapsed_ms = (now_ms - parent.cur_time) as i32;

        let seed = slot_seed(&pre_hash, height);
        let proof = vrf_evaluate(&self.identity.vrf_keypair, &seed);

        let mut draft = BlockHeader {
            height,
            pre_hash,
            elapsed_ms,
            prove_value: proof.to_bytes().to_vec(),
            total_qn: parent.total_qn + 1,
            cur_time: now_ms,
            castor: self.identity.address,
            group: self.identity.group_id,
            signature: vec![],
            nonce: 0,
            tx_tree: [0u8; 32],
            receipt_tree: [0u8; 32],
            state_tree: [0u8; 32],
            extra_data: vec![],
            random: vec![],
            gas_fee: 0,
        };

        proposer::verify_cast_legality(db, self.miner_manager.as_ref(), &draft)?;

        let weight = draft.weight();
        if let Some((existing_pre, existing_weight)) = self.recent_casted.read().get(&height).copied() {
            if existing_pre == pre_hash && existing_weight >= weight {
                return Ok(DriverOutcome::AlreadyCast);
            }
        }

        let mut candidates = Vec::new();
        self.mempool.each_for_pack(&mut |pooled| {
            candidates.push(pooled.tx.clone());
            true
        });

        let outcome = self.executor.execute(db, &draft, &candidates, true);

        let tx_leaves: Vec<Hash> = outcome.executed.iter().map(RawTransaction::hash).collect();
        let receipt_leaves: Vec<Hash> = outcome.receipts.iter().map(receipt_digest).collect();
        draft.tx_tree = merkle_fold(&tx_leaves);
        draft.receipt_tree = merkle_fold(&receipt_leaves);
        draft.state_tree = outcome.state_root;
        draft.gas_fee = outcome.receipts.last().map(|r| r.cumulative_gas_used).unwrap_or(0);

        let hash = draft.hash();
        let sign = self.signer.sign(&hash);
        let message = ConsensusCastMessage {
            bh: draft,
            si: SignedInfo { signer: self.identity.address, data_hash: hash, sign: sign.to_bytes().to_vec() },
        };

        {
            let mut recent = self.recent_casted.write();
            recent.insert(height, (pre_hash, weight));
            recent.retain(|&h, _| h + RECENT_CASTED_WINDOW >= height);
        }

        Ok(DriverOutcome::Cast { message, executed: outcome.executed, evicted: outcome.evicted })
    }

    /// Route an incoming Cast message to the consensus core, replaying any
    /// Verify messages cached pending its arrival (spec §4.E scenario 5).
    pub fn on_message_cast(
        &self,
        db: &dyn AccountDB,
        msg: &ConsensusCastMessage,
        txs: &[RawTransaction],
    ) -> Result<(CastOutcome, Vec<ConsensusVerifyMessage>), ConsensusError> {
        let outcome = self.consensus.on_message_cast(db, msg, txs)?;
        let hash = msg.bh.hash();
        let replayed = self.consensus.replay_pending(&hash);
        Ok((outcome, replayed))
    }

    pub fn on_message_verify(&self, msg: &ConsensusVerifyMessage) -> Result<VerifyOutcome, ConsensusError> {
        self.consensus.on_message_verify(msg)
    }
}
