//! Block finalization (spec §4.G): stamp the recovered aggregate/random
//! signatures onto the header, append it to the canonical chain, replay
//! its transactions plus a synthesized `Reward` transaction through the
//! executor, and drop the included transactions from the mempool.
//!
//! Grounded in `core/blockchain_cast.go`'s `onBlockAddSuccess` path:
//! append-then-execute-then-clean, in that order, so a chain reader never
//! observes a header without its receipts.

use crate::domain::entities::FinalizationOutcome;
use crate::domain::errors::FinalityError;
use crate::domain::reward;
use qc_04_state_management::{AccountDB, ChainStore};
use qc_06_mempool::MempoolApi;
use qc_08_consensus::RecoveredBlock;
use qc_12_transaction_executor::{TransactionExecutorApi, PACK_BONUS, PROPOSAL_BONUS};
use std::sync::Arc;

/// Fixed per-verifier reward credited by the synthesized `Reward`
/// transaction. The spec names `ProposalBonus`/`PackBonus` for the
/// castor but leaves the verifier share unconstrained; this mirrors them
/// as another fixed, non-zero unit rather than inventing a formula the
/// original never specifies.
pub const VERIFIER_REWARD_EACH: u64 = 100;

pub struct Finalizer {
    chain: Arc<dyn ChainStore>,
    executor: Arc<dyn TransactionExecutorApi>,
    mempool: Arc<dyn MempoolApi>,
    verifier_reward_each: u64,
}

impl Finalizer {
    pub fn new(chain: Arc<dyn ChainStore>, executor: Arc<dyn TransactionExecutorApi>, mempool: Arc<dyn MempoolApi>) -> Self {
        Self { chain, executor, mempool, verifier_reward_each: VERIFIER_REWARD_EACH }
    }

    pub fn apply_recovered(&self, db: &mut dyn AccountDB, recovered: RecoveredBlock) -> Result<FinalizationOutcome, FinalityError> {
        let RecoveredBlock { mut header, aggregate_signature, random_signature, verifiers, transactions } = recovered;

        if verifiers.is_empty() {
            return Err(FinalityError::NoVerifiers);
        }
        let top_hash = self.chain.top_hash();
        let top_height = self.chain.top_height();
        if header.pre_hash != top_hash || header.height != top_height + 1 {
            return Err(FinalityError::NotCanonical {
                expected_parent: top_hash,
                expected_height: top_height + 1,
                actual_parent: header.pre_hash,
                actual_height: header.height,
            });
        }

        let block_hash = header.hash();
        header.signature = aggregate_signature.to_bytes().to_vec();
        header.random = random_signature.to_bytes().to_vec();

        let reward_tx = reward::build_reward_transaction(block_hash, header.group, &verifiers, self.verifier_reward_each);
        let mut txs = transactions.clone();
        txs.push(reward_tx);

        let proposer = header.castor;
        let outcome = self.executor.execute(db, &header, &txs, false);

        self.chain.append(header.clone());

        for tx in &transactions {
            self.mempool.remove(&tx.hash());
        }

        Ok(FinalizationOutcome {
            header,
            receipts: outcome.receipts,
            proposer,
            proposer_reward: PROPOSAL_BONUS + PACK_BONUS,
            verifier_reward_each: self.verifier_reward_each,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_04_state_management::InMemoryChainStore;
    use qc_06_mempool::{MempoolConfig, TxPool};
    use qc_11_smart_contracts::ReferenceVm;
    use qc_12_transaction_executor::TransactionExecutorService;
    use qc_13_miner_manager::{MinerManagerApi, MinerManagerService, ProposalSet};
    use shared_crypto::BlsSecretKey;
    use shared_types::Address;

    struct NoopNonceView;
    impl qc_06_mempool::AccountNonceView for NoopNonceView {
        fn nonce(&self, _sender: &Address) -> u64 {
            0
        }
    }

    fn header(chain: &InMemoryChainStore, castor: Address, group: shared_types::Hash) -> shared_types::BlockHeader {
        shared_types::BlockHeader {
            height: chain.top_height() + 1,
            pre_hash: chain.top_hash(),
            elapsed_ms: 1000,
            prove_value: vec![],
            total_qn: chain.top_height() + 1,
            cur_time: 1_000,
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

    fn build_finalizer() -> (Finalizer, Arc<InMemoryChainStore>, qc_04_state_management::InMemoryAccountDb) {
        let chain = Arc::new(InMemoryChainStore::new());
        let proposal_set = ProposalSet::new();
        let miner_manager: Arc<dyn MinerManagerApi> = Arc::new(MinerManagerService::new(proposal_set));
        let vm = Arc::new(ReferenceVm::new());
        let executor: Arc<dyn TransactionExecutorApi> = Arc::new(TransactionExecutorService::new(vm, miner_manager));
        let mempool: Arc<dyn MempoolApi> = Arc::new(TxPool::new(MempoolConfig::default(), Arc::new(NoopNonceView)));
        let db = qc_04_state_management::InMemoryAccountDb::new();
        (Finalizer::new(chain.clone(), executor, mempool), chain, db)
    }

    #[test]
    fn appends_header_with_aggregate_signature_and_pays_reward() {
        let (finalizer, chain, mut db) = build_finalizer();
        let castor = Address([7u8; 32]);
        let verifier = Address([8u8; 32]);
        let bh = header(&chain, castor, [9u8; 32]);

        let sk = BlsSecretKey::from_seed(&[3u8; 32]).unwrap();
        let aggregate_signature = sk.sign(&bh.hash());
        let random_signature = sk.sign(b"random-seed-for-this-slot");

        let recovered = RecoveredBlock {
            header: bh.clone(),
            aggregate_signature,
            random_signature,
            verifiers: vec![verifier],
            transactions: vec![],
        };

        let outcome = finalizer.apply_recovered(&mut db, recovered).unwrap();
        assert_eq!(outcome.proposer, castor);
        assert_eq!(chain.top_height(), bh.height);
        assert!(!outcome.header.signature.is_empty());
        assert!(!outcome.header.random.is_empty());
        assert_eq!(outcome.header.hash(), bh.hash());
    }

    #[test]
    fn rejects_non_canonical_parent() {
        let (finalizer, chain, mut db) = build_finalizer();
        let mut bh = header(&chain, Address([7u8; 32]), [9u8; 32]);
        bh.pre_hash = [0xEEu8; 32];
        let sk = BlsSecretKey::from_seed(&[3u8; 32]).unwrap();
        let sig = sk.sign(&bh.hash());
        let recovered = RecoveredBlock {
            header: bh,
            aggregate_signature: sig.clone(),
            random_signature: sig,
            verifiers: vec![Address([8u8; 32])],
            transactions: vec![],
        };
        let result = finalizer.apply_recovered(&mut db, recovered);
        assert!(matches!(result, Err(FinalityError::NotCanonical { .. })));
    }

    #[test]
    fn rejects_empty_verifier_list() {
        let (finalizer, chain, mut db) = build_finalizer();
        let bh = header(&chain, Address([7u8; 32]), [9u8; 32]);
        let sk = BlsSecretKey::from_seed(&[3u8; 32]).unwrap();
        let sig = sk.sign(&bh.hash());
        let recovered = RecoveredBlock {
            header: bh,
            aggregate_signature: sig.clone(),
            random_signature: sig,
            verifiers: vec![],
            transactions: vec![],
        };
        let result = finalizer.apply_recovered(&mut db, recovered);
        assert!(matches!(result, Err(FinalityError::NoVerifiers)));
    }
}
