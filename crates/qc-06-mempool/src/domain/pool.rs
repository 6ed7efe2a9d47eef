//! # Transaction Pool
//!
//! Two tiers keyed by sender address plus a hash mirror:
//!
//! - `pending`: per-sender nonce-ordered run, contiguous from
//!   `stateNonce(sender) + 1`. Packable.
//! - `queue`: per-sender bag of future-nonce transactions, waiting for a
//!   gap to close.
//! - `all_txs`: hash -> sender, the exact mirror of `pending ∪ queue`.
//!
//! `push`, `remove`, `promote_queue_to_pending`, and `each_for_pack` are
//! mutually exclusive via one writer lock (`parking_lot::Mutex`);
//! `each_for_pack` holds the lock for its entire iteration so a concurrent
//! `remove` can never observe (or cause the iterator to observe) a
//! half-updated tier.

use crate::domain::entities::{Eviction, PooledTransaction, Tier};
use crate::domain::errors::MempoolError;
use crate::ports::outbound::AccountNonceView;
use parking_lot::Mutex;
use shared_types::{Address, Hash, RawTransaction};
use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::sync::Arc;

/// Per-sender capacity bounds. The spec names `pendingLimit`/`queueLimit`
/// without fixing a value; 64 of each comfortably covers a single block's
/// worth of transactions from one sender under the 3-second packing
/// deadline without letting one noisy sender starve the pool.
#[derive(Clone, Copy, Debug)]
pub struct MempoolConfig {
    pub pending_limit: usize,
    pub queue_limit: usize,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            pending_limit: 64,
            queue_limit: 64,
        }
    }
}

struct Inner {
    pending: HashMap<Address, BTreeMap<u64, PooledTransaction>>,
    queue: HashMap<Address, BTreeMap<u64, PooledTransaction>>,
    all_txs: HashMap<Hash, Address>,
}

impl Inner {
    fn new() -> Self {
        Self {
            pending: HashMap::new(),
            queue: HashMap::new(),
            all_txs: HashMap::new(),
        }
    }
}

pub struct TxPool<N: AccountNonceView> {
    config: MempoolConfig,
    nonce_source: Arc<N>,
    inner: Mutex<Inner>,
}

impl<N: AccountNonceView> TxPool<N> {
    pub fn new(config: MempoolConfig, nonce_source: Arc<N>) -> Self {
        Self {
            config,
            nonce_source,
            inner: Mutex::new(Inner::new()),
        }
    }

    /// Admit a transaction. Rejects an already-present hash; otherwise
    /// places it in `pending` if its nonce is exactly
    /// `nonce(sender) + 1` ahead of what is already packable for that
    /// sender, or `queue` otherwise — then enforces per-sender capacity.
    pub fn push(&self, tx: RawTransaction) -> Result<(Tier, Vec<Eviction>), MempoolError> {
        let pooled = PooledTransaction::new(tx).ok_or(MempoolError::MissingSource)?;
        let mut inner = self.inner.lock();

        if inner.all_txs.contains_key(&pooled.hash) {
            return Err(MempoolError::DuplicateTransaction);
        }

        let sender = pooled.sender;
        let expected_next = self.next_pending_nonce(&inner, &sender);

        let mut evictions = Vec::new();
        let tier = if pooled.nonce() == expected_next {
            inner.all_txs.insert(pooled.hash, sender);
            inner
                .pending
                .entry(sender)
                .or_default()
                .insert(pooled.nonce(), pooled);
            evictions.extend(self.enforce_pending_limit(&mut inner, &sender));
            Tier::Pending
        } else {
            inner.all_txs.insert(pooled.hash, sender);
            inner
                .queue
                .entry(sender)
                .or_default()
                .insert(pooled.nonce(), pooled);
            evictions.extend(self.enforce_queue_limit(&mut inner, &sender));
            Tier::Queue
        };

        Ok((tier, evictions))
    }

    /// `nonce(sender) + 1` if `sender` has no pending run yet, else one
    /// past the highest contiguous nonce already pending.
    fn next_pending_nonce(&self, inner: &Inner, sender: &Address) -> u64 {
        match inner.pending.get(sender).and_then(|run| run.keys().last()) {
            Some(&highest) => highest + 1,
            None => self.nonce_source.nonce(sender) + 1,
        }
    }

    fn enforce_pending_limit(&self, inner: &mut Inner, sender: &Address) -> Vec<Eviction> {
        let mut evicted = Vec::new();
        if let Some(run) = inner.pending.get_mut(sender) {
            while run.len() > self.config.pending_limit {
                if let Some((_, tx)) = run.pop_last() {
                    inner.all_txs.remove(&tx.hash);
                    evicted.push(Eviction {
                        hash: tx.hash,
                        sender: *sender,
                        tier: Tier::Pending,
                    });
                }
            }
        }
        evicted
    }

    fn enforce_queue_limit(&self, inner: &mut Inner, sender: &Address) -> Vec<Eviction> {
        let mut evicted = Vec::new();
        if let Some(run) = inner.queue.get_mut(sender) {
            while run.len() > self.config.queue_limit {
                if let Some((&oldest_nonce, _)) = run.iter().next() {
                    if let Some(tx) = run.remove(&oldest_nonce) {
                        inner.all_txs.remove(&tx.hash);
                        evicted.push(Eviction {
                            hash: tx.hash,
                            sender: *sender,
                            tier: Tier::Queue,
                        });
                    }
                } else {
                    break;
                }
            }
        }
        evicted
    }

    /// Scan queues for transactions whose nonce has become contiguous with
    /// pending and move them across, re-indexing by price as a side effect
    /// of simply existing in `pending`.
    pub fn promote_queue_to_pending(&self) {
        let mut inner = self.inner.lock();
        let senders: Vec<Address> = inner.queue.keys().copied().collect();

        for sender in senders {
            loop {
                let mut expected = self.next_pending_nonce(&inner, &sender);
                let promotable = inner
                    .queue
                    .get(&sender)
                    .and_then(|run| run.get(&expected).map(|_| expected));

                match promotable {
                    Some(nonce) => {
                        if let Some(tx) = inner.queue.get_mut(&sender).unwrap().remove(&nonce) {
                            inner.pending.entry(sender).or_default().insert(nonce, tx);
                        }
                        expected += 1;
                    }
                    None => break,
                }
            }
            if inner.queue.get(&sender).map_or(false, |q| q.is_empty()) {
                inner.queue.remove(&sender);
            }
        }
    }

    /// Delete a transaction wherever it lives.
    pub fn remove(&self, hash: &Hash) {
        let mut inner = self.inner.lock();
        let Some(sender) = inner.all_txs.remove(hash) else {
            return;
        };
        if let Some(run) = inner.pending.get_mut(&sender) {
            run.retain(|_, tx| &tx.hash != hash);
            if run.is_empty() {
                inner.pending.remove(&sender);
            }
        }
        if let Some(run) = inner.queue.get_mut(&sender) {
            run.retain(|_, tx| &tx.hash != hash);
            if run.is_empty() {
                inner.queue.remove(&sender);
            }
        }
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.inner.lock().all_txs.contains_key(hash)
    }

    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending.values().map(|r| r.len()).sum()
    }

    pub fn queue_len(&self) -> usize {
        self.inner.lock().queue.values().map(|r| r.len()).sum()
    }

    /// Yield pending transactions in descending gas-price order across
    /// senders, strictly ascending nonce within a sender. Stops early if
    /// `f` returns `false`. Holds the writer lock for the whole call, and
    /// re-checks each sender's on-chain nonce as it advances so a
    /// transaction whose nonce went stale mid-iteration (consumed by a
    /// concurrent commit that this same lock serializes against) is
    /// skipped rather than yielded twice.
    pub fn each_for_pack(&self, f: &mut dyn FnMut(&PooledTransaction) -> bool) {
        let inner = self.inner.lock();

        // (price, sender) ordered so the BinaryHeap (max-heap) pops the
        // highest price first; sender tie-breaks for determinism.
        struct HeapEntry {
            price: shared_types::BigInt,
            sender: Address,
            nonce: u64,
        }
        impl PartialEq for HeapEntry {
            fn eq(&self, other: &Self) -> bool {
                self.price == other.price && self.sender == other.sender
            }
        }
        impl Eq for HeapEntry {}
        impl PartialOrd for HeapEntry {
            fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for HeapEntry {
            fn cmp(&self, other: &Self) -> CmpOrdering {
                self.price.cmp(&other.price).then(self.sender.cmp(&other.sender))
            }
        }

        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
        for (sender, run) in inner.pending.iter() {
            if let Some((&nonce, tx)) = run.iter().next() {
                heap.push(HeapEntry {
                    price: tx.gas_price(),
                    sender: *sender,
                    nonce,
                });
            }
        }

        while let Some(HeapEntry { sender, nonce, .. }) = heap.pop() {
            let Some(run) = inner.pending.get(&sender) else {
                continue;
            };
            let Some(tx) = run.get(&nonce) else {
                continue;
            };

            let expected = self.nonce_source.nonce(&sender) + 1;
            if nonce < expected {
                // Stale: already included on-chain via another path. Skip
                // and advance to this sender's next candidate, if any.
            } else if !f(tx) {
                return;
            }

            if let Some(next_tx) = run.range(nonce + 1..).next() {
                heap.push(HeapEntry {
                    price: next_tx.1.gas_price(),
                    sender,
                    nonce: *next_tx.0,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Address, BigInt, TxType};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex as StdMutex;

    struct FixedNonce(AtomicU64);
    impl AccountNonceView for FixedNonce {
        fn nonce(&self, _sender: &Address) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct PerSenderNonce(StdMutex<HashMap<Address, u64>>);
    impl AccountNonceView for PerSenderNonce {
        fn nonce(&self, sender: &Address) -> u64 {
            *self.0.lock().unwrap().get(sender).unwrap_or(&0)
        }
    }

    fn tx(sender: Address, nonce: u64, price: u64) -> RawTransaction {
        RawTransaction {
            tx_type: TxType::Transfer,
            nonce,
            value: BigInt::ZERO,
            target: None,
            gas_limit: 21_000,
            gas_price: BigInt(price as u128),
            data: vec![],
            extra_data: vec![nonce as u8, price as u8],
            sign: vec![],
            source: Some(sender),
        }
    }

    #[test]
    fn admits_contiguous_nonce_into_pending() {
        let pool = TxPool::new(MempoolConfig::default(), Arc::new(FixedNonce(AtomicU64::new(0))));
        let sender = Address([1u8; 32]);
        let (tier, evictions) = pool.push(tx(sender, 1, 10)).unwrap();
        assert_eq!(tier, Tier::Pending);
        assert!(evictions.is_empty());
        assert_eq!(pool.pending_len(), 1);
    }

    #[test]
    fn admits_future_nonce_into_queue() {
        let pool = TxPool::new(MempoolConfig::default(), Arc::new(FixedNonce(AtomicU64::new(0))));
        let sender = Address([1u8; 32]);
        let (tier, _) = pool.push(tx(sender, 5, 10)).unwrap();
        assert_eq!(tier, Tier::Queue);
        assert_eq!(pool.queue_len(), 1);
    }

    #[test]
    fn rejects_duplicate_hash() {
        let pool = TxPool::new(MempoolConfig::default(), Arc::new(FixedNonce(AtomicU64::new(0))));
        let sender = Address([1u8; 32]);
        let t = tx(sender, 1, 10);
        pool.push(t.clone()).unwrap();
        assert_eq!(pool.push(t).unwrap_err(), MempoolError::DuplicateTransaction);
    }

    #[test]
    fn promotes_contiguous_queue_entries() {
        let pool = TxPool::new(MempoolConfig::default(), Arc::new(FixedNonce(AtomicU64::new(0))));
        let sender = Address([1u8; 32]);
        pool.push(tx(sender, 2, 10)).unwrap();
        pool.push(tx(sender, 3, 10)).unwrap();
        assert_eq!(pool.queue_len(), 2);

        pool.push(tx(sender, 1, 10)).unwrap();
        pool.promote_queue_to_pending();

        assert_eq!(pool.pending_len(), 3);
        assert_eq!(pool.queue_len(), 0);
    }

    #[test]
    fn enforces_pending_limit_by_evicting_highest_nonce() {
        let config = MempoolConfig {
            pending_limit: 2,
            queue_limit: 64,
        };
        let pool = TxPool::new(config, Arc::new(FixedNonce(AtomicU64::new(0))));
        let sender = Address([1u8; 32]);
        pool.push(tx(sender, 1, 10)).unwrap();
        pool.push(tx(sender, 2, 10)).unwrap();
        let (_, evictions) = pool.push(tx(sender, 3, 10)).unwrap();

        assert_eq!(pool.pending_len(), 2);
        assert_eq!(evictions.len(), 1);
        assert_eq!(evictions[0].tier, Tier::Pending);
    }

    #[test]
    fn each_for_pack_orders_by_price_desc_then_nonce_asc() {
        let senders = [Address([1u8; 32]), Address([2u8; 32])];
        let nonce_source = Arc::new(FixedNonce(AtomicU64::new(0)));
        let pool = TxPool::new(MempoolConfig::default(), nonce_source);

        // Sender 1: nonces 1,2 at price 20,30. Sender 2: nonce 1 at price 25.
        pool.push(tx(senders[0], 1, 20)).unwrap();
        pool.push(tx(senders[0], 2, 30)).unwrap();
        pool.push(tx(senders[1], 1, 25)).unwrap();

        let mut order = Vec::new();
        pool.each_for_pack(&mut |t| {
            order.push((t.sender, t.nonce(), t.gas_price().0));
            true
        });

        // Sender 1's head (nonce 1, price 20) competes with sender 2 (price 25):
        // sender 2 goes first, then sender 1 nonce 1 (price 20), then sender 1
        // nonce 2 (price 30) since nonce order within a sender is strict.
        assert_eq!(
            order,
            vec![
                (senders[1], 1, 25),
                (senders[0], 1, 20),
                (senders[0], 2, 30),
            ]
        );
    }

    #[test]
    fn each_for_pack_skips_stale_nonce() {
        let sender = Address([1u8; 32]);
        let per_sender = Arc::new(PerSenderNonce(StdMutex::new(HashMap::new())));
        let pool = TxPool::new(MempoolConfig::default(), per_sender.clone());

        pool.push(tx(sender, 1, 10)).unwrap();
        pool.push(tx(sender, 2, 10)).unwrap();

        // Simulate the account DB advancing past nonce 1 mid-packing.
        per_sender.0.lock().unwrap().insert(sender, 1);

        let mut seen = Vec::new();
        pool.each_for_pack(&mut |t| {
            seen.push(t.nonce());
            true
        });

        assert_eq!(seen, vec![2]);
    }

    #[test]
    fn remove_drops_from_all_txs_mirror() {
        let pool = TxPool::new(MempoolConfig::default(), Arc::new(FixedNonce(AtomicU64::new(0))));
        let sender = Address([1u8; 32]);
        let t = tx(sender, 1, 10);
        let hash = t.hash();
        pool.push(t).unwrap();
        assert!(pool.contains(&hash));

        pool.remove(&hash);
        assert!(!pool.contains(&hash));
        assert_eq!(pool.pending_len(), 0);
    }
}
