//! Pool-internal transaction wrapper and outcome types.

use shared_types::{Address, BigInt, Hash, RawTransaction};

/// A transaction that has passed signature recovery and is held by the
/// pool. Caches the fields the pool sorts and indexes by so it never
/// re-hashes or re-derives them on the hot path.
#[derive(Clone, Debug)]
pub struct PooledTransaction {
    pub tx: RawTransaction,
    pub hash: Hash,
    pub sender: Address,
}

impl PooledTransaction {
    pub fn new(tx: RawTransaction) -> Option<Self> {
        let sender = tx.source?;
        let hash = tx.hash();
        Some(Self { tx, hash, sender })
    }

    pub fn nonce(&self) -> u64 {
        self.tx.nonce
    }

    pub fn gas_price(&self) -> BigInt {
        self.tx.gas_price
    }
}

/// Which tier a just-admitted transaction landed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Pending,
    Queue,
}

/// A transaction evicted to make room under a per-sender capacity bound.
#[derive(Clone, Debug)]
pub struct Eviction {
    pub hash: Hash,
    pub sender: Address,
    pub tier: Tier,
}
