//! Account entity: balance, nonce, code, and an arbitrary-key storage
//! subtree used by the miner manager for `Miner`/`StakeDetail` records.

use shared_types::{BigInt, Hash};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct Account {
    pub balance: BigInt,
    pub nonce: u64,
    pub code_hash: Hash,
    pub code: Vec<u8>,
    /// Arbitrary-key subtree. Account-db consumers (miner manager, staking)
    /// key their records here; `data_iterator` does a prefix scan over it.
    pub storage: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Account {
    pub fn is_empty(&self) -> bool {
        self.balance == BigInt::ZERO && self.nonce == 0 && self.code.is_empty() && self.storage.is_empty()
    }

    /// Deterministic digest of this account's full state, for folding into
    /// `intermediateRoot`.
    pub fn content_hash(&self, addr_bytes: &[u8]) -> Hash {
        let mut buf = Vec::with_capacity(64 + self.code.len());
        buf.extend_from_slice(addr_bytes);
        buf.extend_from_slice(&self.balance.0.to_be_bytes());
        buf.extend_from_slice(&self.nonce.to_be_bytes());
        buf.extend_from_slice(&self.code_hash);
        for (k, v) in &self.storage {
            buf.extend_from_slice(k);
            buf.extend_from_slice(v);
        }
        shared_crypto::blake3_hash(&buf)
    }
}
