//! In-memory `ChainStore` backed by a hash map of appended headers plus a
//! cached chain head. Seeds itself with a zero-height genesis header so
//! `top_height`/`top_hash` are always well-defined before the first real
//! block lands.

use crate::ports::chain::ChainStore;
use parking_lot::RwLock;
use shared_types::{Address, BlockHeader, Hash};
use std::collections::HashMap;

struct ChainState {
    by_hash: HashMap<Hash, BlockHeader>,
    top_hash: Hash,
    top_height: u64,
}

fn genesis_header() -> BlockHeader {
    BlockHeader {
        height: 0,
        pre_hash: [0u8; 32],
        elapsed_ms: 0,
        prove_value: Vec::new(),
        total_qn: 0,
        cur_time: 0,
        castor: Address::ZERO,
        group: [0u8; 32],
        signature: Vec::new(),
        nonce: 0,
        tx_tree: [0u8; 32],
        receipt_tree: [0u8; 32],
        state_tree: [0u8; 32],
        extra_data: Vec::new(),
        random: Vec::new(),
        gas_fee: 0,
    }
}

pub struct InMemoryChainStore {
    state: RwLock<ChainState>,
}

impl InMemoryChainStore {
    pub fn new() -> Self {
        let genesis = genesis_header();
        let hash = genesis.hash();
        let mut by_hash = HashMap::new();
        by_hash.insert(hash, genesis);
        Self {
            state: RwLock::new(ChainState { by_hash, top_hash: hash, top_height: 0 }),
        }
    }
}

impl Default for InMemoryChainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainStore for InMemoryChainStore {
    fn contains(&self, hash: &Hash) -> bool {
        self.state.read().by_hash.contains_key(hash)
    }

    fn header_by_hash(&self, hash: &Hash) -> Option<BlockHeader> {
        self.state.read().by_hash.get(hash).cloned()
    }

    fn top_height(&self) -> u64 {
        self.state.read().top_height
    }

    fn top_hash(&self) -> Hash {
        self.state.read().top_hash
    }

    fn append(&self, header: BlockHeader) {
        let hash = header.hash();
        let mut state = self.state.write();
        state.top_height = header.height;
        state.top_hash = hash;
        state.by_hash.insert(hash, header);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_is_present_and_is_the_initial_head() {
        let store = InMemoryChainStore::new();
        assert_eq!(store.top_height(), 0);
        assert!(store.contains(&store.top_hash()));
    }

    #[test]
    fn append_advances_the_head() {
        let store = InMemoryChainStore::new();
        let parent_hash = store.top_hash();
        let mut header = genesis_header();
        header.height = 1;
        header.pre_hash = parent_hash;
        header.elapsed_ms = 1500;
        let hash = header.hash();

        store.append(header);

        assert_eq!(store.top_height(), 1);
        assert_eq!(store.top_hash(), hash);
        assert!(store.contains(&hash));
        assert!(store.contains(&parent_hash));
    }

    #[test]
    fn header_by_hash_resolves_appended_headers() {
        let store = InMemoryChainStore::new();
        let mut header = genesis_header();
        header.height = 1;
        header.pre_hash = store.top_hash();
        header.elapsed_ms = 1000;
        let hash = header.hash();
        store.append(header.clone());

        let resolved = store.header_by_hash(&hash).expect("header present");
        assert_eq!(resolved.height, header.height);
    }
}
