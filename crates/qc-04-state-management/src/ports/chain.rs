//! # `ChainStore` Capability
//!
//! The canonical-header ledger the consensus (qc-08) and finality (qc-09)
//! subsystems share: "is this block already on chain", "does the parent
//! exist", and "append this threshold-signed header" are all chain-store
//! reads/writes, not account-state ones. Kept beside `AccountDB` because
//! both are per-node, single-writer stores a real deployment would back
//! with the same database; P2P-synced block bodies are out of scope
//! (spec §1).

use shared_types::{BlockHeader, Hash};

pub trait ChainStore: Send + Sync {
    /// True if a header with this hash has already been appended.
    fn contains(&self, hash: &Hash) -> bool;

    /// Look up a previously appended header by its hash.
    fn header_by_hash(&self, hash: &Hash) -> Option<BlockHeader>;

    /// Height of the most recently appended header, or 0 before genesis.
    fn top_height(&self) -> u64;

    /// Hash of the most recently appended header.
    fn top_hash(&self) -> Hash;

    /// Append `header` as the new chain head. Callers are responsible for
    /// having already verified `header.pre_hash == top_hash()` and
    /// `header.height == top_height() + 1`.
    fn append(&self, header: BlockHeader);
}
