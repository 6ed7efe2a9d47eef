//! # `AccountDB` Capability
//!
//! The transaction executor (qc-12) and miner manager (qc-13) depend only
//! on this abstract capability, never on a concrete backend — the real
//! in-memory implementation and a test mock both satisfy it.

use shared_types::{Address, BigInt, Hash};

/// Opaque snapshot handle; only meaningful as an argument to
/// `revert_to_snapshot` on the same `AccountDB` instance that produced it.
pub type SnapshotId = usize;

pub trait AccountDB: Send + Sync {
    fn get_balance(&self, addr: &Address) -> BigInt;
    fn add_balance(&mut self, addr: &Address, amount: BigInt);
    fn sub_balance(&mut self, addr: &Address, amount: BigInt) -> Result<(), crate::domain::errors::StateError>;

    fn get_nonce(&self, addr: &Address) -> u64;
    fn set_nonce(&mut self, addr: &Address, nonce: u64);

    /// Record a checkpoint; returns a handle to later `revert_to_snapshot`.
    fn snapshot(&mut self) -> SnapshotId;
    /// Undo every mutation made since `id` was taken.
    fn revert_to_snapshot(&mut self, id: SnapshotId);

    /// Fold all touched accounts' state into one root digest. When
    /// `delete_empty` is set, accounts with zero balance, zero nonce, no
    /// code, and no storage are pruned first (EIP-161-style cleanup).
    fn intermediate_root(&mut self, delete_empty: bool) -> Hash;

    fn exists(&self, addr: &Address) -> bool;
    fn get_code_hash(&self, addr: &Address) -> Hash;
    fn set_code(&mut self, addr: &Address, code: Vec<u8>);

    /// Scan an account's storage subtree for keys starting with `prefix`,
    /// in key order. Used by the miner manager's active-proposer-set
    /// reload (`proposalPool` prefix scan).
    fn data_iterator<'a>(&'a self, addr: &Address, prefix: &[u8]) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

    fn get_storage(&self, addr: &Address, key: &[u8]) -> Option<Vec<u8>>;
    fn set_storage(&mut self, addr: &Address, key: Vec<u8>, value: Vec<u8>);
}
