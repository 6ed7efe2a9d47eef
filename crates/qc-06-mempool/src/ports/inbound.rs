//! # Inbound Ports (Driving Ports / API)
//!
//! The public API the block-production driver (qc-17) and RPC tx
//! submission call into.

use crate::domain::entities::{Eviction, PooledTransaction, Tier};
use crate::domain::errors::MempoolError;
use shared_types::{Hash, RawTransaction};

pub trait MempoolApi: Send + Sync {
    /// Admit a transaction, returning the tier it landed in and any
    /// transactions evicted to make room for it.
    fn push(&self, tx: RawTransaction) -> Result<(Tier, Vec<Eviction>), MempoolError>;

    /// Remove a transaction (e.g. after it was included in a finalized block).
    fn remove(&self, hash: &Hash);

    /// Move queue entries that have become nonce-contiguous into pending.
    fn promote_queue_to_pending(&self);

    /// Iterate pending transactions in pack order; `f` returns `false` to stop.
    fn each_for_pack(&self, f: &mut dyn FnMut(&PooledTransaction) -> bool);

    fn contains(&self, hash: &Hash) -> bool;
    fn pending_len(&self) -> usize;
    fn queue_len(&self) -> usize;
}
