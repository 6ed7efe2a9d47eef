//! Wires `TxPool` to the `MempoolApi` inbound port.

use crate::domain::entities::{Eviction, PooledTransaction, Tier};
use crate::domain::errors::MempoolError;
use crate::domain::pool::TxPool;
use crate::ports::inbound::MempoolApi;
use crate::ports::outbound::AccountNonceView;
use shared_types::{Hash, RawTransaction};

impl<N: AccountNonceView> MempoolApi for TxPool<N> {
    fn push(&self, tx: RawTransaction) -> Result<(Tier, Vec<Eviction>), MempoolError> {
        TxPool::push(self, tx)
    }

    fn remove(&self, hash: &Hash) {
        TxPool::remove(self, hash)
    }

    fn promote_queue_to_pending(&self) {
        TxPool::promote_queue_to_pending(self)
    }

    fn each_for_pack(&self, f: &mut dyn FnMut(&PooledTransaction) -> bool) {
        TxPool::each_for_pack(self, f)
    }

    fn contains(&self, hash: &Hash) -> bool {
        TxPool::contains(self, hash)
    }

    fn pending_len(&self) -> usize {
        TxPool::pending_len(self)
    }

    fn queue_len(&self) -> usize {
        TxPool::queue_len(self)
    }
}
