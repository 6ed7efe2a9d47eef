//! Adapts the shared `InMemoryAccountDb` to `qc-06-mempool`'s narrow
//! `AccountNonceView` outbound port, so the mempool never needs to know
//! about the full `AccountDB` capability (snapshot/revert, storage, …) it
//! has no business touching.

use parking_lot::RwLock;
use qc_04_state_management::{AccountDB, InMemoryAccountDb};
use qc_06_mempool::AccountNonceView;
use shared_types::Address;
use std::sync::Arc;

pub struct AccountDbNonceView {
    db: Arc<RwLock<InMemoryAccountDb>>,
}

impl AccountDbNonceView {
    pub fn new(db: Arc<RwLock<InMemoryAccountDb>>) -> Self {
        Self { db }
    }
}

impl AccountNonceView for AccountDbNonceView {
    fn nonce(&self, sender: &Address) -> u64 {
        self.db.read().get_nonce(sender)
    }
}
