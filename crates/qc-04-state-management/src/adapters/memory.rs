//! In-memory `AccountDB` backed by a per-account map plus an undo journal.
//!
//! `snapshot`/`revert_to_snapshot` are implemented the way the reference
//! implementation's trie-backed `AccountDB` behaves from the caller's
//! perspective: every mutating call pushes its inverse onto a journal
//! before taking effect, and reverting replays the journal backwards down
//! to (and including) the snapshot mark. No separate copy-on-write trie is
//! needed for this capability's contract — callers only ever observe
//! balances, nonces, code, and storage through the trait.

use crate::domain::account::Account;
use crate::domain::errors::StateError;
use crate::ports::inbound::{AccountDB, SnapshotId};
use rayon::prelude::*;
use shared_types::{Address, BigInt, Hash};
use std::collections::HashMap;

enum UndoEntry {
    Balance { addr: Address, prior: BigInt },
    Nonce { addr: Address, prior: u64 },
    Code { addr: Address, prior_hash: Hash, prior_code: Vec<u8> },
    Storage { addr: Address, key: Vec<u8>, prior: Option<Vec<u8>> },
    CreatedAccount { addr: Address },
}

/// The reference `AccountDB` implementation: an in-memory account map with
/// snapshot/revert via an undo journal. Production deployments would swap
/// this out for a disk-backed trie; the capability contract is identical.
#[derive(Default)]
pub struct InMemoryAccountDb {
    accounts: HashMap<Address, Account>,
    journal: Vec<UndoEntry>,
    /// Journal length recorded at each outstanding `snapshot()` call.
    marks: Vec<usize>,
}

impl InMemoryAccountDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn account(&self, addr: &Address) -> Option<&Account> {
        self.accounts.get(addr)
    }

    fn account_mut(&mut self, addr: &Address) -> &mut Account {
        self.accounts.entry(*addr).or_insert_with(|| {
            self.journal.push(UndoEntry::CreatedAccount { addr: *addr });
            Account::default()
        })
    }
}

impl AccountDB for InMemoryAccountDb {
    fn get_balance(&self, addr: &Address) -> BigInt {
        self.account(addr).map(|a| a.balance).unwrap_or(BigInt::ZERO)
    }

    fn add_balance(&mut self, addr: &Address, amount: BigInt) {
        if amount == BigInt::ZERO {
            return;
        }
        let prior = self.get_balance(addr);
        let acc = self.account_mut(addr);
        acc.balance = acc.balance.checked_add(amount).expect("balance overflow");
        self.journal.push(UndoEntry::Balance { addr: *addr, prior });
    }

    fn sub_balance(&mut self, addr: &Address, amount: BigInt) -> Result<(), StateError> {
        if amount == BigInt::ZERO {
            return Ok(());
        }
        let prior = self.get_balance(addr);
        let next = prior.checked_sub(amount).ok_or(StateError::BalanceNotEnough)?;
        let acc = self.account_mut(addr);
        acc.balance = next;
        self.journal.push(UndoEntry::Balance { addr: *addr, prior });
        Ok(())
    }

    fn get_nonce(&self, addr: &Address) -> u64 {
        self.account(addr).map(|a| a.nonce).unwrap_or(0)
    }

    fn set_nonce(&mut self, addr: &Address, nonce: u64) {
        let prior = self.get_nonce(addr);
        self.account_mut(addr).nonce = nonce;
        self.journal.push(UndoEntry::Nonce { addr: *addr, prior });
    }

    fn snapshot(&mut self) -> SnapshotId {
        self.marks.push(self.journal.len());
        self.marks.len() - 1
    }

    fn revert_to_snapshot(&mut self, id: SnapshotId) {
        let Some(&mark) = self.marks.get(id) else {
            return;
        };
        while self.journal.len() > mark {
            match self.journal.pop().expect("checked len above") {
                UndoEntry::Balance { addr, prior } => {
                    if let Some(acc) = self.accounts.get_mut(&addr) {
                        acc.balance = prior;
                    }
                }
                UndoEntry::Nonce { addr, prior } => {
                    if let Some(acc) = self.accounts.get_mut(&addr) {
                        acc.nonce = prior;
                    }
                }
                UndoEntry::Code { addr, prior_hash, prior_code } => {
                    if let Some(acc) = self.accounts.get_mut(&addr) {
                        acc.code_hash = prior_hash;
                        acc.code = prior_code;
                    }
                }
                UndoEntry::Storage { addr, key, prior } => {
                    if let Some(acc) = self.accounts.get_mut(&addr) {
                        match prior {
                            Some(v) => {
                                acc.storage.insert(key, v);
                            }
                            None => {
                                acc.storage.remove(&key);
                            }
                        }
                    }
                }
                UndoEntry::CreatedAccount { addr } => {
                    self.accounts.remove(&addr);
                }
            }
        }
        self.marks.truncate(id);
    }

    fn intermediate_root(&mut self, delete_empty: bool) -> Hash {
        if delete_empty {
            self.accounts.retain(|_, acc| !acc.is_empty());
        }
        let mut leaves: Vec<(Address, Hash)> = self
            .accounts
            .par_iter()
            .map(|(addr, acc)| (*addr, acc.content_hash(&addr.0)))
            .collect();
        leaves.sort_by_key(|(addr, _)| *addr);
        shared_crypto::merkle_fold(&leaves.into_iter().map(|(_, h)| h).collect::<Vec<_>>())
    }

    fn exists(&self, addr: &Address) -> bool {
        self.accounts.contains_key(addr)
    }

    fn get_code_hash(&self, addr: &Address) -> Hash {
        self.account(addr).map(|a| a.code_hash).unwrap_or([0u8; 32])
    }

    fn set_code(&mut self, addr: &Address, code: Vec<u8>) {
        let hash = shared_crypto::blake3_hash(&code);
        let (prior_hash, prior_code) = self
            .account(addr)
            .map(|a| (a.code_hash, a.code.clone()))
            .unwrap_or(([0u8; 32], Vec::new()));
        let acc = self.account_mut(addr);
        acc.code_hash = hash;
        acc.code = code;
        self.journal.push(UndoEntry::Code { addr: *addr, prior_hash, prior_code });
    }

    fn data_iterator<'a>(&'a self, addr: &Address, prefix: &[u8]) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a> {
        let prefix = prefix.to_vec();
        match self.account(addr) {
            Some(acc) => Box::new(
                acc.storage
                    .range(prefix.clone()..)
                    .take_while(move |(k, _)| k.starts_with(&prefix))
                    .map(|(k, v)| (k.clone(), v.clone())),
            ),
            None => Box::new(std::iter::empty()),
        }
    }

    fn get_storage(&self, addr: &Address, key: &[u8]) -> Option<Vec<u8>> {
        self.account(addr).and_then(|a| a.storage.get(key).cloned())
    }

    fn set_storage(&mut self, addr: &Address, key: Vec<u8>, value: Vec<u8>) {
        let prior = self.account(addr).and_then(|a| a.storage.get(&key).cloned());
        self.account_mut(addr).storage.insert(key.clone(), value);
        self.journal.push(UndoEntry::Storage { addr: *addr, key, prior });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 32])
    }

    #[test]
    fn balance_roundtrips() {
        let mut db = InMemoryAccountDb::new();
        db.add_balance(&addr(1), BigInt(100));
        assert_eq!(db.get_balance(&addr(1)), BigInt(100));
        db.sub_balance(&addr(1), BigInt(40)).unwrap();
        assert_eq!(db.get_balance(&addr(1)), BigInt(60));
    }

    #[test]
    fn sub_balance_rejects_insufficient_funds() {
        let mut db = InMemoryAccountDb::new();
        db.add_balance(&addr(1), BigInt(10));
        assert_eq!(db.sub_balance(&addr(1), BigInt(20)).unwrap_err(), StateError::BalanceNotEnough);
        assert_eq!(db.get_balance(&addr(1)), BigInt(10));
    }

    #[test]
    fn snapshot_revert_restores_exact_prior_state() {
        let mut db = InMemoryAccountDb::new();
        db.add_balance(&addr(1), BigInt(100));
        db.set_nonce(&addr(1), 5);

        let snap = db.snapshot();
        db.add_balance(&addr(1), BigInt(500));
        db.set_nonce(&addr(1), 99);
        db.add_balance(&addr(2), BigInt(77));

        db.revert_to_snapshot(snap);

        assert_eq!(db.get_balance(&addr(1)), BigInt(100));
        assert_eq!(db.get_nonce(&addr(1)), 5);
        assert_eq!(db.get_balance(&addr(2)), BigInt::ZERO);
    }

    #[test]
    fn nested_snapshots_revert_independently() {
        let mut db = InMemoryAccountDb::new();
        db.add_balance(&addr(1), BigInt(10));
        let outer = db.snapshot();
        db.add_balance(&addr(1), BigInt(20));
        let inner = db.snapshot();
        db.add_balance(&addr(1), BigInt(30));

        db.revert_to_snapshot(inner);
        assert_eq!(db.get_balance(&addr(1)), BigInt(30));

        db.revert_to_snapshot(outer);
        assert_eq!(db.get_balance(&addr(1)), BigInt(10));
    }

    #[test]
    fn storage_and_prefix_iteration() {
        let mut db = InMemoryAccountDb::new();
        let target = addr(9);
        db.set_storage(&target, b"proposalPool/a".to_vec(), b"1".to_vec());
        db.set_storage(&target, b"proposalPool/b".to_vec(), b"2".to_vec());
        db.set_storage(&target, b"other/c".to_vec(), b"3".to_vec());

        let found: Vec<_> = db.data_iterator(&target, b"proposalPool/").collect();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn intermediate_root_prunes_empty_accounts_when_requested() {
        let mut db = InMemoryAccountDb::new();
        db.add_balance(&addr(1), BigInt(10));
        db.sub_balance(&addr(1), BigInt(10)).unwrap();
        db.intermediate_root(true);
        assert!(!db.exists(&addr(1)));
    }

    #[test]
    fn code_set_and_retrieved() {
        let mut db = InMemoryAccountDb::new();
        db.set_code(&addr(3), vec![1, 2, 3]);
        assert_ne!(db.get_code_hash(&addr(3)), [0u8; 32]);
    }
}
