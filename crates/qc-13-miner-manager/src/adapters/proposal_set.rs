//! Active-proposer-set mirror (spec §5 "Channels-as-control-plane"),
//! grounded in `core/miner_manager.go`'s `existingProposal` map,
//! `proposalAddCh`/`proposalRemoveCh`, and `buildVirtualNetRoutine`.
//!
//! Rather than hit the account DB on every `is_active_proposer` query,
//! the manager keeps an in-memory `HashSet` fed by two channels (one per
//! direction) and periodically rebuilds it wholesale from the account
//! DB's proposal-pool prefix, bounding any drift introduced by missed
//! channel sends to one rebuild interval.

use crate::domain::store;
use qc_04_state_management::AccountDB;
use parking_lot::RwLock;
use shared_types::{Address, MinerType};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Ticks between full reloads of the proposer set from the account DB
/// (`heavyMinerNetTriggerInterval` in the reference implementation).
pub const REBUILD_INTERVAL_TICKS: u64 = 10;

#[derive(Default)]
pub struct ProposalSet {
    members: RwLock<HashSet<Address>>,
}

impl ProposalSet {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contains(&self, addr: &Address) -> bool {
        self.members.read().contains(addr)
    }

    pub fn insert(&self, addr: Address) {
        self.members.write().insert(addr);
    }

    pub fn remove(&self, addr: &Address) {
        self.members.write().remove(addr);
    }

    /// Full reload from the account DB's proposal-pool prefix, discarding
    /// whatever the set currently holds.
    pub fn rebuild(&self, db: &dyn AccountDB) {
        let fresh: HashSet<Address> = store::get_all_miners(db, MinerType::Proposal)
            .into_iter()
            .filter(|m| m.status != shared_types::MinerStatus::Abort)
            .map(|m| m.id)
            .collect();
        *self.members.write() = fresh;
    }
}

/// One end of the `proposalAddCh`/`proposalRemoveCh` pair: a background
/// task drains both channels into the shared set and rebuilds it wholesale
/// every [`REBUILD_INTERVAL_TICKS`] ticks.
pub struct ProposalUpdateChannels {
    pub add_tx: mpsc::UnboundedSender<Address>,
    pub remove_tx: mpsc::UnboundedSender<Address>,
}

pub fn spawn_listener(set: Arc<ProposalSet>) -> ProposalUpdateChannels {
    let (add_tx, mut add_rx) = mpsc::unbounded_channel::<Address>();
    let (remove_tx, mut remove_rx) = mpsc::unbounded_channel::<Address>();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(addr) = add_rx.recv() => {
                    set.insert(addr);
                    tracing::debug!(?addr, "proposer added to active set");
                }
                Some(addr) = remove_rx.recv() => {
                    set.remove(&addr);
                    tracing::debug!(?addr, "proposer removed from active set");
                }
                else => break,
            }
        }
    });

    ProposalUpdateChannels { add_tx, remove_tx }
}

/// Runs the periodic full-rebuild routine; intended to be driven by a
/// ticker in the composition root (node-runtime), passing the shared
/// `AccountDB` snapshot to reload from.
pub fn rebuild_routine_tick(set: &ProposalSet, db: &dyn AccountDB, tick: u64) {
    if tick % REBUILD_INTERVAL_TICKS == 0 {
        set.rebuild(db);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_04_state_management::InMemoryAccountDb;

    #[test]
    fn rebuild_reflects_account_db_contents() {
        let mut db = InMemoryAccountDb::new();
        let addr = Address([7u8; 32]);
        store::put_miner(
            &mut db,
            &shared_types::Miner {
                id: addr,
                miner_type: MinerType::Proposal,
                stake: 1_000_000,
                status: shared_types::MinerStatus::Normal,
                apply_height: 0,
                abort_height: 0,
                public_key: vec![],
                vrf_public_key: vec![],
            },
        );

        let set = ProposalSet::default();
        assert!(!set.contains(&addr));
        set.rebuild(&db);
        assert!(set.contains(&addr));
    }

    #[test]
    fn rebuild_interval_gates_on_tick_modulus() {
        let set = ProposalSet::default();
        let db = InMemoryAccountDb::new();
        for tick in 1..REBUILD_INTERVAL_TICKS {
            rebuild_routine_tick(&set, &db, tick);
        }
        rebuild_routine_tick(&set, &db, REBUILD_INTERVAL_TICKS);
    }
}
