//! Account-DB key layout for miner records and stake details (spec §6
//! "Persisted state layout"):
//!
//! - `minerPoolAddr` storage, key `prefixPoolProposal ++ addr` / `prefixPoolVerifier
//!   ++ addr` → presence marker, scanned by `get_all_miners` / the
//!   active-proposer-set reload.
//! - a miner's own account storage, key `b"miner:" ++ type-tag` → the
//!   encoded `Miner` record itself (the marker only says it exists; this is
//!   where its fields live).
//! - `target`'s account storage, key `prefixDetail ++ source ++ mtype ++
//!   status` → the encoded `StakeDetail` value/height pair.

use qc_04_state_management::AccountDB;
use shared_types::{Address, Miner, MinerStatus, MinerType, StakeDetail, StakeStatus};

/// The well-known account whose storage subtree indexes all proposal and
/// verify miners by presence marker.
pub const MINER_POOL_ADDR: Address = Address([0xFFu8; 32]);
pub const PREFIX_POOL_PROPOSAL: &[u8] = b"pool/proposal/";
pub const PREFIX_POOL_VERIFIER: &[u8] = b"pool/verifier/";
pub const PREFIX_DETAIL: &[u8] = b"detail/";

/// `minimumStake()`: the stake floor below which a miner is frozen on
/// reduction and which `minerPenalty` slashes per target.
pub fn minimum_stake() -> u64 {
    500_000
}

/// Abort-to-refund delay in blocks (spec §6 constant).
pub const REFUND_ABORT_DELAY: u64 = 10;

fn pool_prefix(mtype: MinerType) -> &'static [u8] {
    match mtype {
        MinerType::Proposal => PREFIX_POOL_PROPOSAL,
        MinerType::Verify => PREFIX_POOL_VERIFIER,
    }
}

fn pool_key(mtype: MinerType, addr: &Address) -> Vec<u8> {
    let mut key = pool_prefix(mtype).to_vec();
    key.extend_from_slice(&addr.0);
    key
}

fn miner_record_key(mtype: MinerType) -> &'static [u8] {
    match mtype {
        MinerType::Proposal => b"miner:proposal",
        MinerType::Verify => b"miner:verify",
    }
}

fn status_tag(status: StakeStatus) -> u8 {
    match status {
        StakeStatus::Staked => 0,
        StakeStatus::StakeFrozen => 1,
    }
}

fn mtype_tag(mtype: MinerType) -> u8 {
    match mtype {
        MinerType::Proposal => 0,
        MinerType::Verify => 1,
    }
}

pub fn detail_key(source: &Address, mtype: MinerType, status: StakeStatus) -> Vec<u8> {
    let mut key = PREFIX_DETAIL.to_vec();
    key.extend_from_slice(&source.0);
    key.push(mtype_tag(mtype));
    key.push(status_tag(status));
    key
}

pub fn get_miner(db: &dyn AccountDB, addr: &Address, mtype: MinerType) -> Option<Miner> {
    if db.get_storage(&MINER_POOL_ADDR, &pool_key(mtype, addr)).is_none() {
        // Aborted miners are removed from the pool marker but their record
        // survives for queries (refund, history) until overwritten.
        let raw = db.get_storage(addr, miner_record_key(mtype))?;
        return bincode::deserialize(&raw).ok();
    }
    let raw = db.get_storage(addr, miner_record_key(mtype))?;
    bincode::deserialize(&raw).ok()
}

pub fn put_miner(db: &mut dyn AccountDB, miner: &Miner) {
    let encoded = bincode::serialize(miner).expect("Miner serializes infallibly");
    db.set_storage(&miner.id, miner_record_key(miner.miner_type).to_vec(), encoded);
    match miner.status {
        MinerStatus::Abort => {
            // Abort removes proposer-set membership immediately (spec §4.C
            // invariant 3); the record stays queryable.
            db.set_storage(&MINER_POOL_ADDR, pool_key(miner.miner_type, &miner.id), vec![]);
        }
        _ => {
            db.set_storage(&MINER_POOL_ADDR, pool_key(miner.miner_type, &miner.id), vec![1]);
        }
    }
}

pub fn is_in_pool(db: &dyn AccountDB, addr: &Address, mtype: MinerType) -> bool {
    matches!(db.get_storage(&MINER_POOL_ADDR, &pool_key(mtype, addr)), Some(v) if v == [1])
}

pub fn get_all_miners(db: &dyn AccountDB, mtype: MinerType) -> Vec<Miner> {
    let prefix = pool_prefix(mtype);
    db.data_iterator(&MINER_POOL_ADDR, prefix)
        .filter(|(_, v)| v == &[1])
        .filter_map(|(key, _)| {
            let addr = Address::from_slice(&key[prefix.len()..]);
            get_miner(db, &addr, mtype)
        })
        .collect()
}

pub fn get_proposal_total_stake(db: &dyn AccountDB) -> u64 {
    get_all_miners(db, MinerType::Proposal)
        .iter()
        .filter(|m| m.status != MinerStatus::Abort)
        .map(|m| m.stake)
        .sum()
}

pub fn get_detail(db: &dyn AccountDB, target: &Address, source: &Address, mtype: MinerType, status: StakeStatus) -> Option<StakeDetail> {
    let raw = db.get_storage(target, &detail_key(source, mtype, status))?;
    bincode::deserialize(&raw).ok()
}

pub fn put_detail(db: &mut dyn AccountDB, detail: &StakeDetail) {
    let key = detail_key(&detail.source, detail.mtype, detail.status);
    let encoded = bincode::serialize(detail).expect("StakeDetail serializes infallibly");
    db.set_storage(&detail.target, key, encoded);
}

/// All four `(mtype, status)` combinations for a `(target, source)` pair,
/// in the order the reference implementation returns them.
pub fn get_stake_details(db: &dyn AccountDB, target: &Address, source: &Address) -> Vec<StakeDetail> {
    [
        (MinerType::Verify, StakeStatus::Staked),
        (MinerType::Verify, StakeStatus::StakeFrozen),
        (MinerType::Proposal, StakeStatus::Staked),
        (MinerType::Proposal, StakeStatus::StakeFrozen),
    ]
    .into_iter()
    .filter_map(|(mtype, status)| get_detail(db, target, source, mtype, status))
    .collect()
}

pub fn get_all_stake_details(db: &dyn AccountDB, target: &Address) -> Vec<StakeDetail> {
    db.data_iterator(target, PREFIX_DETAIL)
        .filter_map(|(_, v)| bincode::deserialize::<StakeDetail>(&v).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_04_state_management::InMemoryAccountDb;
    use shared_types::BigInt;

    fn sample_miner(id: Address, mtype: MinerType, stake: u64) -> Miner {
        Miner {
            id,
            miner_type: mtype,
            stake,
            status: MinerStatus::Normal,
            apply_height: 0,
            abort_height: 0,
            public_key: vec![],
            vrf_public_key: vec![],
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let mut db = InMemoryAccountDb::new();
        let addr = Address([9u8; 32]);
        let miner = sample_miner(addr, MinerType::Proposal, 1_000_000);
        put_miner(&mut db, &miner);

        let fetched = get_miner(&db, &addr, MinerType::Proposal).unwrap();
        assert_eq!(fetched.stake, 1_000_000);
        assert!(is_in_pool(&db, &addr, MinerType::Proposal));
    }

    #[test]
    fn abort_removes_pool_membership_but_keeps_record() {
        let mut db = InMemoryAccountDb::new();
        let addr = Address([3u8; 32]);
        let mut miner = sample_miner(addr, MinerType::Proposal, 1_000_000);
        put_miner(&mut db, &miner);
        assert!(is_in_pool(&db, &addr, MinerType::Proposal));

        miner.status = MinerStatus::Abort;
        put_miner(&mut db, &miner);
        assert!(!is_in_pool(&db, &addr, MinerType::Proposal));
        assert!(get_miner(&db, &addr, MinerType::Proposal).is_some());
    }

    #[test]
    fn get_all_miners_scans_pool_prefix() {
        let mut db = InMemoryAccountDb::new();
        for b in 1u8..=3 {
            put_miner(&mut db, &sample_miner(Address([b; 32]), MinerType::Verify, 500_000));
        }
        let all = get_all_miners(&db, MinerType::Verify);
        assert_eq!(all.len(), 3);
        assert_eq!(get_proposal_total_stake(&db), 0);
    }

    #[test]
    fn stake_detail_keyed_by_source_type_status() {
        let mut db = InMemoryAccountDb::new();
        let target = Address([1u8; 32]);
        let source = Address([2u8; 32]);
        let detail = StakeDetail {
            source,
            target,
            mtype: MinerType::Verify,
            status: StakeStatus::Staked,
            value: 500_000,
            update_height: 10,
        };
        put_detail(&mut db, &detail);

        let fetched = get_detail(&db, &target, &source, MinerType::Verify, StakeStatus::Staked).unwrap();
        assert_eq!(fetched.value, 500_000);
        assert_eq!(get_stake_details(&db, &target, &source).len(), 1);
        let _ = BigInt::ZERO;
    }
}
