//! Operation pipeline and status-transition state machine (spec §4.C),
//! grounded in `core/miner_manager.go`'s `executeOperation` and the
//! `Miner*Tx` dispatch in `core/tvm_executor.go`.
//!
//! The pipeline mirrors the Go source exactly: validate the operation
//! shape, parse its payload, snapshot the account DB, apply the mutation,
//! and on any error revert to the snapshot — the caller never observes a
//! partially-applied operation.

use crate::domain::errors::MinerError;
use crate::domain::store::{self, minimum_stake, REFUND_ABORT_DELAY};
use qc_04_state_management::AccountDB;
use shared_types::{Address, BigInt, Miner, MinerStatus, MinerType, StakeDetail, StakeStatus};

/// The four miner-management operation kinds a transaction may carry
/// (spec §4.C); `MinerAbort` ends proposer/verifier duty without
/// returning stake, `StakeRefund` returns it after the cool-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinerOperationKind {
    StakeAdd,
    StakeReduce,
    StakeRefund,
    MinerAbort,
}

/// A parsed miner-management operation: `source` funds/owns the
/// operation, `target` is the miner account it acts on (equal to
/// `source` except for delegated staking), `mtype` selects the
/// Proposal/Verify pool.
#[derive(Debug, Clone)]
pub struct MinerOperationMessage {
    pub kind: MinerOperationKind,
    pub source: Address,
    pub target: Address,
    pub mtype: MinerType,
    pub value: u64,
    pub height: u64,
}

/// Runs `op` against `db`, reverting to a pre-call snapshot on any
/// error so the caller observes bitwise-identical state on failure
/// (spec invariant "Snapshot/revert atomicity").
pub fn execute_operation(db: &mut dyn AccountDB, op: &MinerOperationMessage) -> Result<(), MinerError> {
    let snapshot = db.snapshot();
    match apply_operation(db, op) {
        Ok(()) => Ok(()),
        Err(e) => {
            db.revert_to_snapshot(snapshot);
            Err(e)
        }
    }
}

fn apply_operation(db: &mut dyn AccountDB, op: &MinerOperationMessage) -> Result<(), MinerError> {
    match op.kind {
        MinerOperationKind::StakeAdd => stake_add(db, op),
        MinerOperationKind::StakeReduce => stake_reduce(db, op),
        MinerOperationKind::StakeRefund => stake_refund(db, op),
        MinerOperationKind::MinerAbort => miner_abort(db, op),
    }
}

fn stake_add(db: &mut dyn AccountDB, op: &MinerOperationMessage) -> Result<(), MinerError> {
    db.sub_balance(&op.source, BigInt::from(op.value)).map_err(|_| MinerError::BalanceNotEnough)?;

    let mut miner = store::get_miner(db, &op.target, op.mtype).unwrap_or(Miner {
        id: op.target,
        miner_type: op.mtype,
        stake: 0,
        status: MinerStatus::Prepare,
        apply_height: op.height,
        abort_height: 0,
        public_key: Vec::new(),
        vrf_public_key: Vec::new(),
    });

    if miner.status == MinerStatus::Abort {
        return Err(MinerError::AlreadyExists);
    }

    miner.stake = miner.stake.checked_add(op.value).ok_or(MinerError::StakeUnderflow)?;
    if miner.stake >= minimum_stake() {
        miner.status = MinerStatus::Normal;
    }
    store::put_miner(db, &miner);

    let mut detail = store::get_detail(db, &op.target, &op.source, op.mtype, StakeStatus::Staked).unwrap_or(StakeDetail {
        source: op.source,
        target: op.target,
        mtype: op.mtype,
        status: StakeStatus::Staked,
        value: 0,
        update_height: op.height,
    });
    detail.value = detail.value.checked_add(op.value).ok_or(MinerError::StakeUnderflow)?;
    detail.update_height = op.height;
    store::put_detail(db, &detail);
    Ok(())
}

fn stake_reduce(db: &mut dyn AccountDB, op: &MinerOperationMessage) -> Result<(), MinerError> {
    let mut miner = store::get_miner(db, &op.target, op.mtype).ok_or(MinerError::MinerNotFound(op.target, op.mtype))?;
    let mut detail = store::get_detail(db, &op.target, &op.source, op.mtype, StakeStatus::Staked)
        .ok_or(MinerError::MinerNotFound(op.target, op.mtype))?;

    detail.value = detail.value.checked_sub(op.value).ok_or(MinerError::StakeUnderflow)?;
    miner.stake = miner.stake.checked_sub(op.value).ok_or(MinerError::StakeUnderflow)?;
    detail.update_height = op.height;
    detail.status = StakeStatus::StakeFrozen;

    if miner.stake < minimum_stake() && miner.status == MinerStatus::Normal {
        miner.status = MinerStatus::Frozen;
    }

    store::put_detail(db, &detail);
    store::put_miner(db, &miner);
    Ok(())
}

fn stake_refund(db: &mut dyn AccountDB, op: &MinerOperationMessage) -> Result<(), MinerError> {
    let detail = store::get_detail(db, &op.target, &op.source, op.mtype, StakeStatus::StakeFrozen)
        .ok_or(MinerError::MinerNotFound(op.target, op.mtype))?;

    let miner = store::get_miner(db, &op.target, op.mtype).ok_or(MinerError::MinerNotFound(op.target, op.mtype))?;
    if miner.status == MinerStatus::Abort {
        if op.height < miner.abort_height + REFUND_ABORT_DELAY {
            return Err(MinerError::RefundTooEarly(miner.abort_height, op.height));
        }
    }

    db.add_balance(&op.source, BigInt::from(detail.value));
    let mut cleared = detail;
    cleared.value = 0;
    cleared.update_height = op.height;
    store::put_detail(db, &cleared);
    Ok(())
}

fn miner_abort(db: &mut dyn AccountDB, op: &MinerOperationMessage) -> Result<(), MinerError> {
    let mut miner = store::get_miner(db, &op.target, op.mtype).ok_or(MinerError::MinerNotFound(op.target, op.mtype))?;
    if op.source != op.target {
        return Err(MinerError::MalformedPayload("abort source must equal target"));
    }
    miner.status = MinerStatus::Abort;
    miner.abort_height = op.height;
    store::put_miner(db, &miner);

    if let Some(mut detail) = store::get_detail(db, &op.target, &op.source, op.mtype, StakeStatus::Staked) {
        if detail.value > 0 {
            detail.status = StakeStatus::StakeFrozen;
            detail.update_height = op.height;
            store::put_detail(db, &detail);
        }
    }
    Ok(())
}

/// `MinerFrozen`: direct status transition with no stake movement, used
/// by the consensus layer to mark a non-responsive verifier.
pub fn miner_freeze(db: &mut dyn AccountDB, target: &Address, mtype: MinerType) -> Result<(), MinerError> {
    let mut miner = store::get_miner(db, target, mtype).ok_or(MinerError::MinerNotFound(*target, mtype))?;
    miner.status = MinerStatus::Frozen;
    store::put_miner(db, &miner);
    Ok(())
}

/// `MinerPenalty`: slashes `minimumStake()` from each penalty target and
/// distributes it evenly across the reward targets, per
/// `core/miner_manager.go`'s `MinerPenalty`.
pub fn miner_penalty(db: &mut dyn AccountDB, penalty_targets: &[Address], reward_targets: &[Address], mtype: MinerType) -> Result<(), MinerError> {
    if reward_targets.is_empty() {
        return Err(MinerError::MalformedPayload("penalty requires at least one reward target"));
    }
    let slash = minimum_stake();
    let mut pool: u64 = 0;

    for target in penalty_targets {
        let mut miner = store::get_miner(db, target, mtype).ok_or(MinerError::MinerNotFound(*target, mtype))?;
        let slashed = slash.min(miner.stake);
        miner.stake -= slashed;
        miner.status = MinerStatus::Frozen;
        store::put_miner(db, &miner);
        pool += slashed;
    }

    let share = pool / reward_targets.len() as u64;
    for target in reward_targets {
        db.add_balance(target, BigInt::from(share));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_04_state_management::InMemoryAccountDb;

    fn addr(b: u8) -> Address {
        Address([b; 32])
    }

    fn fund(db: &mut dyn AccountDB, who: &Address, amount: u64) {
        db.add_balance(who, BigInt::from(amount));
    }

    #[test]
    fn stake_add_activates_miner_once_minimum_reached() {
        let mut db = InMemoryAccountDb::new();
        fund(&mut db, &addr(1), 1_000_000);
        let op = MinerOperationMessage {
            kind: MinerOperationKind::StakeAdd,
            source: addr(1),
            target: addr(1),
            mtype: MinerType::Proposal,
            value: 500_000,
            height: 1,
        };
        execute_operation(&mut db, &op).unwrap();
        let miner = store::get_miner(&db, &addr(1), MinerType::Proposal).unwrap();
        assert_eq!(miner.status, MinerStatus::Normal);
        assert_eq!(miner.stake, 500_000);
    }

    #[test]
    fn stake_add_insufficient_balance_reverts_cleanly() {
        let mut db = InMemoryAccountDb::new();
        fund(&mut db, &addr(1), 100);
        let op = MinerOperationMessage {
            kind: MinerOperationKind::StakeAdd,
            source: addr(1),
            target: addr(1),
            mtype: MinerType::Proposal,
            value: 500_000,
            height: 1,
        };
        assert!(execute_operation(&mut db, &op).is_err());
        assert_eq!(db.get_balance(&addr(1)), BigInt::from(100u64));
        assert!(store::get_miner(&db, &addr(1), MinerType::Proposal).is_none());
    }

    #[test]
    fn stake_reduce_below_minimum_freezes_miner() {
        let mut db = InMemoryAccountDb::new();
        fund(&mut db, &addr(1), 1_000_000);
        execute_operation(
            &mut db,
            &MinerOperationMessage {
                kind: MinerOperationKind::StakeAdd,
                source: addr(1),
                target: addr(1),
                mtype: MinerType::Proposal,
                value: 500_000,
                height: 1,
            },
        )
        .unwrap();

        execute_operation(
            &mut db,
            &MinerOperationMessage {
                kind: MinerOperationKind::StakeReduce,
                source: addr(1),
                target: addr(1),
                mtype: MinerType::Proposal,
                value: 200_000,
                height: 2,
            },
        )
        .unwrap();

        let miner = store::get_miner(&db, &addr(1), MinerType::Proposal).unwrap();
        assert_eq!(miner.status, MinerStatus::Frozen);
        assert_eq!(miner.stake, 300_000);
    }

    #[test]
    fn refund_before_abort_delay_is_rejected() {
        let mut db = InMemoryAccountDb::new();
        fund(&mut db, &addr(1), 1_000_000);
        execute_operation(
            &mut db,
            &MinerOperationMessage {
                kind: MinerOperationKind::StakeAdd,
                source: addr(1),
                target: addr(1),
                mtype: MinerType::Proposal,
                value: 500_000,
                height: 1,
            },
        )
        .unwrap();
        execute_operation(
            &mut db,
            &MinerOperationMessage {
                kind: MinerOperationKind::MinerAbort,
                source: addr(1),
                target: addr(1),
                mtype: MinerType::Proposal,
                value: 0,
                height: 5,
            },
        )
        .unwrap();

        let err = execute_operation(
            &mut db,
            &MinerOperationMessage {
                kind: MinerOperationKind::StakeRefund,
                source: addr(1),
                target: addr(1),
                mtype: MinerType::Proposal,
                value: 0,
                height: 6,
            },
        )
        .unwrap_err();
        assert_eq!(err, MinerError::RefundTooEarly(5, 6));
    }

    #[test]
    fn penalty_slashes_and_redistributes_evenly() {
        let mut db = InMemoryAccountDb::new();
        fund(&mut db, &addr(1), 1_000_000);
        execute_operation(
            &mut db,
            &MinerOperationMessage {
                kind: MinerOperationKind::StakeAdd,
                source: addr(1),
                target: addr(1),
                mtype: MinerType::Verify,
                value: 600_000,
                height: 1,
            },
        )
        .unwrap();

        miner_penalty(&mut db, &[addr(1)], &[addr(2), addr(3)], MinerType::Verify).unwrap();
        let miner = store::get_miner(&db, &addr(1), MinerType::Verify).unwrap();
        assert_eq!(miner.stake, 100_000);
        assert_eq!(miner.status, MinerStatus::Frozen);
        assert_eq!(db.get_balance(&addr(2)), BigInt::from(250_000u64));
        assert_eq!(db.get_balance(&addr(3)), BigInt::from(250_000u64));
    }
}
