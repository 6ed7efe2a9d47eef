//! # Inbound Ports (Driving Ports / API)
//!
//! The public API the transaction executor (qc-12), consensus driver
//! (qc-08/qc-17) and finality/reward step (qc-09) call into.

use crate::domain::errors::MinerError;
use crate::domain::operations::MinerOperationMessage;
use qc_04_state_management::AccountDB;
use shared_types::{Address, Miner, MinerType, StakeDetail};

pub trait MinerManagerApi: Send + Sync {
    /// Validate, apply, and commit-or-revert a stake/abort operation
    /// against `db` (spec §4.C "executeOperation" pipeline).
    fn execute_operation(&self, db: &mut dyn AccountDB, op: &MinerOperationMessage) -> Result<(), MinerError>;

    /// Forces a miner to `Frozen` with no stake movement (consensus-layer
    /// disciplinary action for a non-responsive verifier).
    fn miner_freeze(&self, db: &mut dyn AccountDB, target: &Address, mtype: MinerType) -> Result<(), MinerError>;

    /// Slashes `minimumStake()` from each penalty target, splitting the
    /// proceeds evenly across the reward targets.
    fn miner_penalty(&self, db: &mut dyn AccountDB, penalty_targets: &[Address], reward_targets: &[Address], mtype: MinerType) -> Result<(), MinerError>;

    fn get_miner(&self, db: &dyn AccountDB, addr: &Address, mtype: MinerType) -> Option<Miner>;
    fn get_all_miners(&self, db: &dyn AccountDB, mtype: MinerType) -> Vec<Miner>;
    fn get_proposal_total_stake(&self, db: &dyn AccountDB) -> u64;
    fn get_stake_details(&self, db: &dyn AccountDB, target: &Address, source: &Address) -> Vec<StakeDetail>;
    fn get_all_stake_details(&self, db: &dyn AccountDB, target: &Address) -> Vec<StakeDetail>;

    /// Whether `addr` is currently an active member of the proposer set
    /// (spec §5 "Channels-as-control-plane"), served from the in-memory
    /// mirror rather than a fresh account-DB scan.
    fn is_active_proposer(&self, addr: &Address) -> bool;
}
