//! # Inbound Ports (Driving Ports / API)
//!
//! Called by the block-production driver (qc-17, packing mode) and by
//! finality (qc-09, replaying a threshold-signed block onto the
//! canonical chain).

use crate::domain::entities::BlockExecutionOutcome;
use qc_04_state_management::AccountDB;
use shared_types::{BlockHeader, RawTransaction};

pub trait TransactionExecutorApi: Send + Sync {
    /// Run `txs` against `db` under `header`'s context. `packing` governs
    /// only whether the 3-second wall-clock deadline applies (spec §4.D);
    /// it never changes the result for any transaction actually
    /// considered.
    fn execute(&self, db: &mut dyn AccountDB, header: &BlockHeader, txs: &[RawTransaction], packing: bool) -> BlockExecutionOutcome;
}
