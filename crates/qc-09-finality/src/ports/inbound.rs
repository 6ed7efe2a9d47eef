//! # Inbound Ports (Driving Ports / API)
//!
//! The call node-runtime makes when the consensus subsystem (qc-08) hands
//! back a threshold-recovered block: stamp it, execute it, append it.

use crate::domain::entities::FinalizationOutcome;
use crate::domain::errors::FinalityError;
use qc_04_state_management::AccountDB;
use qc_08_consensus::RecoveredBlock;

pub trait FinalityApi: Send + Sync {
    /// Finalize a threshold-recovered block: complete its header,
    /// replay its transactions plus the synthesized reward transaction,
    /// append it to the chain, and drop its transactions from the mempool.
    fn apply_recovered(&self, db: &mut dyn AccountDB, recovered: RecoveredBlock) -> Result<FinalizationOutcome, FinalityError>;
}
