//! # Inbound Ports (Driving Ports / API)
//!
//! The public API the node-runtime ticker and the (external, out-of-scope)
//! network message-dispatch task call into.

use crate::domain::entities::DriverOutcome;
use crate::domain::errors::DriverError;
use qc_04_state_management::AccountDB;
use qc_08_consensus::{CastOutcome, ConsensusError, VerifyOutcome};
use shared_types::{ConsensusCastMessage, ConsensusVerifyMessage, Hash, RawTransaction};

pub trait BlockProductionApi: Send + Sync {
    /// Proposer-duty check plus, if eligible, block assembly for `height`
    /// atop `pre_hash` (spec §4.F).
    fn on_tick(&self, db: &mut dyn AccountDB, height: u64, pre_hash: Hash, now_ms: i64) -> Result<DriverOutcome, DriverError>;

    /// Route an incoming Cast message through consensus, replaying any
    /// Verify messages this proposal unblocked.
    fn on_message_cast(
        &self,
        db: &dyn AccountDB,
        msg: &ConsensusCastMessage,
        txs: &[RawTransaction],
    ) -> Result<(CastOutcome, Vec<ConsensusVerifyMessage>), ConsensusError>;

    fn on_message_verify(&self, msg: &ConsensusVerifyMessage) -> Result<VerifyOutcome, ConsensusError>;
}
