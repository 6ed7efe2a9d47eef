use qc_08_consensus::ConsensusError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("parent block did not received")]
    ParentMissing,
    #[error(transparent)]
    NotEligible(#[from] ConsensusError),
}
