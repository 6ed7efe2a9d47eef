use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinalityError {
    #[error("recovered block is not canonical: expected parent {expected_parent:?} at height {expected_height}, got parent {actual_parent:?} at height {actual_height}")]
    NotCanonical { expected_parent: shared_types::Hash, expected_height: u64, actual_parent: shared_types::Hash, actual_height: u64 },

    #[error("recovered block names no verifiers")]
    NoVerifiers,
}
