//! Executor-level errors — distinct from per-transaction eviction/failure,
//! which never abort the whole batch (spec §7: "executor errors → receipt
//! + revert + block still commits").

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutorError {
    /// The given transaction list does not belong to `header` (e.g. its
    /// `txTree` digest, recomputed after execution, does not match).
    #[error("transaction tree mismatch: expected {expected:?}, computed {computed:?}")]
    TxTreeMismatch { expected: [u8; 32], computed: [u8; 32] },
}
