//! # Shared Error Kinds
//!
//! Error kinds from spec §7 that are meaningful across crate boundaries
//! (the executor raises them into receipts, the driver returns them to the
//! network dispatcher). Crate-local errors that never cross a boundary
//! (e.g. mempool admission errors) live in their own crates.

use thiserror::Error;

/// Error kinds from spec §7 "Error Handling Design".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("balance not enough")]
    BalanceNotEnough,

    #[error("deploy gas not enough")]
    DeployGasNotEnough,

    #[error("contract address conflict")]
    ContractAddressConflict,

    #[error("no code at target address")]
    NoCode,

    #[error("tvm executed error: {0}")]
    TvmExecutedError(String),

    #[error("tvm gas not enough")]
    TvmGasNotEnough,

    #[error("check abi error")]
    CheckAbiError,

    #[error("call max deep exceeded")]
    CallMaxDeep,

    #[error("timing rejected: {0}")]
    TimingRejected(String),

    #[error("duplicate proposal")]
    DuplicateProposal,

    #[error("don't belong to verifyGroup")]
    NotInVerifyGroup,

    #[error("sender not in verifyGroup")]
    SenderNotInVerifyGroup,

    #[error("block signed")]
    AlreadySigned,

    #[error("parent block did not received")]
    ParentMissing,

    #[error("ignore self message")]
    SelfMessage,

    #[error("msg genHash diff from bh.Hash")]
    HashMismatch,
}
