//! Consensus errors. Reuses `shared_types::CoreError`'s spec §7 literal
//! strings where a variant already exists there (`HashMismatch`,
//! `SelfMessage`, `ParentMissing`, `DuplicateProposal`, `AlreadySigned`,
//! `NotInVerifyGroup`, `SenderNotInVerifyGroup`); the remaining Cast/Verify
//! rejections (§4.E) that have no cross-crate meaning get their own
//! variants here.

use qc_10_signature_verification::SignatureError;
use shared_types::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("elapsed error {0}")]
    ElapsedError(i32),

    #[error("block too early")]
    BlockTooEarly,

    #[error("block onchain already")]
    BlockOnChainAlready,

    #[error("miner can't cast at height")]
    MinerCantCast,

    #[error("have signed a higher qn block")]
    HigherQnSigned,

    #[error("verify context is nil, cache msg")]
    ContextCached,

    #[error("block already on chain")]
    BlockAlreadyOnChain,

    #[error("slot is nil")]
    SlotNil,

    #[error("unknown verify group")]
    UnknownGroup,

    #[error("signature verification failed")]
    SignatureInvalid,

    #[error(transparent)]
    Signature(#[from] SignatureError),
}
