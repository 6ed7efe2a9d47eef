//! Miner manager operation errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinerError {
    #[error("balance not enough")]
    BalanceNotEnough,

    #[error("miner {0:?}/{1:?} does not exist")]
    MinerNotFound(shared_types::Address, shared_types::MinerType),

    #[error("miner already exists and is not eligible for reactivation")]
    AlreadyExists,

    #[error("stake after reduction would be negative")]
    StakeUnderflow,

    #[error("refund is only permitted after abortHeight + 10, abort height {0}, requested at {1}")]
    RefundTooEarly(u64, u64),

    #[error("miner is not in Abort status")]
    NotAborted,

    #[error("operation payload is malformed: {0}")]
    MalformedPayload(&'static str),
}
