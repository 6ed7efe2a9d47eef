//! State management error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("balance not enough")]
    BalanceNotEnough,

    #[error("snapshot id {0} does not exist or was already reverted past")]
    InvalidSnapshot(usize),
}
