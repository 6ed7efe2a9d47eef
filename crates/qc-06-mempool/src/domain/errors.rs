//! Mempool admission error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MempoolError {
    #[error("transaction already present in pool")]
    DuplicateTransaction,

    #[error("transaction has no recovered source")]
    MissingSource,
}
