//! VM dispatch errors (spec §7 error kinds).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("deploy gas not enough")]
    DeployGasNotEnough,

    #[error("contract address conflict")]
    ContractAddressConflict,

    #[error("no code at target")]
    NoCode,

    #[error("tvm executed error: {0}")]
    TvmExecutedError(String),

    #[error("tvm gas not enough")]
    TvmGasNotEnough,

    #[error("check abi error")]
    CheckAbiError,

    #[error("call max deep")]
    CallMaxDeep,
}
