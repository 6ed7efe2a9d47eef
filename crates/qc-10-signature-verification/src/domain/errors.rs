//! Signature verification / aggregation error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("invalid signature format")]
    InvalidFormat,

    #[error("signature recovery failed")]
    RecoveryFailed,

    #[error("verification failed")]
    VerificationFailed,

    #[error(transparent)]
    Crypto(#[from] shared_crypto::CryptoError),
}
