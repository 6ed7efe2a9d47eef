//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("invalid signature format")]
    InvalidSignatureFormat,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("could not recover signer from signature")]
    RecoveryFailed,

    #[error("empty aggregation input")]
    EmptyAggregation,

    #[error("BLS pairing check failed")]
    BlsPairingFailed,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
