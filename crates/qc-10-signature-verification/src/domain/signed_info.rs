//! Verification of `SignedInfo` — the `{signer, dataHash, sign}` envelope
//! attached to both Cast and Verify consensus messages. `sign` is the
//! signer's BLS signature share over `dataHash`; `signer` names the member
//! directly so there is nothing to recover, only to check.

use crate::domain::errors::SignatureError;
use shared_crypto::{BlsPublicKey, BlsSignature};
use shared_types::{Hash, SignedInfo};

/// Verify that `si.sign` is a valid BLS signature by `signer_pk` over
/// `si.data_hash`, and that `si.data_hash` matches the independently
/// recomputed `expected_hash` of whatever was signed (a block header hash
/// or a block hash, depending on message kind).
pub fn verify_signed_info(
    si: &SignedInfo,
    expected_hash: &Hash,
    signer_pk: &BlsPublicKey,
) -> Result<BlsSignature, SignatureError> {
    if &si.data_hash != expected_hash {
        return Err(SignatureError::VerificationFailed);
    }
    let sig = BlsSignature::from_bytes(&si.sign).map_err(SignatureError::Crypto)?;
    if !signer_pk.verify(&si.data_hash, &sig) {
        return Err(SignatureError::VerificationFailed);
    }
    Ok(sig)
}
