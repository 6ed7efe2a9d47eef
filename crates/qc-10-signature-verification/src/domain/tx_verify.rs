//! Transaction signature verification: recovers `RawTransaction.source`
//! from `RawTransaction.sign` and the transaction's canonical hash.

use crate::domain::errors::SignatureError;
use shared_crypto::RecoverableSignature;
use shared_types::{Address, RawTransaction};

/// Recover and fill in `source` on a transaction whose `sign` field is a
/// 65-byte recoverable ECDSA signature over its canonical hash.
///
/// Consensus messages (`SignedInfo.sign`) use the same recovery scheme over
/// the message's own digest; see `verify_signed_info`.
pub fn recover_transaction_source(tx: &RawTransaction) -> Result<Address, SignatureError> {
    let sig = RecoverableSignature::from_bytes(&tx.sign).map_err(|_| SignatureError::InvalidFormat)?;
    let hash = tx.hash();
    let addr = shared_crypto::recover_address(&hash, &sig).map_err(|_| SignatureError::RecoveryFailed)?;
    Ok(Address(addr))
}

/// Verify that `sign` over `message` was produced by `expected`.
pub fn verify_signed_by(message: &[u8], sign: &[u8], expected: &Address) -> bool {
    match RecoverableSignature::from_bytes(sign) {
        Ok(sig) => shared_crypto::verify_signed_by(message, &sig, &expected.0),
        Err(_) => false,
    }
}
