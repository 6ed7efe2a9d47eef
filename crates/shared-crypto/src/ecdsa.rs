//! # ECDSA Signatures (secp256k1) with Public-Key Recovery
//!
//! Used for transaction signing (`RawTransaction.sign` / `.source`) and for
//! the Cast/Verify `SignedInfo.sign` field. Recovery lets the chain derive
//! the sender's address from the signature alone, so the wire format never
//! needs to carry a redundant public key.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Recoverable signatures (65 bytes: r || s || recovery id)

use crate::errors::CryptoError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::ecdsa::signature::{hazmat::PrehashSigner, Signer};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// A recoverable secp256k1 signature: `r || s || v` (65 bytes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoverableSignature(pub [u8; 65]);

impl RecoverableSignature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 65 {
            return Err(CryptoError::InvalidSignatureFormat);
        }
        let mut buf = [0u8; 65];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }
}

/// secp256k1 keypair used to sign transactions and consensus messages.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// secp256k1 public key, compressed SEC1 (33 bytes).
    pub fn public_key_bytes(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out.copy_from_slice(&self.signing_key.verifying_key().to_sec1_bytes());
        out
    }

    /// Address = last 32 bytes of `sha256(uncompressed pubkey)`, left-padded
    /// to the chain's 32-byte `Address` width.
    pub fn address(&self) -> [u8; 32] {
        public_key_to_address(&self.signing_key.verifying_key().to_sec1_bytes())
    }

    /// Sign a message hash, producing a recoverable signature over `message`.
    pub fn sign(&self, message: &[u8]) -> RecoverableSignature {
        let digest = Sha256::digest(message);
        let (sig, recid): (Signature, RecoveryId) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_slice())
            .expect("signing over a 32-byte prehash cannot fail");
        let mut buf = [0u8; 65];
        buf[..64].copy_from_slice(&sig.to_bytes());
        buf[64] = recid.to_byte();
        RecoverableSignature(buf)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }
}

impl Drop for Secp256k1KeyPair {
    fn drop(&mut self) {
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}

/// Recover the signer's address from a message and its recoverable signature.
/// This is how `RawTransaction.source` and `SignedInfo.signer` are derived
/// in the reference implementation: the signature carries identity, there is
/// no separate public-key field on the wire.
pub fn recover_address(message: &[u8], sig: &RecoverableSignature) -> Result<[u8; 32], CryptoError> {
    let digest = Sha256::digest(message);
    let signature =
        Signature::from_slice(&sig.0[..64]).map_err(|_| CryptoError::InvalidSignatureFormat)?;
    let recid = RecoveryId::from_byte(sig.0[64]).ok_or(CryptoError::InvalidSignatureFormat)?;
    let verifying_key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recid)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(public_key_to_address(&verifying_key.to_sec1_bytes()))
}

/// Verify a recoverable signature was produced by `expected_address`.
pub fn verify_signed_by(
    message: &[u8],
    sig: &RecoverableSignature,
    expected_address: &[u8; 32],
) -> bool {
    matches!(recover_address(message, sig), Ok(addr) if addr == *expected_address)
}

fn public_key_to_address(sec1_pubkey: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(sec1_pubkey);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_recover_roundtrip() {
        let keypair = Secp256k1KeyPair::generate();
        let message = b"cast this block";
        let sig = keypair.sign(message);
        let recovered = recover_address(message, &sig).unwrap();
        assert_eq!(recovered, keypair.address());
    }

    #[test]
    fn recovery_fails_for_wrong_message() {
        let keypair = Secp256k1KeyPair::generate();
        let sig = keypair.sign(b"message one");
        let recovered = recover_address(b"message two", &sig).unwrap();
        assert_ne!(recovered, keypair.address());
    }

    #[test]
    fn verify_signed_by_checks_address() {
        let keypair = Secp256k1KeyPair::generate();
        let other = Secp256k1KeyPair::generate();
        let sig = keypair.sign(b"hello");
        assert!(verify_signed_by(b"hello", &sig, &keypair.address()));
        assert!(!verify_signed_by(b"hello", &sig, &other.address()));
    }

    #[test]
    fn deterministic_signatures() {
        let keypair = Secp256k1KeyPair::from_bytes([0xABu8; 32]).unwrap();
        let sig1 = keypair.sign(b"deterministic");
        let sig2 = keypair.sign(b"deterministic");
        assert_eq!(sig1, sig2);
    }
}
