//! # BLS Threshold Signatures (BLST, min-sig variant)
//!
//! Group elements are chosen for small signatures since the aggregator
//! broadcasts one signature share per verify-group member: signatures live
//! in G1 (48 bytes), public keys in G2 (96 bytes).
//!
//! The domain separation tag pins these signatures to block-casting so a
//! share cannot be replayed as, say, a VRF proof signed with the same key
//! material.

use crate::errors::CryptoError;
use blst::min_sig::{
    AggregatePublicKey, AggregateSignature, PublicKey, SecretKey, Signature,
};
use blst::BLST_ERROR;

const DST: &[u8] = b"QUANTUM_CHAIN_BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_POP_";

/// A BLS secret key share held by one verify-group member.
pub struct BlsSecretKey(SecretKey);

impl BlsSecretKey {
    pub fn from_seed(seed: &[u8]) -> Result<Self, CryptoError> {
        if seed.len() < 32 {
            return Err(CryptoError::InvalidInput(
                "BLS key material requires at least 32 bytes of seed".into(),
            ));
        }
        SecretKey::key_gen(seed, &[])
            .map(BlsSecretKey)
            .map_err(|_| CryptoError::InvalidPrivateKey)
    }

    pub fn public_key(&self) -> BlsPublicKey {
        BlsPublicKey(self.0.sk_to_pk())
    }

    /// Sign `message`, producing this member's signature share.
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature(self.0.sign(message, DST, &[]))
    }
}

/// A BLS public key (G2, 96 bytes compressed).
#[derive(Clone)]
pub struct BlsPublicKey(PublicKey);

impl BlsPublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        PublicKey::from_bytes(bytes)
            .map(BlsPublicKey)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    pub fn to_bytes(&self) -> [u8; 96] {
        self.0.compress()
    }

    /// Verify a single signature share against this member's public key.
    pub fn verify(&self, message: &[u8], sig: &BlsSignature) -> bool {
        sig.0.verify(true, message, DST, &[], &self.0, true) == BLST_ERROR::BLST_SUCCESS
    }
}

/// A BLS signature (G1, 48 bytes compressed) — one member's share, or an
/// aggregate once enough shares have been combined.
#[derive(Clone)]
pub struct BlsSignature(Signature);

impl BlsSignature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Signature::from_bytes(bytes)
            .map(BlsSignature)
            .map_err(|_| CryptoError::InvalidSignatureFormat)
    }

    pub fn to_bytes(&self) -> [u8; 48] {
        self.0.compress()
    }
}

/// Aggregate two or more signature shares into one threshold signature.
///
/// Mirrors the aggregator's `add` contract: every call is a pure fold, so
/// callers can memoize the running aggregate and extend it incrementally
/// instead of re-aggregating from scratch on every new share.
pub fn aggregate_signatures(shares: &[BlsSignature]) -> Result<BlsSignature, CryptoError> {
    if shares.is_empty() {
        return Err(CryptoError::EmptyAggregation);
    }
    let refs: Vec<&Signature> = shares.iter().map(|s| &s.0).collect();
    let agg = AggregateSignature::aggregate(&refs, true)
        .map_err(|_| CryptoError::BlsPairingFailed)?;
    Ok(BlsSignature(agg.to_signature()))
}

/// Aggregate the public keys of the contributing members, so the final
/// `verify` call checks one pairing against one combined key rather than
/// one pairing per share.
pub fn aggregate_public_keys(keys: &[BlsPublicKey]) -> Result<BlsPublicKey, CryptoError> {
    if keys.is_empty() {
        return Err(CryptoError::EmptyAggregation);
    }
    let refs: Vec<&PublicKey> = keys.iter().map(|k| &k.0).collect();
    let agg = AggregatePublicKey::aggregate(&refs, true)
        .map_err(|_| CryptoError::BlsPairingFailed)?;
    Ok(BlsPublicKey(agg.to_public_key()))
}

/// Verify an aggregated signature against the corresponding aggregated
/// public key over a single shared message (every member signs the same
/// block hash, so this is the fast-path verify, not the multi-message one).
pub fn verify_aggregate(
    message: &[u8],
    aggregate_sig: &BlsSignature,
    aggregate_key: &BlsPublicKey,
) -> bool {
    aggregate_key.verify(message, aggregate_sig)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_key(byte: u8) -> BlsSecretKey {
        BlsSecretKey::from_seed(&[byte; 32]).unwrap()
    }

    #[test]
    fn sign_and_verify_single_share() {
        let sk = seeded_key(7);
        let pk = sk.public_key();
        let sig = sk.sign(b"block-hash");
        assert!(pk.verify(b"block-hash", &sig));
        assert!(!pk.verify(b"other-hash", &sig));
    }

    #[test]
    fn aggregate_threshold_signature_verifies() {
        let members: Vec<BlsSecretKey> = (1u8..=4).map(seeded_key).collect();
        let message = b"cast-message-digest";
        let sigs: Vec<BlsSignature> = members.iter().map(|m| m.sign(message)).collect();
        let pks: Vec<BlsPublicKey> = members.iter().map(|m| m.public_key()).collect();

        let agg_sig = aggregate_signatures(&sigs).unwrap();
        let agg_pk = aggregate_public_keys(&pks).unwrap();
        assert!(verify_aggregate(message, &agg_sig, &agg_pk));
    }

    #[test]
    fn aggregate_rejects_wrong_message() {
        let members: Vec<BlsSecretKey> = (1u8..=3).map(seeded_key).collect();
        let sigs: Vec<BlsSignature> = members.iter().map(|m| m.sign(b"correct")).collect();
        let pks: Vec<BlsPublicKey> = members.iter().map(|m| m.public_key()).collect();

        let agg_sig = aggregate_signatures(&sigs).unwrap();
        let agg_pk = aggregate_public_keys(&pks).unwrap();
        assert!(!verify_aggregate(b"wrong", &agg_sig, &agg_pk));
    }

    #[test]
    fn empty_aggregation_is_rejected() {
        assert!(matches!(
            aggregate_signatures(&[]),
            Err(CryptoError::EmptyAggregation)
        ));
    }
}
