//! # Verifiable Random Function (proposer rotation)
//!
//! Every miner derives a per-slot pseudo-random value from their own secret
//! key and the slot's seed (`preHash || height`), and attaches a proof
//! anyone can check against the miner's public key. Whichever verify-group
//! member's VRF output ranks lowest wins proposer duty for that slot,
//! without anyone having to reveal the output before proving they were
//! entitled to compute it.
//!
//! This is an ECDSA-based VRF (not the IETF `draft-irtf-cfrg-vrf` EC-VRF):
//! the proof is a deterministic recoverable ECDSA signature over the seed,
//! and the output is `blake3(proof)`. It satisfies the properties the
//! proposer rotation needs — deterministic, publicly verifiable,
//! unpredictable without the secret key — while reusing the same
//! secp256k1 stack as transaction signing instead of pulling in a second
//! curve.

use crate::ecdsa::{RecoverableSignature, Secp256k1KeyPair};
use crate::errors::CryptoError;
use crate::hashing::{blake3_hash, Hash};

/// A VRF proof: the deterministic signature over the seed, and the
/// resulting pseudo-random output derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VrfProof {
    pub output: Hash,
    pub proof: RecoverableSignature,
}

impl VrfProof {
    /// Encode as `output (32) || proof (65)`, the form carried in
    /// `BlockHeader.prove_value`.
    pub fn to_bytes(&self) -> [u8; 97] {
        let mut buf = [0u8; 97];
        buf[..32].copy_from_slice(&self.output);
        buf[32..].copy_from_slice(&self.proof.0);
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 97 {
            return Err(CryptoError::InvalidInput("VRF proof must be 97 bytes".into()));
        }
        let mut output = [0u8; 32];
        output.copy_from_slice(&bytes[..32]);
        let proof = RecoverableSignature::from_bytes(&bytes[32..])?;
        Ok(Self { output, proof })
    }
}

/// Compute the seed a miner's VRF evaluation runs over for a given slot.
/// `preHash` ties the seed to a specific chain fork; `height` prevents the
/// same seed from repeating across heights that happen to share a preHash
/// during a reorg.
pub fn slot_seed(pre_hash: &Hash, height: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(40);
    buf.extend_from_slice(pre_hash);
    buf.extend_from_slice(&height.to_be_bytes());
    buf
}

/// Evaluate the VRF for `keypair` over `seed`.
pub fn evaluate(keypair: &Secp256k1KeyPair, seed: &[u8]) -> VrfProof {
    let proof = keypair.sign(seed);
    let output = blake3_hash(&proof.0);
    VrfProof { output, proof }
}

/// Verify that `proof` is a valid VRF evaluation of `seed` by the holder of
/// `address`, and that its output matches `proof.output`.
pub fn verify(
    seed: &[u8],
    proof: &VrfProof,
    address: &[u8; 32],
) -> Result<(), CryptoError> {
    let expected_output = blake3_hash(&proof.proof.0);
    if expected_output != proof.output {
        return Err(CryptoError::InvalidSignature);
    }
    if !crate::ecdsa::verify_signed_by(seed, &proof.proof, address) {
        return Err(CryptoError::SignatureVerificationFailed);
    }
    Ok(())
}

/// Interpret a VRF output as a `u64` ranking key, for the lowest-output-wins
/// proposer selection rule. Only the first 8 bytes are used; the remaining
/// entropy is redundant once the output space exceeds the verify-group
/// size by any meaningful margin.
pub fn output_rank(output: &Hash) -> u64 {
    u64::from_be_bytes(output[..8].try_into().expect("hash is 32 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_then_verify_succeeds() {
        let keypair = Secp256k1KeyPair::generate();
        let seed = slot_seed(&[3u8; 32], 42);
        let proof = evaluate(&keypair, &seed);
        assert!(verify(&seed, &proof, &keypair.address()).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_address() {
        let keypair = Secp256k1KeyPair::generate();
        let other = Secp256k1KeyPair::generate();
        let seed = slot_seed(&[1u8; 32], 1);
        let proof = evaluate(&keypair, &seed);
        assert!(verify(&seed, &proof, &other.address()).is_err());
    }

    #[test]
    fn verify_rejects_tampered_output() {
        let keypair = Secp256k1KeyPair::generate();
        let seed = slot_seed(&[9u8; 32], 5);
        let mut proof = evaluate(&keypair, &seed);
        proof.output[0] ^= 0xFF;
        assert!(verify(&seed, &proof, &keypair.address()).is_err());
    }

    #[test]
    fn same_key_and_seed_is_deterministic() {
        let keypair = Secp256k1KeyPair::from_bytes([0x42u8; 32]).unwrap();
        let seed = slot_seed(&[5u8; 32], 7);
        let a = evaluate(&keypair, &seed);
        let b = evaluate(&keypair, &seed);
        assert_eq!(a.output, b.output);
    }

    #[test]
    fn proof_bytes_roundtrip() {
        let keypair = Secp256k1KeyPair::generate();
        let seed = slot_seed(&[2u8; 32], 9);
        let proof = evaluate(&keypair, &seed);
        let encoded = proof.to_bytes();
        let decoded = VrfProof::from_bytes(&encoded).unwrap();
        assert_eq!(proof, decoded);
    }

    #[test]
    fn different_miners_rank_differently() {
        let a = Secp256k1KeyPair::from_bytes([0x11u8; 32]).unwrap();
        let b = Secp256k1KeyPair::from_bytes([0x22u8; 32]).unwrap();
        let seed = slot_seed(&[7u8; 32], 100);
        let proof_a = evaluate(&a, &seed);
        let proof_b = evaluate(&b, &seed);
        assert_ne!(output_rank(&proof_a.output), output_rank(&proof_b.output));
    }
}
