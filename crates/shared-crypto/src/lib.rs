//! # Shared Crypto Crate
//!
//! Cryptographic primitives shared across the consensus core: BLAKE3
//! content hashing, secp256k1 transaction signing with address recovery,
//! an ECDSA-based VRF for proposer rotation, and BLST threshold signatures
//! for the Cast/Verify aggregator.

pub mod bls;
pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod vrf;

pub use bls::{
    aggregate_public_keys, aggregate_signatures, verify_aggregate, BlsPublicKey, BlsSecretKey,
    BlsSignature,
};
pub use ecdsa::{recover_address, verify_signed_by, RecoverableSignature, Secp256k1KeyPair};
pub use errors::CryptoError;
pub use hashing::{blake3_hash, merkle_fold, Blake3Hasher, Hash};
pub use vrf::{evaluate as vrf_evaluate, output_rank, slot_seed, verify as vrf_verify, VrfProof};
