//! # Shared Types Crate
//!
//! Core domain entities and wire message types for the consensus core:
//! transactions, blocks, miners/stake, verify groups, and the Cast/Verify
//! wire messages. Every other crate in the workspace depends on this one.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;

/// Canonical digest used for transaction hashes and block header hashes.
/// Backed by `shared_crypto`'s BLAKE3 implementation so every crate agrees
/// on the same 32-byte content digest (spec §8 "hash consistency").
pub fn hash_bytes(data: &[u8]) -> [u8; 32] {
    shared_crypto::blake3_hash(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_bytes_is_deterministic() {
        let a = hash_bytes(b"hello world");
        let b = hash_bytes(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn hash_bytes_differs_on_input() {
        assert_ne!(hash_bytes(b"a"), hash_bytes(b"b"));
    }
}
