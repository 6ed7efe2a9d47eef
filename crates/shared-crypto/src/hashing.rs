//! # BLAKE3 Hashing
//!
//! The canonical content digest used throughout the consensus core for
//! transaction hashes, block header hashes, and the VRF/aggregator message
//! domain.

/// BLAKE3 hash output (256-bit).
pub type Hash = [u8; 32];

/// Stateful BLAKE3 hasher, for incrementally hashing a transaction list into
/// a Merkle-free "tx tree" digest.
pub struct Blake3Hasher {
    inner: blake3::Hasher,
}

impl Blake3Hasher {
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    pub fn finalize(&self) -> Hash {
        *self.inner.finalize().as_bytes()
    }
}

impl Default for Blake3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with BLAKE3 (one-shot).
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash a list of already-hashed leaves into a single root by folding them
/// through BLAKE3. Used for `txTree` / `receiptTree`.
pub fn merkle_fold(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return [0u8; 32];
    }
    let mut hasher = Blake3Hasher::new();
    for leaf in leaves {
        hasher.update(leaf);
    }
    hasher.finalize()
}
