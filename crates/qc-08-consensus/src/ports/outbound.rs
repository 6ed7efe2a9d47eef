//! # Outbound Ports (Driven Ports / SPI)
//!
//! `ConsensusCore` never holds a raw BLS secret key itself — it asks this
//! narrow view for the three facts it needs about this node's own signing
//! identity: its group-member index, its address, and a signature over an
//! arbitrary message (a block hash for the verify share, a `preHash` for
//! the random-beacon share).

use shared_crypto::BlsSignature;
use shared_types::{Address, MemberId};

pub trait LocalSigner: Send + Sync {
    /// This node's index within whichever verify group it currently belongs
    /// to. Consensus resolves the real index per-group via
    /// `VerifyGroup::member_index`; this is only used where no group
    /// context is available yet (adapters/observability).
    fn member_id(&self) -> MemberId;

    fn address(&self) -> Address;

    /// Sign `msg` with this node's BLS secret key.
    fn sign(&self, msg: &[u8]) -> BlsSignature;
}

/// A `LocalSigner` backed by an in-process BLS keypair. The reference
/// adapter for single-process test harnesses and the node-runtime
/// composition root; a production deployment would back this with a
/// key-management service instead.
pub struct InMemoryLocalSigner {
    member_id: MemberId,
    address: Address,
    secret_key: shared_crypto::BlsSecretKey,
}

impl InMemoryLocalSigner {
    pub fn new(member_id: MemberId, address: Address, secret_key: shared_crypto::BlsSecretKey) -> Self {
        Self { member_id, address, secret_key }
    }
}

impl LocalSigner for InMemoryLocalSigner {
    fn member_id(&self) -> MemberId {
        self.member_id
    }

    fn address(&self) -> Address {
        self.address
    }

    fn sign(&self, msg: &[u8]) -> BlsSignature {
        self.secret_key.sign(msg)
    }
}
