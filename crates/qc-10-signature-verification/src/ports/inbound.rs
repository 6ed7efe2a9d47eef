//! # Inbound Ports (Driving Ports / API)
//!
//! The public API other subsystems (mempool admission, the consensus slot
//! state machine, the block-production driver) call into.

use crate::domain::aggregator::ThresholdAggregator;
use crate::domain::errors::SignatureError;
use shared_crypto::{BlsPublicKey, BlsSignature};
use shared_types::{Address, Hash, RawTransaction, SignedInfo};

/// Primary Signature Verification API.
///
/// Implementations must be thread-safe (`Send + Sync`): verification runs
/// concurrently from the mempool admission path and the consensus slot
/// state machine.
pub trait SignatureVerificationApi: Send + Sync {
    /// Recover and return the sender address for a transaction, from its
    /// `sign` field and canonical hash. Does not mutate `tx.source`.
    fn recover_transaction_source(&self, tx: &RawTransaction) -> Result<Address, SignatureError>;

    /// Verify a `SignedInfo` envelope: checks `data_hash` against
    /// `expected_hash` and the BLS signature share against `signer_pk`.
    /// Returns the parsed signature share on success, ready to feed into
    /// a `ThresholdAggregator`.
    fn verify_signed_info(
        &self,
        si: &SignedInfo,
        expected_hash: &Hash,
        signer_pk: &BlsPublicKey,
    ) -> Result<BlsSignature, SignatureError>;

    /// Construct a fresh aggregator instance for a new consensus slot.
    fn new_aggregator(&self, threshold: usize) -> ThresholdAggregator;
}
