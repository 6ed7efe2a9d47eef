//! # Signature Verification Service
//!
//! Stateless implementation of `SignatureVerificationApi`; delegates every
//! operation straight to the domain layer. Kept as a concrete struct
//! (rather than free functions) so call sites depend on the trait object
//! and can be swapped for a test double.

use crate::domain::aggregator::ThresholdAggregator;
use crate::domain::errors::SignatureError;
use crate::domain::{signed_info, tx_verify};
use crate::ports::inbound::SignatureVerificationApi;
use shared_crypto::{BlsPublicKey, BlsSignature};
use shared_types::{Address, Hash, RawTransaction, SignedInfo};

#[derive(Default)]
pub struct SignatureVerificationService;

impl SignatureVerificationService {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerificationApi for SignatureVerificationService {
    fn recover_transaction_source(&self, tx: &RawTransaction) -> Result<Address, SignatureError> {
        tx_verify::recover_transaction_source(tx)
    }

    fn verify_signed_info(
        &self,
        si: &SignedInfo,
        expected_hash: &Hash,
        signer_pk: &BlsPublicKey,
    ) -> Result<BlsSignature, SignatureError> {
        signed_info::verify_signed_info(si, expected_hash, signer_pk)
    }

    fn new_aggregator(&self, threshold: usize) -> ThresholdAggregator {
        ThresholdAggregator::new(threshold)
    }
}
