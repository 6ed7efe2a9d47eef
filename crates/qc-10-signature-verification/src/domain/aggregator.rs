//! # Threshold Signature Aggregator
//!
//! One instance is created per proposed block hash and accumulates BLS
//! signature shares from verify-group members until `threshold` distinct
//! witnesses have contributed, at which point a group signature is
//! recovered and memoized. All subsequent calls become no-ops so repeated
//! gossip of the same shares costs nothing beyond a lock + map lookup.

use crate::domain::entities::{AggregationOutcome, SignatureShare};
use parking_lot::RwLock;
use shared_crypto::{BlsPublicKey, BlsSignature};
use shared_types::MemberId;
use std::collections::HashMap;

/// Accumulates signature shares for a single block hash and recovers the
/// group signature once `threshold` distinct members have signed.
///
/// Reader and writer paths never share a critical section larger than one
/// map operation, so `add` calls from concurrent verify-group members
/// interleave freely; the witness set only ever grows.
pub struct ThresholdAggregator {
    threshold: usize,
    witnesses: RwLock<HashMap<MemberId, BlsSignature>>,
    recovered: RwLock<Option<BlsSignature>>,
}

impl ThresholdAggregator {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            witnesses: RwLock::new(HashMap::new()),
            recovered: RwLock::new(None),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn witness_count(&self) -> usize {
        self.witnesses.read().len()
    }

    pub fn is_recovered(&self) -> bool {
        self.recovered.read().is_some()
    }

    /// Add a signature share. Once an aggregate has been recovered, further
    /// calls short-circuit without touching the witness map or re-running
    /// BLS aggregation.
    pub fn add(&self, share: SignatureShare, sig: BlsSignature) -> AggregationOutcome {
        self.add_inner(share, sig, false)
    }

    /// Identical to `add` but bypasses the early-exit once-recovered check,
    /// so a caller can force a witness in (e.g. to backfill a share that
    /// arrived late but is still wanted for audit/reward accounting).
    pub fn add_force(&self, share: SignatureShare, sig: BlsSignature) -> AggregationOutcome {
        self.add_inner(share, sig, true)
    }

    fn add_inner(&self, share: SignatureShare, sig: BlsSignature, force: bool) -> AggregationOutcome {
        if !force && self.is_recovered() {
            return AggregationOutcome::rejected(true);
        }

        {
            let mut witnesses = self.witnesses.write();
            if witnesses.contains_key(&share.member) {
                return AggregationOutcome::rejected(self.is_recovered());
            }
            witnesses.insert(share.member, sig);
        }

        AggregationOutcome::accepted(self.try_recover())
    }

    /// Attempt to recover the group signature from the current witness set.
    /// Returns whether an aggregate is memoized afterward (which may already
    /// have been true before this call).
    fn try_recover(&self) -> bool {
        if self.is_recovered() {
            return true;
        }
        let shares: Vec<BlsSignature> = {
            let witnesses = self.witnesses.read();
            if witnesses.len() < self.threshold {
                return false;
            }
            witnesses.values().cloned().collect()
        };

        match shared_crypto::aggregate_signatures(&shares) {
            Ok(aggregate) => {
                *self.recovered.write() = Some(aggregate);
                true
            }
            Err(_) => false,
        }
    }

    /// Verify the memoized aggregate against the verify group's public key.
    /// Returns `false` if no aggregate has been recovered yet.
    pub fn verify(&self, group_pk: &BlsPublicKey, msg: &[u8]) -> bool {
        match self.recovered.read().as_ref() {
            Some(sig) => shared_crypto::verify_aggregate(msg, sig, group_pk),
            None => false,
        }
    }

    /// Borrow the memoized aggregate, if recovered.
    pub fn aggregate_signature(&self) -> Option<BlsSignature> {
        self.recovered.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::BlsSecretKey;

    fn member(seed: u8, message: &[u8]) -> (SignatureShare, BlsSignature, BlsPublicKey) {
        let sk = BlsSecretKey::from_seed(&[seed; 32]).unwrap();
        let sig = sk.sign(message);
        let share = SignatureShare::new(seed as usize, sig.to_bytes().to_vec());
        (share, sig, sk.public_key())
    }

    #[test]
    fn recovers_once_threshold_reached() {
        let message = b"block-hash-digest";
        let aggregator = ThresholdAggregator::new(3);
        let members: Vec<_> = (1u8..=4).map(|s| member(s, message)).collect();

        let out1 = aggregator.add(members[0].0.clone(), members[0].1.clone());
        assert_eq!(out1, AggregationOutcome::accepted(false));

        let out2 = aggregator.add(members[1].0.clone(), members[1].1.clone());
        assert_eq!(out2, AggregationOutcome::accepted(false));

        let out3 = aggregator.add(members[2].0.clone(), members[2].1.clone());
        assert_eq!(out3, AggregationOutcome::accepted(true));
        assert!(aggregator.is_recovered());

        // Further calls (including distinct members) are no-ops.
        let out4 = aggregator.add(members[3].0.clone(), members[3].1.clone());
        assert_eq!(out4, AggregationOutcome::rejected(true));
        assert_eq!(aggregator.witness_count(), 3);
    }

    #[test]
    fn rejects_duplicate_witness() {
        let message = b"dup-test";
        let aggregator = ThresholdAggregator::new(3);
        let (share, sig, _) = member(9, message);

        let first = aggregator.add(share.clone(), sig.clone());
        assert_eq!(first, AggregationOutcome::accepted(false));

        let second = aggregator.add(share, sig);
        assert_eq!(second, AggregationOutcome::rejected(false));
        assert_eq!(aggregator.witness_count(), 1);
    }

    #[test]
    fn add_force_bypasses_recovered_short_circuit() {
        let message = b"force-test";
        let aggregator = ThresholdAggregator::new(2);
        let members: Vec<_> = (1u8..=3).map(|s| member(s, message)).collect();

        aggregator.add(members[0].0.clone(), members[0].1.clone());
        aggregator.add(members[1].0.clone(), members[1].1.clone());
        assert!(aggregator.is_recovered());

        let forced = aggregator.add_force(members[2].0.clone(), members[2].1.clone());
        assert_eq!(forced, AggregationOutcome::accepted(true));
        assert_eq!(aggregator.witness_count(), 3);
    }

    #[test]
    fn verify_succeeds_against_group_aggregate_key() {
        let message = b"verify-test";
        let aggregator = ThresholdAggregator::new(3);
        let members: Vec<_> = (1u8..=3).map(|s| member(s, message)).collect();
        for (share, sig, _) in &members {
            aggregator.add(share.clone(), sig.clone());
        }

        let pks: Vec<BlsPublicKey> = members.iter().map(|(_, _, pk)| pk.clone()).collect();
        let group_pk = shared_crypto::aggregate_public_keys(&pks).unwrap();
        assert!(aggregator.verify(&group_pk, message));
        assert!(!aggregator.verify(&group_pk, b"wrong-message"));
    }

    #[test]
    fn verify_fails_before_recovery() {
        let aggregator = ThresholdAggregator::new(5);
        let (_, _, pk) = member(1, b"anything");
        assert!(!aggregator.verify(&pk, b"anything"));
    }
}
