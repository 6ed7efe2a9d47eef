//! Domain entities for threshold signature aggregation.

use shared_types::{Hash, MemberId};

/// One verify-group member's signature share over a block hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureShare {
    pub member: MemberId,
    pub bytes: Vec<u8>,
}

impl SignatureShare {
    pub fn new(member: MemberId, bytes: Vec<u8>) -> Self {
        Self { member, bytes }
    }
}

/// Outcome of an `add`/`addForce` call: `(accepted, recovered)`.
///
/// `accepted` is false only for a rejected duplicate witness; `recovered`
/// reflects whether the instance holds a memoized aggregate signature,
/// independent of whether this particular call produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregationOutcome {
    pub accepted: bool,
    pub recovered: bool,
}

impl AggregationOutcome {
    pub const fn rejected(recovered: bool) -> Self {
        Self {
            accepted: false,
            recovered,
        }
    }

    pub const fn accepted(recovered: bool) -> Self {
        Self {
            accepted: true,
            recovered,
        }
    }
}

/// Identifies which block hash an aggregator instance is collecting
/// signatures for — one aggregator per `(height, hash)` slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AggregatorKey {
    pub height: u64,
    pub hash: Hash,
}
