//! Outcome types for a single executor pass over a list of transactions.

use shared_types::{Hash, Receipt};

/// A transaction dropped from the block before it produced a receipt —
/// stale nonce, gas limit below intrinsic gas, insufficient balance to
/// even cover the gas fee, or (for `Reward`) an already-applied or
/// malformed payload. Distinct from a *failed* transaction, which still
/// gets a receipt with `status: false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvictedTransaction {
    pub hash: Hash,
    pub reason: String,
}

/// Result of running the executor over one candidate or canonical
/// transaction list (spec §4.D `execute`).
#[derive(Clone, Debug)]
pub struct BlockExecutionOutcome {
    pub state_root: Hash,
    pub executed: Vec<shared_types::RawTransaction>,
    pub receipts: Vec<Receipt>,
    pub evicted: Vec<EvictedTransaction>,
    /// Set when packing mode stopped early because `PACKING_DEADLINE`
    /// elapsed; remaining input transactions were not considered at all
    /// (neither executed nor evicted).
    pub truncated: bool,
}
