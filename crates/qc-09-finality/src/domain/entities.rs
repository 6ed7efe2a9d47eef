use shared_types::{Address, BlockHeader, Receipt};

/// What finalizing one recovered block produced, for the bus adapter to
/// publish `BlockFinalized`/`BlockRewardDistributed` from.
pub struct FinalizationOutcome {
    pub header: BlockHeader,
    pub receipts: Vec<Receipt>,
    pub proposer: Address,
    pub proposer_reward: u64,
    pub verifier_reward_each: u64,
}
