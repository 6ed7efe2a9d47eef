//! Gas constants and the intrinsic-gas formula (spec §4.D, §6).

use std::time::Duration;

/// `TransactionGasCost` (spec §6 constant): the flat component of every
/// transaction's intrinsic gas.
pub const TRANSACTION_GAS_COST: u64 = 1000;

/// `CodeBytePrice = 0.3814697265625`, expressed as an exact rational so the
/// per-byte charge never drifts under repeated integer division.
const CODE_BYTE_PRICE_NUM: u64 = 3_814_697_265_625;
const CODE_BYTE_PRICE_DEN: u64 = 10_000_000_000_000;

/// `MaxCastBlockTime` (spec §6): a packing pass stops admitting further
/// transactions once this much wall-clock time has elapsed.
pub const PACKING_DEADLINE: Duration = Duration::from_secs(3);

/// Flat per-block reward credited to the proposer regardless of which
/// transactions it packed (spec §6 "added" constants, grounded in
/// `core/tvm_executor.go`'s `ProposalBonus()`).
pub const PROPOSAL_BONUS: u64 = 230;

/// Flat per-block reward credited to whichever node packed the block
/// (`PackBonus()` in the same source).
pub const PACK_BONUS: u64 = 50;

/// `intrinsicGas = 1000 + floor(0.3814697265625 * (|data| + |extraData|))`.
pub fn intrinsic_gas(data: &[u8], extra_data: &[u8]) -> u64 {
    let payload_len = (data.len() + extra_data.len()) as u64;
    TRANSACTION_GAS_COST + (payload_len * CODE_BYTE_PRICE_NUM) / CODE_BYTE_PRICE_DEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_the_flat_cost() {
        assert_eq!(intrinsic_gas(&[], &[]), TRANSACTION_GAS_COST);
    }

    #[test]
    fn payload_adds_a_fractional_per_byte_charge() {
        let data = vec![0u8; 1000];
        assert_eq!(intrinsic_gas(&data, &[]), TRANSACTION_GAS_COST + 381);
    }
}
