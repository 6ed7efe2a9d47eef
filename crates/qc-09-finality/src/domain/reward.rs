//! Synthesizes the per-block `Reward` transaction (spec §4.G): the
//! idempotency marker in `data` and the `groupId ‖ verifier₀ ‖ verifier₁ ‖
//! …` payload in `extraData` that `qc-12`'s `execute_reward` expects.

use shared_types::{Address, BigInt, Hash, RawTransaction, TxType};

/// `value` is credited to every verifier equally; `group_id` and
/// `verifiers` are re-encoded byte-for-byte into `extraData` so the
/// executor can recover them without a second lookup.
pub fn build_reward_transaction(
    block_hash: Hash,
    group_id: Hash,
    verifiers: &[Address],
    value_per_verifier: u64,
) -> RawTransaction {
    let mut extra_data = Vec::with_capacity(32 * (1 + verifiers.len()));
    extra_data.extend_from_slice(&group_id);
    for verifier in verifiers {
        extra_data.extend_from_slice(&verifier.0);
    }

    RawTransaction {
        tx_type: TxType::Reward,
        nonce: 0,
        value: BigInt::from(value_per_verifier),
        target: None,
        gas_limit: 0,
        gas_price: BigInt::ZERO,
        data: block_hash.to_vec(),
        extra_data,
        sign: vec![],
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_group_id_then_verifiers() {
        let block_hash = [1u8; 32];
        let group_id = [2u8; 32];
        let verifiers = vec![Address([3u8; 32]), Address([4u8; 32])];
        let tx = build_reward_transaction(block_hash, group_id, &verifiers, 100);

        assert_eq!(tx.tx_type, TxType::Reward);
        assert_eq!(tx.data, block_hash.to_vec());
        assert_eq!(&tx.extra_data[..32], &group_id);
        assert_eq!(&tx.extra_data[32..64], &verifiers[0].0);
        assert_eq!(&tx.extra_data[64..96], &verifiers[1].0);
        assert_eq!(tx.value, BigInt::from(100u64));
    }
}
