//! Reward-transaction idempotency set (spec §4.D "bonus-manager" note).
//!
//! A `Reward` transaction's `extraData` carries `groupId ‖ verifier0 ‖
//! verifier1 ‖ …`; redelivery of the same transaction (same `data` key,
//! per `core/tvm_executor.go`'s `BonusManagerImpl.Contain`) must not pay
//! out twice. Persisted as a presence marker in a reserved account's
//! storage subtree, the same pattern `qc-13-miner-manager::domain::store`
//! uses for its pool markers.

use qc_04_state_management::AccountDB;
use shared_types::{hash_bytes, Address};

/// Reserved address whose storage subtree indexes applied reward
/// transactions by a digest of their `data` field.
pub const BONUS_POOL_ADDR: Address = Address([0xFEu8; 32]);
const PREFIX_APPLIED: &[u8] = b"bonus/applied/";

fn applied_key(data: &[u8]) -> Vec<u8> {
    let mut key = PREFIX_APPLIED.to_vec();
    key.extend_from_slice(&hash_bytes(data));
    key
}

/// Whether a reward transaction keyed by `data` has already been applied.
pub fn contains(db: &dyn AccountDB, data: &[u8]) -> bool {
    db.get_storage(&BONUS_POOL_ADDR, &applied_key(data)).is_some()
}

/// Record `data` as applied so a redelivered copy of the same reward
/// transaction is recognized and evicted rather than paid out again.
pub fn mark_applied(db: &mut dyn AccountDB, data: &[u8]) {
    db.set_storage(&BONUS_POOL_ADDR, applied_key(data), vec![1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_04_state_management::InMemoryAccountDb;

    #[test]
    fn marks_and_detects_applied_payload() {
        let mut db = InMemoryAccountDb::new();
        let data = b"group-7-round-3".to_vec();
        assert!(!contains(&db, &data));
        mark_applied(&mut db, &data);
        assert!(contains(&db, &data));
    }

    #[test]
    fn distinct_payloads_are_independent() {
        let mut db = InMemoryAccountDb::new();
        mark_applied(&mut db, b"a");
        assert!(contains(&db, b"a"));
        assert!(!contains(&db, b"b"));
    }
}
