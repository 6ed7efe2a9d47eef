//! # Outbound Ports (Driven Ports / SPI)
//!
//! Wire transport is an external collaborator (spec §1 Non-goals): the
//! driver only needs to hand a sealed Cast message to *something* that
//! gets it to the verify group. `NullBroadcaster` is the reference
//! adapter for single-process test harnesses; a real deployment would
//! back this with its P2P stack.

use shared_types::{ConsensusCastMessage, ConsensusVerifyMessage};

pub trait Broadcaster: Send + Sync {
    fn broadcast_cast(&self, msg: &ConsensusCastMessage);
    fn broadcast_verify(&self, msg: &ConsensusVerifyMessage);
}

pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn broadcast_cast(&self, msg: &ConsensusCastMessage) {
        tracing::debug!(height = msg.bh.height, castor = %msg.bh.castor, "cast message ready for broadcast (no network layer configured)");
    }

    fn broadcast_verify(&self, msg: &ConsensusVerifyMessage) {
        tracing::debug!(block_hash = ?msg.block_hash, "verify message ready for broadcast (no network layer configured)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Address, BlockHeader, Hash, SignedInfo};

    fn header() -> BlockHeader {
        BlockHeader {
            height: 1,
            pre_hash: [0u8; 32],
            elapsed_ms: 100,
            prove_value: vec![],
            total_qn: 0,
            cur_time: 0,
            castor: Address([1u8; 32]),
            group: [0u8; 32],
            signature: vec![],
            nonce: 0,
            tx_tree: [0u8; 32],
            receipt_tree: [0u8; 32],
            state_tree: [0u8; 32],
            extra_data: vec![],
            random: vec![],
            gas_fee: 0,
        }
    }

    #[test]
    fn null_broadcaster_does_not_panic() {
        let broadcaster = NullBroadcaster;
        let hash: Hash = [0u8; 32];
        broadcaster.broadcast_cast(&ConsensusCastMessage {
            bh: header(),
            si: SignedInfo { signer: Address([1u8; 32]), data_hash: hash, sign: vec![] },
        });
        broadcaster.broadcast_verify(&ConsensusVerifyMessage {
            block_hash: hash,
            si: SignedInfo { signer: Address([1u8; 32]), data_hash: hash, sign: vec![] },
            random_sign: vec![],
        });
    }
}
