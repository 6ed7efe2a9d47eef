//! Proposer legality check (spec §4.E step 7): VRF proof verification,
//! `Normal` status, active-proposer-set membership, and a stake-weighted
//! VRF ranking threshold so a miner's win probability scales with its
//! share of the proposal pool's total stake, mirroring the original's
//! ticket-weighted rotation without requiring every peer's VRF output to
//! compare ranks against.

use crate::domain::errors::ConsensusError;
use qc_04_state_management::AccountDB;
use qc_13_miner_manager::MinerManagerApi;
use shared_crypto::{output_rank, slot_seed, vrf_verify, VrfProof};
use shared_types::{BlockHeader, MinerStatus, MinerType};

pub fn verify_cast_legality(
    db: &dyn AccountDB,
    miner_manager: &dyn MinerManagerApi,
    header: &BlockHeader,
) -> Result<(), ConsensusError> {
    let miner = miner_manager
        .get_miner(db, &header.castor, MinerType::Proposal)
        .ok_or(ConsensusError::MinerCantCast)?;

    if miner.status != MinerStatus::Normal {
        return Err(ConsensusError::MinerCantCast);
    }
    if !miner_manager.is_active_proposer(&header.castor) {
        return Err(ConsensusError::MinerCantCast);
    }
    if miner.vrf_public_key.len() != 32 {
        return Err(ConsensusError::MinerCantCast);
    }
    let mut address = [0u8; 32];
    address.copy_from_slice(&miner.vrf_public_key);

    let proof = VrfProof::from_bytes(&header.prove_value).map_err(|_| ConsensusError::MinerCantCast)?;
    let seed = slot_seed(&header.pre_hash, header.height);
    vrf_verify(&seed, &proof, &address).map_err(|_| ConsensusError::MinerCantCast)?;

    let total_stake = miner_manager.get_proposal_total_stake(db);
    if total_stake == 0 || miner.stake == 0 {
        return Err(ConsensusError::MinerCantCast);
    }
    let rank = output_rank(&proof.output);
    let threshold = ((miner.stake as u128) * (u64::MAX as u128) / (total_stake as u128)) as u64;
    if rank >= threshold {
        return Err(ConsensusError::MinerCantCast);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_04_state_management::InMemoryAccountDb;
    use qc_13_miner_manager::{MinerManagerService, ProposalSet};
    use shared_crypto::{vrf_evaluate, Secp256k1KeyPair};
    use shared_types::{Address, Miner, MinerStatus};
    use std::sync::Arc;

    fn header_for(castor: Address, pre_hash: [u8; 32], height: u64, prove_value: Vec<u8>) -> BlockHeader {
        BlockHeader {
            height,
            pre_hash,
            elapsed_ms: 1000,
            prove_value,
            total_qn: 0,
            cur_time: 0,
            castor,
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
    fn rejects_unknown_castor() {
        let db = InMemoryAccountDb::new();
        let manager = MinerManagerService::new(ProposalSet::new());
        let header = header_for(Address([1u8; 32]), [0u8; 32], 1, vec![]);
        assert!(verify_cast_legality(&db, &manager, &header).is_err());
    }

    #[test]
    fn accepts_when_vrf_and_stake_share_are_valid() {
        let mut db = InMemoryAccountDb::new();
        let proposal_set = ProposalSet::new();
        let manager = MinerManagerService::new(Arc::clone(&proposal_set));
        let vrf_keypair = Secp256k1KeyPair::generate();
        let castor = Address([7u8; 32]);

        let miner = Miner {
            id: castor,
            miner_type: MinerType::Proposal,
            stake: 1_000_000,
            status: MinerStatus::Normal,
            apply_height: 0,
            abort_height: 0,
            public_key: vec![],
            vrf_public_key: vrf_keypair.address().to_vec(),
        };
        qc_13_miner_manager::domain::store::put_miner(&mut db, &miner);
        proposal_set.insert(castor);

        let pre_hash = [3u8; 32];
        let seed = slot_seed(&pre_hash, 1);
        let proof = vrf_evaluate(&vrf_keypair, &seed);
        let header = header_for(castor, pre_hash, 1, proof.to_bytes().to_vec());

        // With only one proposer in the pool, stake share is 100% of the
        // pool, so the threshold spans the full output space.
        let result = verify_cast_legality(&db, &manager, &header);
        assert!(result.is_ok(), "{result:?}");
    }
}
