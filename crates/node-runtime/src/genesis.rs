//! # Genesis Seeding
//!
//! There is no P2P membership discovery in this crate (spec §1
//! Non-goals): a node that should cast blocks has to arrive at its first
//! tick already a `Normal`-status proposer and verifier with registered
//! stake, VRF key, and BLS group membership. This module seeds that
//! state directly into the account DB and consensus core for a
//! single-node deployment, the way a devnet genesis config seeds a
//! validator set in the teacher's own `genesis::builder`.

use parking_lot::RwLock;
use qc_04_state_management::{AccountDB, InMemoryAccountDb};
use qc_08_consensus::{ConsensusApi, GroupInfo};
use qc_13_miner_manager::domain::store;
use shared_crypto::{BlsPublicKey, BlsSecretKey, Secp256k1KeyPair};
use shared_types::{Address, Hash, Miner, MinerStatus, MinerType, VerifyGroup};
use std::sync::Arc;

/// A single node's full casting/verifying identity, generated fresh on
/// every process start. A production deployment would load these from a
/// wallet keystore instead (spec §1 Non-goals: wallet key management).
pub struct GenesisIdentity {
    pub address: Address,
    pub group_id: Hash,
    pub vrf_keypair: Secp256k1KeyPair,
    pub bls_secret_key: BlsSecretKey,
    pub bls_public_key: BlsPublicKey,
}

/// Generates a fresh VRF/BLS identity. Pure function, no account-DB or
/// consensus side effects — [`seed_miner_records`] and
/// [`register_genesis_group`] apply it to those once they exist.
pub fn generate_identity() -> GenesisIdentity {
    let vrf_keypair = Secp256k1KeyPair::generate();
    let address = Address(vrf_keypair.address());
    let bls_secret_key = BlsSecretKey::from_seed(&vrf_keypair.address()).expect("32-byte seed");
    let bls_public_key = bls_secret_key.public_key();
    let group_id: Hash = shared_types::hash_bytes(b"qc-node-runtime genesis group");

    GenesisIdentity { address, group_id, vrf_keypair, bls_secret_key, bls_public_key }
}

/// Registers `identity` as `Normal`-status stock in both the proposal and
/// verify miner pools, with enough stake to clear `minimumStake()`
/// immediately (spec §4.C status transitions: a fresh miner starts
/// `Prepare` and only becomes eligible to cast/verify once staked).
pub fn seed_miner_records(db: &RwLock<InMemoryAccountDb>, identity: &GenesisIdentity) {
    let mut guard = db.write();
    for mtype in [MinerType::Proposal, MinerType::Verify] {
        store::put_miner(
            &mut *guard,
            &Miner {
                id: identity.address,
                miner_type: mtype,
                stake: store::minimum_stake(),
                status: MinerStatus::Normal,
                apply_height: 0,
                abort_height: 0,
                public_key: identity.bls_public_key.to_bytes().to_vec(),
                vrf_public_key: identity.vrf_keypair.address().to_vec(),
            },
        );
    }
}

/// Registers the one-member verify group this node belongs to (spec §3
/// "VerifyGroup") with consensus.
pub fn register_genesis_group(consensus: &Arc<dyn ConsensusApi>, identity: &GenesisIdentity) {
    consensus.register_group(
        identity.group_id,
        GroupInfo {
            group: VerifyGroup {
                seed: identity.group_id,
                members: vec![identity.address],
                threshold: 1,
                public_key: identity.bls_public_key.to_bytes().to_vec(),
                work_height: 0,
                dismiss_height: u64::MAX,
            },
            member_public_keys: vec![identity.bls_public_key.clone()],
        },
    );
}
