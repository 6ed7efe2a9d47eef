//! Wires [`ConsensusCore`] to the [`ConsensusApi`] port. The core's methods
//! already match the port's signatures; this layer exists so callers depend
//! on the trait rather than the concrete struct, and so the bus adapter has
//! a `ConsensusApi` to wrap.

use crate::domain::context::ConsensusCore;
use crate::domain::entities::{CastOutcome, GroupInfo, VerifyOutcome};
use crate::domain::errors::ConsensusError;
use crate::ports::inbound::ConsensusApi;
use crate::ports::outbound::LocalSigner;
use qc_04_state_management::{AccountDB, ChainStore};
use qc_10_signature_verification::SignatureVerificationApi;
use qc_13_miner_manager::MinerManagerApi;
use shared_types::{ConsensusCastMessage, ConsensusVerifyMessage, Hash, RawTransaction};
use std::sync::Arc;

pub struct ConsensusService {
    core: ConsensusCore,
}

impl ConsensusService {
    pub fn new(
        chain: Arc<dyn ChainStore>,
        miner_manager: Arc<dyn MinerManagerApi>,
        sig_api: Arc<dyn SignatureVerificationApi>,
        signer: Arc<dyn LocalSigner>,
    ) -> Self {
        Self { core: ConsensusCore::new(chain, miner_manager, sig_api, signer) }
    }
}

impl ConsensusApi for ConsensusService {
    fn register_group(&self, group_id: Hash, info: GroupInfo) {
        self.core.register_group(group_id, info);
    }

    fn on_message_cast(
        &self,
        db: &dyn AccountDB,
        msg: &ConsensusCastMessage,
        txs: &[RawTransaction],
    ) -> Result<CastOutcome, ConsensusError> {
        self.core.on_message_cast(db, msg, txs)
    }

    fn on_message_verify(&self, msg: &ConsensusVerifyMessage) -> Result<VerifyOutcome, ConsensusError> {
        self.core.on_message_verify(msg)
    }

    fn replay_pending(&self, hash: &Hash) -> Vec<ConsensusVerifyMessage> {
        self.core.replay_pending(hash)
    }

    fn height_of(&self, hash: &Hash) -> Option<u64> {
        self.core.height_of(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::InMemoryLocalSigner;
    use qc_04_state_management::{InMemoryAccountDb, InMemoryChainStore};
    use qc_10_signature_verification::SignatureVerificationService;
    use qc_13_miner_manager::{MinerManagerService, ProposalSet};
    use shared_crypto::BlsSecretKey;
    use shared_types::{Address, SignedInfo};

    #[test]
    fn delegates_unresolved_verify_to_cache() {
        let chain = Arc::new(InMemoryChainStore::new());
        let proposal_set = ProposalSet::new();
        let miner_manager = Arc::new(MinerManagerService::new(proposal_set));
        let sig_api = Arc::new(SignatureVerificationService::new());
        let sk = BlsSecretKey::from_seed(&[3u8; 32]).unwrap();
        let signer = Arc::new(InMemoryLocalSigner::new(0, Address([9u8; 32]), sk));

        let service = ConsensusService::new(chain, miner_manager, sig_api, signer);
        let msg = ConsensusVerifyMessage {
            block_hash: [0x11u8; 32],
            si: SignedInfo { signer: Address([8u8; 32]), data_hash: [0x11u8; 32], sign: vec![] },
            random_sign: vec![],
        };

        let result = service.on_message_verify(&msg);
        assert!(matches!(result, Err(ConsensusError::ContextCached)));
        assert_eq!(service.replay_pending(&[0x11u8; 32]).len(), 1);

        let _db = InMemoryAccountDb::new();
    }
}
