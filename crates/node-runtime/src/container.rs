//! # Subsystem Container
//!
//! Composition root wiring mempool (B), state management (qc-04),
//! signature verification (A), miner manager (C), the executor (D),
//! consensus (E), the driver (F), and finality (G) into one node,
//! mirroring the teacher's own `container::SubsystemContainer` shape:
//! one `Arc`-held service per subsystem plus the shared infrastructure
//! (event bus, account DB, chain store) every one of them closes over.
//!
//! Each subsystem's own driving API is wrapped in its event-bus adapter
//! (`*BusAdapter`) so callers into this container see the same
//! choreography the teacher's V2.3 pattern documents: a tick that casts a
//! block publishes `BlockCast` for anything downstream to pick up, a
//! recovered block finalizing publishes `BlockFinalized` /
//! `BlockRewardDistributed`, and so on — without this composition root
//! wiring any direct calls between them itself.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use shared_bus::InMemoryEventBus;
use shared_types::Address;

use qc_04_state_management::{ChainStore, InMemoryAccountDb, InMemoryChainStore};
use qc_06_mempool::adapters::bus::MempoolBusAdapter;
use qc_06_mempool::{MempoolApi, MempoolConfig, TxPool};
use qc_08_consensus::adapters::bus::ConsensusBusAdapter;
use qc_08_consensus::ports::outbound::LocalSigner;
use qc_08_consensus::{ConsensusApi, ConsensusService, InMemoryLocalSigner};
use qc_09_finality::adapters::bus::FinalityBusAdapter;
use qc_09_finality::{FinalityApi, FinalityService};
use qc_10_signature_verification::{SignatureVerificationApi, SignatureVerificationService};
use qc_11_smart_contracts::ReferenceVm;
use qc_12_transaction_executor::{TransactionExecutorApi, TransactionExecutorService};
use qc_13_miner_manager::adapters::bus::MinerManagerBusAdapter;
use qc_13_miner_manager::{MinerManagerApi, MinerManagerService, ProposalSet, ProposalUpdateChannels};
use qc_17_block_production::adapters::bus::BlockProductionBusAdapter;
use qc_17_block_production::{BlockProductionService, DriverOutcome, NodeIdentity, NullBroadcaster};

use crate::adapters::nonce_view::AccountDbNonceView;
use crate::config::NodeConfig;
use crate::genesis;

type Mempool = TxPool<AccountDbNonceView>;

/// Every subsystem instance this node needs, wired together once at
/// startup. Kept as a flat struct (rather than nested containers, the
/// way the teacher's 15-subsystem container does) because this crate
/// only covers the consensus/production core (spec §1): there is no
/// separate storage/indexing/networking layer here to group it against.
pub struct NodeContainer {
    pub config: NodeConfig,
    pub db: Arc<RwLock<InMemoryAccountDb>>,
    pub chain: Arc<InMemoryChainStore>,
    pub event_bus: Arc<InMemoryEventBus>,
    pub proposal_set: Arc<ProposalSet>,
    pub proposal_channels: ProposalUpdateChannels,

    pub mempool: Arc<Mempool>,
    pub mempool_adapter: MempoolBusAdapter<Mempool, InMemoryEventBus>,

    pub miner_manager: Arc<MinerManagerService>,
    pub miner_manager_adapter: MinerManagerBusAdapter<MinerManagerService, InMemoryEventBus>,

    pub executor: Arc<TransactionExecutorService>,

    pub consensus: Arc<ConsensusService>,
    pub consensus_adapter: ConsensusBusAdapter<ConsensusService, InMemoryEventBus>,

    pub finality: Arc<FinalityService>,
    pub finality_adapter: FinalityBusAdapter<FinalityService, InMemoryEventBus>,

    pub driver: Arc<BlockProductionService>,
    pub driver_adapter: BlockProductionBusAdapter<BlockProductionService, NullBroadcaster, InMemoryEventBus>,

    pub node_address: Address,
}

impl NodeContainer {
    /// Build every subsystem, seed this node's genesis proposer/verifier
    /// identity (spec §1: no P2P membership discovery to learn one from),
    /// and register it with consensus.
    pub fn new(config: NodeConfig) -> Self {
        info!("wiring consensus/block-production core subsystems");

        let identity = genesis::generate_identity();

        let db = Arc::new(RwLock::new(InMemoryAccountDb::new()));
        let chain = Arc::new(InMemoryChainStore::new());
        let event_bus = Arc::new(InMemoryEventBus::with_capacity(config.event_bus_capacity));

        genesis::seed_miner_records(&db, &identity);

        let proposal_set = ProposalSet::new();
        proposal_set.insert(identity.address);
        let proposal_channels = qc_13_miner_manager::adapters::proposal_set::spawn_listener(Arc::clone(&proposal_set));

        let nonce_view = Arc::new(AccountDbNonceView::new(Arc::clone(&db)));
        let mempool = Arc::new(TxPool::new(MempoolConfig::default(), nonce_view));
        let mempool_adapter = MempoolBusAdapter::new(mempool.clone(), event_bus.clone());

        let miner_manager = Arc::new(MinerManagerService::new(Arc::clone(&proposal_set)));
        let miner_manager_adapter = MinerManagerBusAdapter::new(miner_manager.clone(), event_bus.clone());

        let sig_service: Arc<dyn SignatureVerificationApi> = Arc::new(SignatureVerificationService::new());

        let vm = Arc::new(ReferenceVm::new());
        let executor = Arc::new(TransactionExecutorService::new(
            vm,
            miner_manager.clone() as Arc<dyn MinerManagerApi>,
        ));

        let signer: Arc<dyn LocalSigner> =
            Arc::new(InMemoryLocalSigner::new(0, identity.address, identity.bls_secret_key));

        let consensus = Arc::new(ConsensusService::new(
            chain.clone() as Arc<dyn ChainStore>,
            miner_manager.clone() as Arc<dyn MinerManagerApi>,
            sig_service,
            signer.clone(),
        ));
        genesis::register_genesis_group(&(consensus.clone() as Arc<dyn ConsensusApi>), &identity);
        let consensus_adapter = ConsensusBusAdapter::new(consensus.clone(), event_bus.clone());

        let finality = Arc::new(FinalityService::new(
            chain.clone() as Arc<dyn ChainStore>,
            executor.clone() as Arc<dyn TransactionExecutorApi>,
            mempool.clone() as Arc<dyn MempoolApi>,
        ));
        let finality_adapter = FinalityBusAdapter::new(finality.clone(), event_bus.clone());

        let driver = Arc::new(BlockProductionService::new(
            chain.clone() as Arc<dyn ChainStore>,
            mempool.clone() as Arc<dyn MempoolApi>,
            executor.clone() as Arc<dyn TransactionExecutorApi>,
            miner_manager.clone() as Arc<dyn MinerManagerApi>,
            consensus.clone() as Arc<dyn ConsensusApi>,
            signer,
            NodeIdentity {
                address: identity.address,
                group_id: identity.group_id,
                vrf_keypair: identity.vrf_keypair,
            },
        ));
        let driver_adapter = BlockProductionBusAdapter::new(driver.clone(), Arc::new(NullBroadcaster), event_bus.clone());

        info!(address = %identity.address, "genesis proposer/verifier identity seeded");

        Self {
            config,
            db,
            chain,
            event_bus,
            proposal_set,
            proposal_channels,
            mempool,
            mempool_adapter,
            miner_manager,
            miner_manager_adapter,
            executor,
            consensus,
            consensus_adapter,
            finality,
            finality_adapter,
            driver,
            driver_adapter,
            node_address: identity.address,
        }
    }

    /// Periodic proposer-set rebuild (spec §4.C / §5), driven by the same
    /// tick counter that gates proposer-duty checks. Uses
    /// `config.proposal_rebuild_interval_ticks` rather than `qc-13`'s own
    /// `REBUILD_INTERVAL_TICKS` constant so this cadence stays
    /// configurable per deployment.
    pub fn maybe_rebuild_proposal_set(&self, tick: u64) {
        if tick % self.config.proposal_rebuild_interval_ticks != 0 {
            return;
        }
        let db = self.db.read();
        self.proposal_set.rebuild(&*db);
    }

    /// One proposer-duty tick (spec §4.F): attempts to cast a block at
    /// `height` atop `pre_hash` if this node holds proposer duty there,
    /// publishing `BlockCast`/`BlockCastRejected` through the bus adapter.
    pub async fn on_tick(&self, height: u64, pre_hash: shared_types::Hash, now_ms: i64) {
        let mut db = self.db.write();
        match self.driver_adapter.tick_and_publish(&mut *db, height, pre_hash, now_ms).await {
            Ok(DriverOutcome::Cast { message, .. }) => {
                info!(height, castor = %message.bh.castor, "cast new block");
            }
            Ok(DriverOutcome::NotProposer) | Ok(DriverOutcome::AlreadyCast) => {}
            Err(err) => {
                tracing::debug!(height, %err, "tick produced no cast");
            }
        }
    }
}
