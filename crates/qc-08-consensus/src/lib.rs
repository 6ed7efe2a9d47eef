//! # Consensus Subsystem (QC-08)
//!
//! The Verify Context / Slot State Machine: per-`(height, preHash)` context
//! tracking, Cast/Verify message validation (spec §4.E), proposer legality
//! checking against the active VRF-weighted proposer set (`domain::proposer`),
//! and threshold-signature recovery into a [`domain::entities::RecoveredBlock`]
//! for qc-09-finality to apply to the chain.
//!
//! Grounded in `core/group_manager.go` / `core/blockchain_cast.go`'s slot
//! bookkeeping and the step-numbered Cast/Verify validation sequence.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `ConsensusCore`, the slot/context state,
//!   proposer legality, and errors. No I/O, no async.
//! - **Ports Layer** (`ports/`): the `ConsensusApi` capability trait and the
//!   `LocalSigner` outbound port for this node's own signing identity.
//! - **Adapters** (`adapters/`): the event-bus publisher wrapping successful
//!   Cast/Verify calls.
//! - **Service** (`service`): wires `ConsensusCore` into `ConsensusApi`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::context::ConsensusCore;
pub use domain::entities::{CastOutcome, GroupInfo, RecoveredBlock, VerifyOutcome};
pub use domain::errors::ConsensusError;
pub use ports::inbound::ConsensusApi;
pub use ports::outbound::{InMemoryLocalSigner, LocalSigner};
pub use service::ConsensusService;
