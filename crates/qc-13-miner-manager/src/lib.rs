//! # Miner Manager & Stake Store Subsystem (QC-13)
//!
//! Per-address `Miner` records and `StakeDetail` entries persisted in the
//! account DB's storage subtrees (`domain::store`), the stake/abort
//! operation pipeline and status-transition state machine
//! (`domain::operations`), and the active-proposer-set mirror fed by the
//! `proposalAddCh`/`proposalRemoveCh` channel pair (`adapters::proposal_set`).
//!
//! Grounded in `core/miner_manager.go`: `executeOperation`'s
//! validate→parse→snapshot→apply→commit-or-revert pipeline, `MinerFrozen`/
//! `MinerPenalty`, and `buildVirtualNetRoutine`'s periodic full reload.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): key encoding, the operation pipeline,
//!   and errors
//! - **Ports Layer** (`ports/`): the `MinerManagerApi` capability trait
//! - **Adapters** (`adapters/`): the proposer-set channel listener and
//!   the event-bus publisher
//! - **Service** (`service`): wires the above into `MinerManagerApi`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::proposal_set::{ProposalSet, ProposalUpdateChannels};
pub use domain::errors::MinerError;
pub use domain::operations::{MinerOperationKind, MinerOperationMessage};
pub use ports::inbound::MinerManagerApi;
pub use service::MinerManagerService;
