//! # Finality Subsystem (QC-09)
//!
//! Completes a threshold-recovered block (spec §4.G): stamps the
//! aggregate/random BLS signatures onto the header, replays its
//! transactions plus a synthesized `Reward` transaction through the
//! executor, appends the header to the canonical chain, and drops the
//! included transactions from the mempool.
//!
//! Grounded in `core/blockchain_cast.go`'s post-recovery append path and
//! `core/executor.go`'s reward-transaction synthesis.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `Finalizer`, the `Reward` transaction
//!   builder, and errors. No I/O beyond the capability ports it's given.
//! - **Ports Layer** (`ports/`): the `FinalityApi` capability trait.
//! - **Adapters** (`adapters/`): the event-bus publisher for
//!   `BlockFinalized`/`BlockRewardDistributed`.
//! - **Service** (`service`): wires `Finalizer` into `FinalityApi`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::FinalizationOutcome;
pub use domain::errors::FinalityError;
pub use domain::finalizer::{Finalizer, VERIFIER_REWARD_EACH};
pub use ports::inbound::FinalityApi;
pub use service::FinalityService;
