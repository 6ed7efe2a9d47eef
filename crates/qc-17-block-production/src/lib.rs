//! # Proposer/Verifier Driver (QC-17)
//!
//! Ticks proposer duty (VRF ranking at `(height, preHash)`), assembles and
//! seals blocks when eligible, and routes incoming Cast/Verify wire
//! messages into `qc-08-consensus`, replaying any Verify messages a fresh
//! Cast unblocked. Grounded in `core/blockchain_cast.go`'s tick loop.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `BlockProductionDriver`, its entities
//!   and errors. No I/O beyond the capability ports it's handed.
//! - **Ports Layer** (`ports/`): the `BlockProductionApi` driving API and
//!   the `Broadcaster` outbound seam (network transport is out of scope).
//! - **Adapters** (`adapters/`): the event-bus publisher wrapping `on_tick`.
//! - **Service** (`service`): wires the driver into `BlockProductionApi`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::bus::BlockProductionBusAdapter;
pub use domain::entities::{DriverOutcome, NodeIdentity};
pub use domain::errors::DriverError;
pub use ports::inbound::BlockProductionApi;
pub use ports::outbound::{Broadcaster, NullBroadcaster};
pub use service::BlockProductionService;
