//! # Signature Verification Subsystem (QC-10)
//!
//! The threshold signature aggregator (spec component A) plus the ECDSA
//! and BLS verification routines the rest of the consensus core calls
//! into: transaction signer recovery, `SignedInfo` checking, and per-slot
//! aggregator instances.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): the driving trait other subsystems depend on
//! - **Adapters** (`adapters/`): event bus wiring around the aggregator
//! - **Service Layer** (`service.rs`): wires domain logic to the port

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::bus::AggregatorBusAdapter;
pub use domain::aggregator::ThresholdAggregator;
pub use domain::entities::{AggregationOutcome, AggregatorKey, SignatureShare};
pub use domain::errors::SignatureError;
pub use domain::{signed_info, tx_verify};
pub use ports::inbound::SignatureVerificationApi;
pub use service::SignatureVerificationService;
