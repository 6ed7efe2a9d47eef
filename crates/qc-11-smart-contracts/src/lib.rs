//! # Smart Contract Snapshot/Gas Interface (QC-11)
//!
//! The transaction executor (qc-12) dispatches `ContractCreate`/
//! `ContractCall` through the [`ContractVm`] capability. Opcode-level EVM
//! semantics are explicitly out of scope (spec §1) — this crate fixes
//! only the calling convention (gas accounting, deploy/call outcomes,
//! error taxonomy) and ships a deterministic reference implementation.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): outcome/error types
//! - **Ports Layer** (`ports/`): the `ContractVm` capability trait
//! - **Adapters** (`adapters/`): the reference VM

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::reference_vm::ReferenceVm;
pub use domain::entities::{ContractOutcome, Log};
pub use domain::errors::ContractError;
pub use ports::inbound::ContractVm;
