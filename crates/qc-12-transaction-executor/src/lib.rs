//! # Transaction Executor Subsystem (QC-12)
//!
//! The deterministic per-block state transition (spec component D):
//! intrinsic gas accounting, nonce validation, per-`TxType` dispatch
//! (transfers, contract create/call via `qc-11`, stake/abort operations
//! via `qc-13`, idempotent reward payouts), receipt emission, and
//! eviction-vs-failed-receipt classification. Grounded in
//! `core/tvm_executor.go`'s `Execute` loop.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): the executor itself, gas formula, the
//!   reward idempotency set, and error types
//! - **Ports Layer** (`ports/`): the driving API the driver and finality
//!   call into
//! - **Service Layer** (`service.rs`): wires the domain executor to the
//!   `ContractVm` and `MinerManagerApi` capabilities

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::{BlockExecutionOutcome, EvictedTransaction};
pub use domain::errors::ExecutorError;
pub use domain::gas::{intrinsic_gas, PACKING_DEADLINE, PACK_BONUS, PROPOSAL_BONUS, TRANSACTION_GAS_COST};
pub use ports::inbound::TransactionExecutorApi;
pub use service::TransactionExecutorService;
