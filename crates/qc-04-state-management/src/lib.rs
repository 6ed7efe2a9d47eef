//! # State Management Subsystem (QC-04)
//!
//! The abstract `AccountDB` capability (spec "Dynamic dispatch over account
//! DB"): balances, nonces, code, an arbitrary-key storage subtree (used by
//! the miner manager for `Miner`/`StakeDetail` records), snapshot/revert,
//! and state-root folding. The transaction executor (qc-12) and miner
//! manager (qc-13) depend only on the `AccountDB` trait, never on
//! `InMemoryAccountDb` directly.
//!
//! ## Architecture
//!
//! Also carries the `ChainStore` capability (`ports::chain`): the
//! canonical-header ledger consensus (qc-08) reads from and finality
//! (qc-09) appends to. Kept here rather than a dedicated crate because
//! both are single-writer, per-node stores neither A-G component owns
//! outright.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): the `Account` entity and error types
//! - **Ports Layer** (`ports/`): the `AccountDB` and `ChainStore` capability traits
//! - **Adapters** (`adapters/`): the in-memory reference implementations

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::chain_memory::InMemoryChainStore;
pub use adapters::memory::InMemoryAccountDb;
pub use domain::account::Account;
pub use domain::errors::StateError;
pub use ports::chain::ChainStore;
pub use ports::inbound::{AccountDB, SnapshotId};
