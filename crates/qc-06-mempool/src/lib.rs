//! # Mempool Subsystem (QC-06)
//!
//! The "simple container" mempool (spec component B): a nonce-ordered
//! pending tier and a price-ordered queue tier per sender, with admission,
//! eviction, promotion, and pack iteration.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): the pool itself, no I/O beyond the
//!   narrow `AccountNonceView` outbound port
//! - **Ports Layer** (`ports/`): the driving API and the nonce-view SPI
//! - **Adapters** (`adapters/`): event bus wiring
//! - **Service Layer** (`service.rs`): wires `TxPool` to `MempoolApi`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::bus::MempoolBusAdapter;
pub use domain::entities::{Eviction, PooledTransaction, Tier};
pub use domain::errors::MempoolError;
pub use domain::pool::{MempoolConfig, TxPool};
pub use ports::inbound::MempoolApi;
pub use ports::outbound::AccountNonceView;
