//! # Node Runtime
//!
//! Composition root for the consensus/block-production core: wires state
//! management, mempool, signature verification, miner manager, the
//! executor, consensus, the driver and finality (subsystems A/B/C/D/E/F/G)
//! into one running node and drives its proposer-duty ticks. Exposed as a
//! library, with `main.rs` as the thin binary entry point, so integration
//! tests can build a [`container::NodeContainer`] directly.

pub mod adapters;
pub mod config;
pub mod container;
pub mod genesis;
