//! # Domain Layer
//!
//! The proposer/verifier driver (`driver`), its entities, and errors. No
//! bus, no async; `node-runtime` drives `on_tick` from a ticker task.

pub mod driver;
pub mod entities;
pub mod errors;
