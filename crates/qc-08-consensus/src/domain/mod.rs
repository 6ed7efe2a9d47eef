//! # Domain Layer
//!
//! The Verify Context / Slot State Machine: per-`(height, preHash)` context
//! and per-proposal slot state (`entities`, `context`), proposer legality
//! checking (`proposer`), and consensus-specific errors (`errors`). No I/O,
//! no async, no knowledge of the event bus.

pub mod context;
pub mod entities;
pub mod errors;
pub mod proposer;
