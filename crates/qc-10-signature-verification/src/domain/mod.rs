//! # Domain Layer
//!
//! Pure cryptographic logic: the threshold signature aggregator, BLS
//! signature-share verification, and ECDSA transaction/message signer
//! recovery. No I/O, no async, no knowledge of the event bus.

pub mod aggregator;
pub mod entities;
pub mod errors;
pub mod signed_info;
pub mod tx_verify;
