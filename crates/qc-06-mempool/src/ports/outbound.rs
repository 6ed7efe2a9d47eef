//! # Outbound Ports (Driven Ports / SPI)
//!
//! The pool never holds an `AccountDB` itself — it asks this narrow view
//! for the one fact it needs: a sender's current on-chain nonce, to decide
//! whether a transaction is immediately packable (pending) or must wait
//! (queue).

use shared_types::Address;

/// A read-only view of account nonces, backed by the state management
/// subsystem's `AccountDB`.
pub trait AccountNonceView: Send + Sync {
    /// The sender's current on-chain nonce. The pool computes the
    /// expected-next nonce as `nonce(sender) + 1`.
    fn nonce(&self, sender: &Address) -> u64;
}
