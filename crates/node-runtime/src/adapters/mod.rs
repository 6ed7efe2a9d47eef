//! # Composition-Root Adapters
//!
//! Small glue types that exist only because the core crates accept
//! capability traits, not concrete types: the mempool wants an
//! `AccountNonceView`, and this composition root only has a shared
//! `InMemoryAccountDb`.

pub mod nonce_view;
