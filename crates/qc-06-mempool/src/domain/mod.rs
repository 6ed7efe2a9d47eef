//! # Domain Layer
//!
//! The pool itself: admission, eviction, promotion, and pack iteration.
//! No I/O beyond the narrow `AccountNonceView` outbound port.

pub mod entities;
pub mod errors;
pub mod pool;
