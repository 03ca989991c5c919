//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the outbound ports, used by tests and the
//! node binary. A settlement-backed host supplies its own.

pub mod event_log;
pub mod payouts;

pub use event_log::*;
pub use payouts::*;
