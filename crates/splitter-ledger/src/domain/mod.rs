//! # Domain Layer (Inner Hexagon)
//!
//! Pure accounting logic for the split ledger.
//! NO I/O, NO async.
//!
//! Every operation takes the [`LedgerState`] by reference and either applies
//! all of its effects or returns an error with the state untouched.

pub mod entities;
pub mod gates;
pub mod invariants;
pub mod registry;
pub mod split;
pub mod value_objects;
pub mod withdrawal;

pub use entities::*;
pub use gates::*;
pub use invariants::*;
pub use registry::*;
pub use split::*;
pub use value_objects::*;
pub use withdrawal::*;
