//! # Split Ledger - Pause-Gated Two-Way Value Splitting
//!
//! ## Purpose
//!
//! Keeps an administrator-managed whitelist of participants. A participant
//! deposits an even amount and names two recipients; each is credited half.
//! Recipients later pull their balance out. The administrator can halt every
//! state-changing call with a pause switch.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Single administrator | `domain/gates.rs` - `ensure_owner()` |
//! | INVARIANT-2 | Solvency (owed <= custody) | `domain/invariants.rs` - `check_solvency_invariant()` |
//! | INVARIANT-3 | No zero entries retained | `domain/withdrawal.rs` - `begin_withdrawal()` |
//! | INVARIANT-4 | Exact halves, no rounding | `domain/split.rs` - `validate_split()` |
//! | INVARIANT-5 | Balance zeroed before release | `service.rs` - `withdraw()` |
//!
//! ## Authorization
//!
//! | Operation | Caller | Pause-gated |
//! |-----------|--------|-------------|
//! | `add_participant` / `remove_participant` | administrator | yes |
//! | `pause` / `unpause` | administrator | n/a |
//! | `transfer_ownership` | administrator | no |
//! | `split_eth` | active participant (configurable) | yes |
//! | `withdraw` | anyone with a balance | yes |
//! | queries | anyone | no |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `ValueTransfer` | Move value out on withdrawal |
//! | `EventPublisher` | Committed-state notifications |
//!
//! ## Usage Example
//!
//! ```ignore
//! use splitter_ledger::prelude::*;
//!
//! let ledger = create_in_memory_service(owner, SplitterConfig::default())?;
//! ledger.add_participant(owner, alice).await?;
//! ledger.split_eth(CallContext::with_value(alice, U256::from(2)), bob, carol).await?;
//! assert_eq!(ledger.withdraw(bob).await?, U256::from(1));
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        CallContext, GateState, LedgerState, SplitPolicy, SplitReceipt, Withdrawal,
    };

    // Value objects
    pub use crate::domain::value_objects::{Address, AddressParseError, U256};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::SplitterApi;
    pub use crate::ports::outbound::{EventPublisher, ValueTransfer};

    // Adapters
    pub use crate::adapters::{InMemoryEventLog, InMemoryPayouts};

    // Configuration
    pub use crate::config::{ConfigError, SplitterConfig};

    // Errors
    pub use crate::errors::{ErrorKind, SplitterError, TransferError};

    // Events
    pub use crate::events::{topics, SplitterEvent};

    // Service
    pub use crate::service::{create_in_memory_service, ServiceStats, SplitterService};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
