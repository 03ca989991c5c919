//! # Domain Invariants
//!
//! Properties of [`LedgerState`] that MUST hold between operations.
//!
//! - INVARIANT-1: Single administrator (owner is never the zero address)
//! - INVARIANT-2: Solvency (sum of balances <= custody)
//! - INVARIANT-3: No retained zero entries in the balance map

use crate::domain::entities::LedgerState;
use crate::domain::value_objects::{Address, U256};

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Single Administrator
#[must_use]
pub fn check_owner_invariant(state: &LedgerState) -> bool {
    !state.owner().is_zero()
}

/// INVARIANT-2: Solvency
///
/// The ledger can always pay out everything it owes.
#[must_use]
pub fn check_solvency_invariant(state: &LedgerState) -> bool {
    owed_checked(state).is_some_and(|owed| owed <= state.custody())
}

/// INVARIANT-3: No Zero Entries
///
/// Withdrawals remove entries instead of leaving zeroes behind.
#[must_use]
pub fn check_no_zero_entries_invariant(state: &LedgerState) -> bool {
    state.balances().all(|(_, amount)| !amount.is_zero())
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(state: &LedgerState) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_owner_invariant(state) {
        violations.push(InvariantViolation::ZeroOwner);
    }

    if !check_solvency_invariant(state) {
        violations.push(InvariantViolation::Insolvent {
            owed: state.total_owed(),
            custody: state.custody(),
        });
    }

    let zeroed: Vec<Address> = state
        .balances()
        .filter(|(_, amount)| amount.is_zero())
        .map(|(who, _)| *who)
        .collect();
    if !zeroed.is_empty() {
        violations.push(InvariantViolation::ZeroEntries(zeroed));
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

fn owed_checked(state: &LedgerState) -> Option<U256> {
    state
        .balances()
        .try_fold(U256::zero(), |acc, (_, amount)| acc.checked_add(*amount))
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Owner is the zero address.
    ZeroOwner,
    /// Ledger owes more than it holds.
    Insolvent { owed: U256, custody: U256 },
    /// Balance entries holding zero.
    ZeroEntries(Vec<Address>),
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroOwner => write!(f, "administrator is the zero address"),
            Self::Insolvent { owed, custody } => {
                write!(f, "insolvent: owes {owed} but holds {custody}")
            }
            Self::ZeroEntries(who) => {
                write!(f, "{} zero-valued balance entries retained", who.len())
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
