//! # Participant Registry
//!
//! The whitelist of identities allowed to initiate splits. Membership is
//! binary: an identity is either present or absent.

use crate::domain::entities::LedgerState;
use crate::domain::gates::{ensure_active, ensure_owner};
use crate::domain::value_objects::Address;
use crate::errors::SplitterError;

/// Marks `identity` active. Returns `false` if it already was (no-op).
///
/// # Errors
///
/// `Paused` when halted, `NotOwner` for anyone but the administrator.
pub fn add_participant(
    state: &mut LedgerState,
    caller: Address,
    identity: Address,
) -> Result<bool, SplitterError> {
    ensure_active(state)?;
    ensure_owner(state, caller)?;
    Ok(state.participants.insert(identity))
}

/// Removes `identity` from the registry.
///
/// Credited balances are untouched; a removed participant can still withdraw.
///
/// # Errors
///
/// `Paused`, `NotOwner`, or `ParticipantNotFound` if `identity` is absent.
pub fn remove_participant(
    state: &mut LedgerState,
    caller: Address,
    identity: Address,
) -> Result<(), SplitterError> {
    ensure_active(state)?;
    ensure_owner(state, caller)?;
    if state.participants.remove(&identity) {
        Ok(())
    } else {
        Err(SplitterError::ParticipantNotFound { identity })
    }
}

// =============================================================================
// TESTS
// =============================================================================
