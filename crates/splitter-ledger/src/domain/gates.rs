//! # Access Gates
//!
//! OwnerGate (single administrator) and PauseGate (emergency halt).
//!
//! Gate checks never mutate. The pause transitions and ownership transfer
//! are the only mutations here.

use crate::domain::entities::{GateState, LedgerState};
use crate::domain::value_objects::Address;
use crate::errors::SplitterError;

/// OwnerGate: `caller` must be the administrator.
///
/// # Errors
///
/// `NotOwner` otherwise.
pub fn ensure_owner(state: &LedgerState, caller: Address) -> Result<(), SplitterError> {
    if caller == state.owner {
        Ok(())
    } else {
        Err(SplitterError::NotOwner { caller })
    }
}

/// PauseGate: the ledger must be `Active`.
///
/// # Errors
///
/// `Paused` otherwise.
pub fn ensure_active(state: &LedgerState) -> Result<(), SplitterError> {
    match state.gate {
        GateState::Active => Ok(()),
        GateState::Paused => Err(SplitterError::Paused),
    }
}

/// Active → Paused. Administrator only.
///
/// # Errors
///
/// `NotOwner`, or `AlreadyPaused` if the gate is already closed.
pub fn pause(state: &mut LedgerState, caller: Address) -> Result<(), SplitterError> {
    ensure_owner(state, caller)?;
    if state.gate == GateState::Paused {
        return Err(SplitterError::AlreadyPaused);
    }
    state.gate = GateState::Paused;
    Ok(())
}

/// Paused → Active. Administrator only.
///
/// # Errors
///
/// `NotOwner`, or `NotPaused` if the gate is already open.
pub fn unpause(state: &mut LedgerState, caller: Address) -> Result<(), SplitterError> {
    ensure_owner(state, caller)?;
    if state.gate == GateState::Active {
        return Err(SplitterError::NotPaused);
    }
    state.gate = GateState::Active;
    Ok(())
}

/// Hands the administrator role to `new_owner`, returning the previous owner.
///
/// Not pause-gated, so a paused ledger can still change hands.
///
/// # Errors
///
/// `NotOwner`, or `ZeroOwner` if `new_owner` is the zero address.
pub fn transfer_ownership(
    state: &mut LedgerState,
    caller: Address,
    new_owner: Address,
) -> Result<Address, SplitterError> {
    ensure_owner(state, caller)?;
    if new_owner.is_zero() {
        return Err(SplitterError::ZeroOwner);
    }
    let previous = state.owner;
    state.owner = new_owner;
    Ok(previous)
}

// =============================================================================
// TESTS
// =============================================================================
