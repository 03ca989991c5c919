//! # Withdrawal Gate
//!
//! Pull-payment protocol. A withdrawal is two-phase:
//!
//! 1. [`begin_withdrawal`] checks the balance, removes the entry and takes the
//!    amount out of custody. Nothing is released yet.
//! 2. The caller of this module releases the value externally. If that fails,
//!    [`revert_withdrawal`] puts the amount back.
//!
//! The balance is zero before any external code runs, so a re-entrant
//! withdrawal sees nothing to claim.

use crate::domain::entities::{LedgerState, Withdrawal};
use crate::domain::gates::ensure_active;
use crate::domain::value_objects::Address;
use crate::errors::SplitterError;

/// Zeroes `caller`'s balance and returns the amount to release.
///
/// # Errors
///
/// `Paused` when halted, `ZeroBalance` if nothing is owed.
pub fn begin_withdrawal(
    state: &mut LedgerState,
    caller: Address,
) -> Result<Withdrawal, SplitterError> {
    ensure_active(state)?;

    let amount = state.balance_of(&caller);
    if amount.is_zero() {
        return Err(SplitterError::ZeroBalance { identity: caller });
    }

    state.balances.remove(&caller);
    // Solvency guarantees amount <= custody.
    state.custody = state.custody.saturating_sub(amount);

    Ok(Withdrawal {
        recipient: caller,
        amount,
    })
}

/// Restores a withdrawal whose release failed.
///
/// Adds the amount back rather than overwriting, so credits that arrived
/// while the release was in flight survive.
///
/// # Errors
///
/// `BalanceOverflow` if the restored balance or custody would overflow.
pub fn revert_withdrawal(
    state: &mut LedgerState,
    withdrawal: &Withdrawal,
) -> Result<(), SplitterError> {
    let overflow = SplitterError::BalanceOverflow {
        identity: withdrawal.recipient,
    };
    let custody = state
        .custody
        .checked_add(withdrawal.amount)
        .ok_or_else(|| overflow.clone())?;
    let balance = state
        .balance_of(&withdrawal.recipient)
        .checked_add(withdrawal.amount)
        .ok_or(overflow)?;

    state.custody = custody;
    state.balances.insert(withdrawal.recipient, balance);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
