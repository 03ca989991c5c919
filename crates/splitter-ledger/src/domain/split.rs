//! # Split Ledger
//!
//! Validates a deposit and credits half of it to each of two recipients.
//!
//! Validation order (first failure wins):
//!
//! 1. pause gate
//! 2. caller eligibility (participant, minimum registry size)
//! 3. non-zero value
//! 4. even value
//! 5. neither recipient is the caller
//! 6. recipients differ
//!
//! Every check and every overflow-checked sum runs before the first write, so
//! a rejected split leaves the state untouched.

use crate::domain::entities::{CallContext, LedgerState, SplitPolicy, SplitReceipt};
use crate::domain::gates::ensure_active;
use crate::domain::value_objects::{Address, U256};
use crate::errors::SplitterError;

/// Checks everything except arithmetic headroom and returns the per-recipient share.
///
/// # Errors
///
/// See the module docs for the ordered list of failures.
pub fn validate_split(
    state: &LedgerState,
    ctx: &CallContext,
    policy: &SplitPolicy,
    recipient1: Address,
    recipient2: Address,
) -> Result<U256, SplitterError> {
    ensure_active(state)?;

    if policy.require_participant_caller && !state.is_active_participant(&ctx.caller) {
        return Err(SplitterError::NotParticipant { caller: ctx.caller });
    }
    if state.participant_count() < policy.min_active_participants {
        return Err(SplitterError::NotEnoughParticipants {
            active: state.participant_count(),
            required: policy.min_active_participants,
        });
    }

    if ctx.value.is_zero() {
        return Err(SplitterError::ZeroValue);
    }
    let two = U256::from(2);
    if !(ctx.value % two).is_zero() {
        return Err(SplitterError::UnevenSplit { value: ctx.value });
    }

    if recipient1 == ctx.caller || recipient2 == ctx.caller {
        return Err(SplitterError::SelfSplit { caller: ctx.caller });
    }
    if recipient1 == recipient2 {
        return Err(SplitterError::DuplicateRecipient {
            recipient: recipient1,
        });
    }

    Ok(ctx.value / two)
}

/// Takes `ctx.value` into custody and credits `value / 2` to each recipient.
///
/// # Errors
///
/// Any [`validate_split`] failure, or `BalanceOverflow` if a credit or the
/// custody total would overflow.
pub fn execute_split(
    state: &mut LedgerState,
    ctx: &CallContext,
    policy: &SplitPolicy,
    recipient1: Address,
    recipient2: Address,
) -> Result<SplitReceipt, SplitterError> {
    let share = validate_split(state, ctx, policy, recipient1, recipient2)?;

    let custody = state
        .custody
        .checked_add(ctx.value)
        .ok_or(SplitterError::BalanceOverflow {
            identity: ctx.caller,
        })?;
    let credited1 = state
        .balance_of(&recipient1)
        .checked_add(share)
        .ok_or(SplitterError::BalanceOverflow {
            identity: recipient1,
        })?;
    let credited2 = state
        .balance_of(&recipient2)
        .checked_add(share)
        .ok_or(SplitterError::BalanceOverflow {
            identity: recipient2,
        })?;

    state.custody = custody;
    state.balances.insert(recipient1, credited1);
    state.balances.insert(recipient2, credited2);

    Ok(SplitReceipt {
        sender: ctx.caller,
        recipient1,
        recipient2,
        amount: ctx.value,
        share,
    })
}

// =============================================================================
// TESTS
// =============================================================================
