//! # Error Types
//!
//! All error types for the split ledger.
//!
//! Every [`SplitterError`] maps onto one [`ErrorKind`] so callers can branch on
//! the cause. The `Display` text is the fixed reason literal for each failure.

use crate::domain::value_objects::{Address, U256};
use thiserror::Error;

// =============================================================================
// ERROR KIND
// =============================================================================

/// Coarse failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks the required role or membership.
    Unauthorized,
    /// Operation attempted while the ledger is paused.
    Halted,
    /// Pause/unpause called when already in the target state.
    InvalidState,
    /// Removal of a non-member.
    NotFound,
    /// Zero, non-divisible or zero-balance amount.
    InvalidAmount,
    /// Self-targeted, duplicate or zero recipient.
    InvalidRecipient,
    /// The value-transfer port refused the release.
    ReleaseFailed,
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors returned by ledger operations.
///
/// A returned error guarantees that no state mutation is observable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitterError {
    /// Caller is not the administrator.
    #[error("Ownable: caller is not the owner")]
    NotOwner { caller: Address },

    /// Caller is not an active participant.
    #[error("Splitter: only participants can use this function")]
    NotParticipant { caller: Address },

    /// Registry holds fewer active participants than the policy requires.
    #[error("Splitter: not enough participants")]
    NotEnoughParticipants { active: usize, required: usize },

    /// Mutating operation while paused.
    #[error("Pausable: paused")]
    Paused,

    /// `pause` while already paused.
    #[error("Pausable: paused")]
    AlreadyPaused,

    /// `unpause` while not paused.
    #[error("Pausable: not paused")]
    NotPaused,

    /// Removal target is not in the registry.
    #[error("Splitter: the remove target address is not a participant")]
    ParticipantNotFound { identity: Address },

    /// Split carried no value.
    #[error("Splitter: value can't be 0")]
    ZeroValue,

    /// Split value is odd.
    #[error("Splitter: splitted result is not round")]
    UnevenSplit { value: U256 },

    /// Withdrawal with nothing owed.
    #[error("Splitter: balance can't be 0")]
    ZeroBalance { identity: Address },

    /// Crediting would overflow a balance or the custody total.
    #[error("Splitter: balance overflow")]
    BalanceOverflow { identity: Address },

    /// A recipient is the caller.
    #[error("Splitter: can't split to yourself")]
    SelfSplit { caller: Address },

    /// Both recipients are the same identity.
    #[error("Splitter: _participant1 and _participant2 can't be the same")]
    DuplicateRecipient { recipient: Address },

    /// Ownership handed to the zero identity.
    #[error("Ownable: new owner is the zero address")]
    ZeroOwner,

    /// The value-transfer port failed.
    ///
    /// `restored` tells whether the amount went back to the caller's balance
    /// and custody. It is `false` only when adding it back would overflow.
    #[error("Splitter: value release failed")]
    ReleaseFailed {
        recipient: Address,
        amount: U256,
        reason: String,
        restored: bool,
    },
}

impl SplitterError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner { .. }
            | Self::NotParticipant { .. }
            | Self::NotEnoughParticipants { .. } => ErrorKind::Unauthorized,
            Self::Paused => ErrorKind::Halted,
            Self::AlreadyPaused | Self::NotPaused => ErrorKind::InvalidState,
            Self::ParticipantNotFound { .. } => ErrorKind::NotFound,
            Self::ZeroValue
            | Self::UnevenSplit { .. }
            | Self::ZeroBalance { .. }
            | Self::BalanceOverflow { .. } => ErrorKind::InvalidAmount,
            Self::SelfSplit { .. } | Self::DuplicateRecipient { .. } | Self::ZeroOwner => {
                ErrorKind::InvalidRecipient
            }
            Self::ReleaseFailed { .. } => ErrorKind::ReleaseFailed,
        }
    }
}

// =============================================================================
// TRANSFER ERRORS
// =============================================================================

/// Errors from the value-transfer port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The recipient refused the value.
    #[error("recipient rejected transfer: {0}")]
    Rejected(String),

    /// The hosting environment could not move value.
    #[error("value transfer unavailable")]
    Unavailable,
}

// =============================================================================
// TESTS
// =============================================================================
