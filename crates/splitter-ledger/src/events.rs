//! # Event Schema
//!
//! Observability events emitted after each successful mutation.
//! Published through the [`EventPublisher`](crate::ports::outbound::EventPublisher)
//! port; failed calls publish nothing.

use crate::domain::value_objects::{Address, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// LEDGER EVENTS
// =============================================================================

/// A state change committed by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SplitterEvent {
    /// Identity joined the registry.
    ParticipantAdded {
        /// New participant.
        participant: Address,
    },
    /// Identity left the registry.
    ParticipantRemoved {
        /// Removed participant.
        participant: Address,
    },
    /// Pause switch turned on.
    Paused {
        /// Administrator who paused.
        account: Address,
    },
    /// Pause switch turned off.
    Unpaused {
        /// Administrator who unpaused.
        account: Address,
    },
    /// A deposit was split between two recipients.
    Split {
        /// Depositor.
        sender: Address,
        /// First recipient.
        recipient1: Address,
        /// Second recipient.
        recipient2: Address,
        /// Total deposited.
        amount: U256,
        /// Credited to each recipient.
        share: U256,
    },
    /// A balance was released to its owner.
    Withdrawn {
        /// Identity paid.
        recipient: Address,
        /// Amount released.
        amount: U256,
    },
    /// Administrator role changed hands.
    OwnershipTransferred {
        /// Former administrator.
        previous_owner: Address,
        /// New administrator.
        new_owner: Address,
    },
}

impl SplitterEvent {
    /// Bus topic for this event.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::ParticipantAdded { .. } => topics::PARTICIPANT_ADDED,
            Self::ParticipantRemoved { .. } => topics::PARTICIPANT_REMOVED,
            Self::Paused { .. } => topics::PAUSED,
            Self::Unpaused { .. } => topics::UNPAUSED,
            Self::Split { .. } => topics::SPLIT,
            Self::Withdrawn { .. } => topics::WITHDRAWN,
            Self::OwnershipTransferred { .. } => topics::OWNERSHIP_TRANSFERRED,
        }
    }
}

// =============================================================================
// EVENT BUS TOPICS
// =============================================================================

/// Event topics for the split ledger.
pub mod topics {
    /// Participant added to the registry.
    pub const PARTICIPANT_ADDED: &str = "splitter.registry.added";

    /// Participant removed from the registry.
    pub const PARTICIPANT_REMOVED: &str = "splitter.registry.removed";

    /// Ledger paused.
    pub const PAUSED: &str = "splitter.gate.paused";

    /// Ledger unpaused.
    pub const UNPAUSED: &str = "splitter.gate.unpaused";

    /// Deposit split.
    pub const SPLIT: &str = "splitter.ledger.split";

    /// Balance withdrawn.
    pub const WITHDRAWN: &str = "splitter.ledger.withdrawn";

    /// Ownership transferred.
    pub const OWNERSHIP_TRANSFERRED: &str = "splitter.owner.transferred";
}

// =============================================================================
// TESTS
// =============================================================================
