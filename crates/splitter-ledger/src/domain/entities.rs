//! # Core Domain Entities
//!
//! The ledger state and the records produced by its operations.

use crate::domain::value_objects::{Address, U256};
use crate::errors::SplitterError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// CALL CONTEXT
// =============================================================================

/// Who is calling, and how much value the call carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Authenticated caller identity.
    pub caller: Address,
    /// Value attached to the call (zero for non-payable calls).
    pub value: U256,
}

impl CallContext {
    /// A call that carries no value.
    #[must_use]
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::zero(),
        }
    }

    /// A payable call carrying `value`.
    #[must_use]
    pub fn with_value(caller: Address, value: U256) -> Self {
        Self { caller, value }
    }
}

// =============================================================================
// PAUSE GATE
// =============================================================================

/// Operational state of the pause switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    /// Mutations allowed.
    #[default]
    Active,
    /// All gated mutations fail with `Halted`.
    Paused,
}

// =============================================================================
// SPLIT POLICY
// =============================================================================

/// Eligibility rules for initiating a split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitPolicy {
    /// Caller must be an active participant.
    pub require_participant_caller: bool,
    /// Minimum number of active participants before any split; 0 disables.
    pub min_active_participants: usize,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            require_participant_caller: true,
            min_active_participants: 0,
        }
    }
}

// =============================================================================
// LEDGER STATE
// =============================================================================

/// The complete ledger state.
///
/// ## Invariants
/// - `owner` is never the zero address
/// - `participants` holds no duplicates (it is a set)
/// - sum of `balances` never exceeds `custody`
/// - `balances` never retains a zero entry
#[derive(Clone, Debug)]
pub struct LedgerState {
    pub(crate) owner: Address,
    pub(crate) gate: GateState,
    pub(crate) participants: BTreeSet<Address>,
    pub(crate) balances: HashMap<Address, U256>,
    pub(crate) custody: U256,
}

impl LedgerState {
    /// Creates an empty, active ledger administered by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ZeroOwner` if `owner` is the zero address.
    pub fn new(owner: Address) -> Result<Self, SplitterError> {
        if owner.is_zero() {
            return Err(SplitterError::ZeroOwner);
        }
        Ok(Self {
            owner,
            gate: GateState::Active,
            participants: BTreeSet::new(),
            balances: HashMap::new(),
            custody: U256::zero(),
        })
    }

    /// Current administrator.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Current pause-gate state.
    #[must_use]
    pub fn gate(&self) -> GateState {
        self.gate
    }

    /// Returns true if the pause switch is on.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.gate == GateState::Paused
    }

    /// Returns true if `identity` is in the registry.
    #[must_use]
    pub fn is_active_participant(&self, identity: &Address) -> bool {
        self.participants.contains(identity)
    }

    /// Active participants in ascending byte order.
    #[must_use]
    pub fn active_participants(&self) -> Vec<Address> {
        self.participants.iter().copied().collect()
    }

    /// Number of active participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Amount owed to `identity` (zero if never credited).
    #[must_use]
    pub fn balance_of(&self, identity: &Address) -> U256 {
        self.balances.get(identity).copied().unwrap_or_default()
    }

    /// Nonzero balance entries.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &U256)> {
        self.balances.iter()
    }

    /// Value currently held by the ledger.
    #[must_use]
    pub fn custody(&self) -> U256 {
        self.custody
    }

    /// Sum of all balance entries (saturating).
    #[must_use]
    pub fn total_owed(&self) -> U256 {
        self.balances
            .values()
            .fold(U256::zero(), |acc, v| acc.saturating_add(*v))
    }
}

// =============================================================================
// OPERATION RECORDS
// =============================================================================

/// Result of a successful split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitReceipt {
    /// Depositor.
    pub sender: Address,
    /// First credited identity.
    pub recipient1: Address,
    /// Second credited identity.
    pub recipient2: Address,
    /// Total value deposited.
    pub amount: U256,
    /// Amount credited to each recipient (`amount / 2`).
    pub share: U256,
}

/// A balance that has been zeroed and is pending release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Withdrawal {
    /// Identity being paid.
    pub recipient: Address,
    /// Amount taken out of the ledger.
    pub amount: U256,
}

// =============================================================================
// TESTS
// =============================================================================
