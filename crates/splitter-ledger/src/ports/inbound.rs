//! # Driving Ports (API - Inbound)
//!
//! The public surface of the split ledger. Hosts (the node binary, tests,
//! an RPC layer) drive the ledger exclusively through [`SplitterApi`].

use crate::domain::entities::{CallContext, SplitReceipt};
use crate::domain::value_objects::{Address, U256};
use crate::errors::SplitterError;
use async_trait::async_trait;

// =============================================================================
// SPLITTER API (Primary Driving Port)
// =============================================================================

/// Primary API for the split ledger.
///
/// Mutating calls take the authenticated caller. Queries never fail and are
/// available while paused.
///
/// ## Usage
///
/// ```ignore
/// api.add_participant(owner, alice).await?;
/// api.split_eth(CallContext::with_value(alice, U256::from(2)), bob, carol).await?;
/// let released = api.withdraw(bob).await?;
/// ```
#[async_trait]
pub trait SplitterApi: Send + Sync {
    // === Registry ===

    /// Whitelist `identity`. Administrator only; re-adding is a no-op.
    async fn add_participant(&self, caller: Address, identity: Address)
        -> Result<(), SplitterError>;

    /// De-list `identity`. Administrator only.
    async fn remove_participant(
        &self,
        caller: Address,
        identity: Address,
    ) -> Result<(), SplitterError>;

    /// Active participants in ascending byte order.
    async fn list_active_participants(&self) -> Vec<Address>;

    /// Membership check.
    async fn is_active_participant(&self, identity: Address) -> bool;

    // === Pause gate ===

    /// Halt all gated mutations. Administrator only.
    async fn pause(&self, caller: Address) -> Result<(), SplitterError>;

    /// Resume operation. Administrator only.
    async fn unpause(&self, caller: Address) -> Result<(), SplitterError>;

    /// Pause switch state.
    async fn is_paused(&self) -> bool;

    // === Ownership ===

    /// Current administrator.
    async fn owner(&self) -> Address;

    /// Hand the administrator role to `new_owner`.
    async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), SplitterError>;

    // === Ledger ===

    /// Deposit `ctx.value` and credit half to each recipient.
    async fn split_eth(
        &self,
        ctx: CallContext,
        recipient1: Address,
        recipient2: Address,
    ) -> Result<SplitReceipt, SplitterError>;

    /// Claim the caller's whole balance. Returns the amount released.
    async fn withdraw(&self, caller: Address) -> Result<U256, SplitterError>;

    /// Amount owed to `identity`.
    async fn balance_of(&self, identity: Address) -> U256;

    /// Value held by the ledger.
    async fn custody(&self) -> U256;

    /// Sum of all balances.
    async fn total_owed(&self) -> U256;
}
