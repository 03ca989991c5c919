//! # In-Memory Payouts
//!
//! `ValueTransfer` adapter that records releases instead of moving real value.
//! A production host would hand the release to its settlement layer.

use crate::domain::value_objects::{Address, U256};
use crate::errors::TransferError;
use crate::ports::outbound::ValueTransfer;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Records every release; can be switched into a failing mode.
#[derive(Debug, Default)]
pub struct InMemoryPayouts {
    /// Total released per identity.
    received: RwLock<HashMap<Address, U256>>,
    /// Releases in order.
    history: RwLock<Vec<(Address, U256)>>,
    /// When set, every release is rejected.
    failing: AtomicBool,
}

impl InMemoryPayouts {
    /// Create an empty payout recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent releases fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Total released to `identity` so far.
    #[must_use]
    pub fn received(&self, identity: &Address) -> U256 {
        self.received
            .read()
            .get(identity)
            .copied()
            .unwrap_or_default()
    }

    /// All releases in order.
    #[must_use]
    pub fn history(&self) -> Vec<(Address, U256)> {
        self.history.read().clone()
    }
}

#[async_trait]
impl ValueTransfer for InMemoryPayouts {
    async fn release(&self, recipient: Address, amount: U256) -> Result<(), TransferError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransferError::Rejected(format!(
                "release to {recipient} refused"
            )));
        }

        {
            let mut received = self.received.write();
            let total = received.entry(recipient).or_default();
            *total = total.saturating_add(amount);
        }
        self.history.write().push((recipient, amount));
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
