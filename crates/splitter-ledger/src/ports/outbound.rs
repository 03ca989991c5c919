//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the ledger depends on:
//! - Value release to an external identity (the hosting environment)
//! - Event publication
//!
//! Dependencies point INWARD: adapters implement these traits.

use crate::domain::value_objects::{Address, U256};
use crate::errors::TransferError;
use crate::events::SplitterEvent;
use async_trait::async_trait;

// =============================================================================
// VALUE TRANSFER
// =============================================================================

/// Moves value out of the ledger's custody to an external identity.
///
/// ## Implementation Notes
///
/// The ledger calls this with its own state lock released and the
/// recipient's balance already zeroed. Implementations may call back into the
/// ledger; they will observe the post-withdrawal state.
#[async_trait]
pub trait ValueTransfer: Send + Sync {
    /// Release `amount` to `recipient`.
    ///
    /// Returning `Err` makes the ledger restore the balance.
    async fn release(&self, recipient: Address, amount: U256) -> Result<(), TransferError>;
}

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Sink for committed-state events.
pub trait EventPublisher: Send + Sync {
    /// Publish one event. Must not fail the originating call.
    fn publish(&self, event: SplitterEvent);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    // Mock implementation for testing
    struct MockTransfer {
        calls: Mutex<Vec<(Address, U256)>>,
    }

    #[async_trait]
    impl ValueTransfer for MockTransfer {
        async fn release(&self, recipient: Address, amount: U256) -> Result<(), TransferError> {
            self.calls.lock().push((recipient, amount));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_mock_transfer() {
        let transfer = MockTransfer {
            calls: Mutex::new(Vec::new()),
        };
        let who = Address::repeat_byte(1);

        transfer.release(who, U256::from(7)).await.unwrap();

        assert_eq!(transfer.calls.lock().as_slice(), &[(who, U256::from(7))]);
    }
}
