//! # Split Ledger Service
//!
//! Wires the pure domain to the outbound ports and exposes [`SplitterApi`].
//!
//! ## Concurrency
//!
//! All mutations serialize on one `tokio::sync::RwLock<LedgerState>`. The
//! lock is never held across an outbound call: a withdrawal commits the zeroed
//! balance, releases the lock, and only then asks [`ValueTransfer`] to move
//! value. A release that re-enters the service finds nothing left to claim.
//!
//! ## Events
//!
//! Events are published after the state change commits, never for rejected
//! calls or no-ops.

use crate::adapters::{InMemoryEventLog, InMemoryPayouts};
use crate::config::SplitterConfig;
use crate::domain::entities::{CallContext, LedgerState, SplitReceipt};
use crate::domain::gates;
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::registry;
use crate::domain::split::execute_split;
use crate::domain::value_objects::{Address, U256};
use crate::domain::withdrawal::{begin_withdrawal, revert_withdrawal};
use crate::errors::SplitterError;
use crate::events::SplitterEvent;
use crate::ports::inbound::SplitterApi;
use crate::ports::outbound::{EventPublisher, ValueTransfer};

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Statistics for the split ledger service.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    /// Successful splits.
    pub splits_executed: u64,
    /// Successful withdrawals.
    pub withdrawals_executed: u64,
    /// Sum of all accepted deposits.
    pub total_deposited: U256,
    /// Sum of all released withdrawals.
    pub total_withdrawn: U256,
    /// Calls rejected with an error.
    pub rejected_calls: u64,
}

/// The split ledger service.
///
/// Generic over the value transfer and event sink so hosts can plug in a
/// settlement layer; [`create_in_memory_service`] wires the in-memory pair.
pub struct SplitterService<T: ValueTransfer, P: EventPublisher> {
    /// Service configuration.
    config: SplitterConfig,
    /// Ledger state.
    state: Arc<RwLock<LedgerState>>,
    /// Moves value out on withdrawal.
    transfer: Arc<T>,
    /// Receives committed events.
    publisher: Arc<P>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<T: ValueTransfer, P: EventPublisher> SplitterService<T, P> {
    /// Create a ledger administered by `owner`.
    ///
    /// # Errors
    ///
    /// `ZeroOwner` if `owner` is the zero address.
    pub fn new(
        owner: Address,
        transfer: Arc<T>,
        publisher: Arc<P>,
        config: SplitterConfig,
    ) -> Result<Self, SplitterError> {
        let state = LedgerState::new(owner)?;
        info!(
            owner = %owner,
            require_participant = config.policy.require_participant_caller,
            min_participants = config.policy.min_active_participants,
            "Split ledger created"
        );
        Ok(Self {
            config,
            state: Arc::new(RwLock::new(state)),
            transfer,
            publisher,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        })
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Copy of the current ledger state.
    pub async fn snapshot(&self) -> LedgerState {
        self.state.read().await.clone()
    }

    /// Active configuration.
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// The value transfer adapter.
    pub fn transfer(&self) -> &Arc<T> {
        &self.transfer
    }

    /// The event sink.
    pub fn publisher(&self) -> &Arc<P> {
        &self.publisher
    }

    /// Runs `apply` under the write lock.
    ///
    /// On success the invariants are checked before the lock drops; on
    /// failure the rejection is logged and counted.
    async fn commit<R, F>(
        &self,
        operation: &'static str,
        caller: Address,
        apply: F,
    ) -> Result<R, SplitterError>
    where
        F: FnOnce(&mut LedgerState) -> Result<R, SplitterError> + Send,
        R: Send,
    {
        let result = {
            let mut state = self.state.write().await;
            let result = apply(&mut *state);
            if result.is_ok() {
                self.verify(operation, &state);
            }
            result
        };

        match result {
            Ok(value) => Ok(value),
            Err(err) => Err(self.reject(operation, caller, err).await),
        }
    }

    fn verify(&self, operation: &'static str, state: &LedgerState) {
        if !self.config.verify_invariants {
            return;
        }
        if let InvariantCheckResult::Invalid(violations) = check_all_invariants(state) {
            for violation in &violations {
                error!(operation, violation = %violation, "Ledger invariant violated");
            }
        }
    }

    async fn reject(
        &self,
        operation: &'static str,
        caller: Address,
        err: SplitterError,
    ) -> SplitterError {
        warn!(
            operation,
            caller = %caller,
            kind = ?err.kind(),
            reason = %err,
            "Call rejected"
        );
        self.stats.write().await.rejected_calls += 1;
        err
    }
}

/// Create a service backed by in-memory payouts and event log.
///
/// # Errors
///
/// `ZeroOwner` if `owner` is the zero address.
pub fn create_in_memory_service(
    owner: Address,
    config: SplitterConfig,
) -> Result<SplitterService<InMemoryPayouts, InMemoryEventLog>, SplitterError> {
    SplitterService::new(
        owner,
        Arc::new(InMemoryPayouts::new()),
        Arc::new(InMemoryEventLog::new()),
        config,
    )
}

#[async_trait]
impl<T: ValueTransfer, P: EventPublisher> SplitterApi for SplitterService<T, P> {
    #[instrument(skip(self), fields(caller = %caller, identity = %identity))]
    async fn add_participant(
        &self,
        caller: Address,
        identity: Address,
    ) -> Result<(), SplitterError> {
        let inserted = self
            .commit("add_participant", caller, |state| {
                registry::add_participant(state, caller, identity)
            })
            .await?;

        if inserted {
            self.publisher.publish(SplitterEvent::ParticipantAdded {
                participant: identity,
            });
            info!("Participant added");
        } else {
            debug!("Participant already active");
        }
        Ok(())
    }

    #[instrument(skip(self), fields(caller = %caller, identity = %identity))]
    async fn remove_participant(
        &self,
        caller: Address,
        identity: Address,
    ) -> Result<(), SplitterError> {
        self.commit("remove_participant", caller, |state| {
            registry::remove_participant(state, caller, identity)
        })
        .await?;

        self.publisher.publish(SplitterEvent::ParticipantRemoved {
            participant: identity,
        });
        info!("Participant removed");
        Ok(())
    }

    async fn list_active_participants(&self) -> Vec<Address> {
        self.state.read().await.active_participants()
    }

    async fn is_active_participant(&self, identity: Address) -> bool {
        self.state.read().await.is_active_participant(&identity)
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn pause(&self, caller: Address) -> Result<(), SplitterError> {
        self.commit("pause", caller, |state| gates::pause(state, caller))
            .await?;

        self.publisher
            .publish(SplitterEvent::Paused { account: caller });
        warn!("Ledger paused");
        Ok(())
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn unpause(&self, caller: Address) -> Result<(), SplitterError> {
        self.commit("unpause", caller, |state| gates::unpause(state, caller))
            .await?;

        self.publisher
            .publish(SplitterEvent::Unpaused { account: caller });
        info!("Ledger unpaused");
        Ok(())
    }

    async fn is_paused(&self) -> bool {
        self.state.read().await.is_paused()
    }

    async fn owner(&self) -> Address {
        self.state.read().await.owner()
    }

    #[instrument(skip(self), fields(caller = %caller, new_owner = %new_owner))]
    async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), SplitterError> {
        let previous_owner = self
            .commit("transfer_ownership", caller, |state| {
                gates::transfer_ownership(state, caller, new_owner)
            })
            .await?;

        self.publisher.publish(SplitterEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        info!("Ownership transferred");
        Ok(())
    }

    #[instrument(
        skip(self, ctx),
        fields(caller = %ctx.caller, value = %ctx.value, recipient1 = %recipient1, recipient2 = %recipient2)
    )]
    async fn split_eth(
        &self,
        ctx: CallContext,
        recipient1: Address,
        recipient2: Address,
    ) -> Result<SplitReceipt, SplitterError> {
        let policy = &self.config.policy;
        let receipt = self
            .commit("split_eth", ctx.caller, |state| {
                execute_split(state, &ctx, policy, recipient1, recipient2)
            })
            .await?;

        {
            let mut stats = self.stats.write().await;
            stats.splits_executed += 1;
            stats.total_deposited = stats.total_deposited.saturating_add(receipt.amount);
        }

        self.publisher.publish(SplitterEvent::Split {
            sender: receipt.sender,
            recipient1: receipt.recipient1,
            recipient2: receipt.recipient2,
            amount: receipt.amount,
            share: receipt.share,
        });
        info!(share = %receipt.share, "Split credited");
        Ok(receipt)
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn withdraw(&self, caller: Address) -> Result<U256, SplitterError> {
        let withdrawal = self
            .commit("withdraw", caller, |state| begin_withdrawal(state, caller))
            .await?;

        // Lock released: the balance is already zero while value moves.
        if let Err(transfer_err) = self
            .transfer
            .release(withdrawal.recipient, withdrawal.amount)
            .await
        {
            error!(
                amount = %withdrawal.amount,
                error = %transfer_err,
                "Value release failed, restoring balance"
            );
            let restore = {
                let mut state = self.state.write().await;
                let restore = revert_withdrawal(&mut state, &withdrawal);
                self.verify("withdraw", &state);
                restore
            };
            let (reason, restored) = match restore {
                Ok(()) => (transfer_err.to_string(), true),
                Err(restore_err) => {
                    error!(error = %restore_err, "Failed to restore balance after release failure");
                    (format!("{transfer_err}; restore failed: {restore_err}"), false)
                }
            };
            let err = SplitterError::ReleaseFailed {
                recipient: withdrawal.recipient,
                amount: withdrawal.amount,
                reason,
                restored,
            };
            return Err(self.reject("withdraw", caller, err).await);
        }

        {
            let mut stats = self.stats.write().await;
            stats.withdrawals_executed += 1;
            stats.total_withdrawn = stats.total_withdrawn.saturating_add(withdrawal.amount);
        }

        self.publisher.publish(SplitterEvent::Withdrawn {
            recipient: withdrawal.recipient,
            amount: withdrawal.amount,
        });
        info!(amount = %withdrawal.amount, "Withdrawal released");
        Ok(withdrawal.amount)
    }

    async fn balance_of(&self, identity: Address) -> U256 {
        self.state.read().await.balance_of(&identity)
    }

    async fn custody(&self) -> U256 {
        self.state.read().await.custody()
    }

    async fn total_owed(&self) -> U256 {
        self.state.read().await.total_owed()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, TransferError};
    use crate::events::topics;
    use std::sync::OnceLock;

    const OWNER: Address = Address::repeat_byte(0x01);
    const ALICE: Address = Address::repeat_byte(0x0a);
    const BOB: Address = Address::repeat_byte(0x0b);
    const CAROL: Address = Address::repeat_byte(0x0c);
    const STRANGER: Address = Address::repeat_byte(0xee);

    type TestService = SplitterService<InMemoryPayouts, InMemoryEventLog>;

    async fn service_with_participants() -> TestService {
        let service = create_in_memory_service(OWNER, SplitterConfig::default()).unwrap();
        for who in [ALICE, BOB, CAROL] {
            service.add_participant(OWNER, who).await.unwrap();
        }
        service
    }

    fn deposit(caller: Address, value: u64) -> CallContext {
        CallContext::with_value(caller, U256::from(value))
    }

    #[tokio::test]
    async fn test_create_service() {
        let service = create_in_memory_service(OWNER, SplitterConfig::default()).unwrap();
        assert_eq!(service.owner().await, OWNER);
        assert!(!service.is_paused().await);
        assert_eq!(service.stats().await, ServiceStats::default());
    }

    #[tokio::test]
    async fn test_zero_owner_rejected() {
        assert!(matches!(
            create_in_memory_service(Address::ZERO, SplitterConfig::default()),
            Err(SplitterError::ZeroOwner)
        ));
    }

    #[tokio::test]
    async fn test_split_then_withdraw() {
        let service = service_with_participants().await;

        service.split_eth(deposit(ALICE, 2), BOB, CAROL).await.unwrap();
        assert_eq!(service.balance_of(BOB).await, U256::from(1));
        assert_eq!(service.custody().await, U256::from(2));

        let released = service.withdraw(BOB).await.unwrap();
        assert_eq!(released, U256::from(1));
        assert!(service.balance_of(BOB).await.is_zero());
        assert_eq!(service.transfer().received(&BOB), U256::from(1));
        assert_eq!(service.custody().await, U256::from(1));

        let stats = service.stats().await;
        assert_eq!(stats.splits_executed, 1);
        assert_eq!(stats.withdrawals_executed, 1);
        assert_eq!(stats.total_deposited, U256::from(2));
        assert_eq!(stats.total_withdrawn, U256::from(1));
    }

    #[tokio::test]
    async fn test_events_published_after_commit() {
        let service = service_with_participants().await;
        service.split_eth(deposit(ALICE, 4), BOB, CAROL).await.unwrap();
        service.withdraw(CAROL).await.unwrap();

        let log = service.publisher();
        assert_eq!(log.by_topic(topics::PARTICIPANT_ADDED).len(), 3);
        assert_eq!(
            log.by_topic(topics::SPLIT),
            vec![SplitterEvent::Split {
                sender: ALICE,
                recipient1: BOB,
                recipient2: CAROL,
                amount: U256::from(4),
                share: U256::from(2),
            }]
        );
        assert_eq!(
            log.by_topic(topics::WITHDRAWN),
            vec![SplitterEvent::Withdrawn {
                recipient: CAROL,
                amount: U256::from(2),
            }]
        );
    }

    #[tokio::test]
    async fn test_rejections_publish_nothing_and_count() {
        let service = service_with_participants().await;
        let before = service.publisher().len();

        assert_eq!(
            service.split_eth(deposit(ALICE, 3), BOB, CAROL).await,
            Err(SplitterError::UnevenSplit {
                value: U256::from(3)
            })
        );
        assert_eq!(
            service.add_participant(STRANGER, STRANGER).await,
            Err(SplitterError::NotOwner { caller: STRANGER })
        );
        assert_eq!(
            service.withdraw(ALICE).await,
            Err(SplitterError::ZeroBalance { identity: ALICE })
        );

        assert_eq!(service.publisher().len(), before);
        assert_eq!(service.stats().await.rejected_calls, 3);
    }

    #[tokio::test]
    async fn test_readd_emits_no_event() {
        let service = service_with_participants().await;
        service.add_participant(OWNER, ALICE).await.unwrap();
        assert_eq!(
            service.publisher().by_topic(topics::PARTICIPANT_ADDED).len(),
            3
        );
    }

    #[tokio::test]
    async fn test_pause_blocks_mutations_not_queries() {
        let service = service_with_participants().await;
        service.split_eth(deposit(ALICE, 2), BOB, CAROL).await.unwrap();
        service.pause(OWNER).await.unwrap();

        assert_eq!(
            service.split_eth(deposit(ALICE, 2), BOB, CAROL).await,
            Err(SplitterError::Paused)
        );
        assert_eq!(service.withdraw(BOB).await, Err(SplitterError::Paused));
        assert_eq!(
            service.add_participant(OWNER, STRANGER).await,
            Err(SplitterError::Paused)
        );
        assert_eq!(service.balance_of(BOB).await, U256::from(1));
        assert_eq!(service.list_active_participants().await.len(), 3);

        service.unpause(OWNER).await.unwrap();
        assert_eq!(service.withdraw(BOB).await, Ok(U256::from(1)));
    }

    #[tokio::test]
    async fn test_release_failure_restores_balance() {
        let service = service_with_participants().await;
        service.split_eth(deposit(ALICE, 10), BOB, CAROL).await.unwrap();
        service.transfer().set_failing(true);

        let err = service.withdraw(BOB).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReleaseFailed);
        assert_eq!(err.to_string(), "Splitter: value release failed");
        assert!(matches!(
            err,
            SplitterError::ReleaseFailed { restored: true, .. }
        ));
        assert_eq!(service.balance_of(BOB).await, U256::from(5));
        assert_eq!(service.custody().await, U256::from(10));
        assert!(service.publisher().by_topic(topics::WITHDRAWN).is_empty());

        service.transfer().set_failing(false);
        assert_eq!(service.withdraw(BOB).await, Ok(U256::from(5)));
    }

    #[tokio::test]
    async fn test_ownership_transfer() {
        let service = service_with_participants().await;
        service.transfer_ownership(OWNER, ALICE).await.unwrap();

        assert_eq!(service.owner().await, ALICE);
        assert_eq!(
            service.pause(OWNER).await,
            Err(SplitterError::NotOwner { caller: OWNER })
        );
        service.pause(ALICE).await.unwrap();
        assert_eq!(
            service.publisher().by_topic(topics::OWNERSHIP_TRANSFERRED),
            vec![SplitterEvent::OwnershipTransferred {
                previous_owner: OWNER,
                new_owner: ALICE,
            }]
        );
    }

    /// Sink that calls back into the ledger before accepting value.
    struct ReentrantSink {
        ledger: OnceLock<Arc<SplitterService<ReentrantSink, InMemoryEventLog>>>,
        inner_results: parking_lot::Mutex<Vec<Result<U256, SplitterError>>>,
    }

    #[async_trait]
    impl ValueTransfer for ReentrantSink {
        async fn release(&self, recipient: Address, _amount: U256) -> Result<(), TransferError> {
            let ledger = self.ledger.get().ok_or(TransferError::Unavailable)?;
            let nested = ledger.withdraw(recipient).await;
            self.inner_results.lock().push(nested);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_reentrant_withdraw_finds_zero_balance() {
        let sink = Arc::new(ReentrantSink {
            ledger: OnceLock::new(),
            inner_results: parking_lot::Mutex::new(Vec::new()),
        });
        let service = Arc::new(
            SplitterService::new(
                OWNER,
                Arc::clone(&sink),
                Arc::new(InMemoryEventLog::new()),
                SplitterConfig::default(),
            )
            .unwrap(),
        );
        assert!(sink.ledger.set(Arc::clone(&service)).is_ok());

        service.add_participant(OWNER, ALICE).await.unwrap();
        service.split_eth(deposit(ALICE, 8), BOB, CAROL).await.unwrap();

        assert_eq!(service.withdraw(BOB).await, Ok(U256::from(4)));
        assert_eq!(
            sink.inner_results.lock().clone(),
            vec![Err(SplitterError::ZeroBalance { identity: BOB })]
        );
        assert!(service.balance_of(BOB).await.is_zero());
        assert_eq!(service.custody().await, U256::from(4));
        assert_eq!(service.stats().await.withdrawals_executed, 1);
    }

    /// Sink that deposits a near-max split before refusing the release.
    struct FloodingSink {
        ledger: OnceLock<Arc<SplitterService<FloodingSink, InMemoryEventLog>>>,
    }

    #[async_trait]
    impl ValueTransfer for FloodingSink {
        async fn release(&self, _recipient: Address, _amount: U256) -> Result<(), TransferError> {
            let ledger = self.ledger.get().ok_or(TransferError::Unavailable)?;
            let flood = CallContext::with_value(ALICE, U256::MAX - U256::from(5));
            ledger
                .split_eth(flood, BOB, CAROL)
                .await
                .map_err(|e| TransferError::Rejected(e.to_string()))?;
            Err(TransferError::Rejected("refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_release_failure_reports_unrestored_balance() {
        let sink = Arc::new(FloodingSink {
            ledger: OnceLock::new(),
        });
        let service = Arc::new(
            SplitterService::new(
                OWNER,
                Arc::clone(&sink),
                Arc::new(InMemoryEventLog::new()),
                SplitterConfig::default(),
            )
            .unwrap(),
        );
        assert!(sink.ledger.set(Arc::clone(&service)).is_ok());

        service.add_participant(OWNER, ALICE).await.unwrap();
        service.split_eth(deposit(ALICE, 8), BOB, CAROL).await.unwrap();

        let err = service.withdraw(BOB).await.unwrap_err();
        match err {
            SplitterError::ReleaseFailed {
                recipient,
                amount,
                reason,
                restored,
            } => {
                assert_eq!(recipient, BOB);
                assert_eq!(amount, U256::from(4));
                assert!(!restored);
                assert!(reason.contains("restore failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let half = (U256::MAX - U256::from(5)) / 2;
        assert_eq!(service.balance_of(BOB).await, half);
        assert_eq!(service.balance_of(CAROL).await, half + U256::from(4));
        assert_eq!(service.custody().await, U256::MAX - U256::from(1));
        assert_eq!(service.total_owed().await, service.custody().await);
        assert!(service.publisher().by_topic(topics::WITHDRAWN).is_empty());
        assert_eq!(service.stats().await.withdrawals_executed, 0);
    }

    #[tokio::test]
    async fn test_concurrent_splits_conserve_value() {
        let service = Arc::new(service_with_participants().await);
        let mut handles = Vec::new();
        for _ in 0..32 {
            let svc = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                svc.split_eth(deposit(ALICE, 2), BOB, CAROL).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.balance_of(BOB).await, U256::from(32));
        assert_eq!(service.custody().await, U256::from(64));
        assert_eq!(service.total_owed().await, service.custody().await);
    }
}
