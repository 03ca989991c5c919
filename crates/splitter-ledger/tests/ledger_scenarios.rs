//! # Split Ledger Scenario Tests
//!
//! Drives the ledger only through `SplitterApi`, the way a host would.

use std::sync::Arc;

use splitter_ledger::prelude::*;

const OWNER: Address = Address::repeat_byte(0x01);
const A: Address = Address::repeat_byte(0xaa);
const B: Address = Address::repeat_byte(0xbb);
const C: Address = Address::repeat_byte(0xcc);
const OUTSIDER: Address = Address::repeat_byte(0xee);

type Ledger = SplitterService<InMemoryPayouts, InMemoryEventLog>;

fn ledger() -> Ledger {
    create_in_memory_service(OWNER, SplitterConfig::default()).unwrap()
}

async fn ledger_with_abc() -> Ledger {
    let ledger = ledger();
    for who in [A, B, C] {
        ledger.add_participant(OWNER, who).await.unwrap();
    }
    ledger
}

fn pay(caller: Address, value: u64) -> CallContext {
    CallContext::with_value(caller, U256::from(value))
}

#[tokio::test]
async fn test_split_withdraw_scenario() {
    let ledger = ledger_with_abc().await;

    ledger.split_eth(pay(A, 2), B, C).await.unwrap();
    assert_eq!(ledger.balance_of(B).await, U256::from(1));
    assert_eq!(ledger.balance_of(C).await, U256::from(1));

    assert_eq!(ledger.withdraw(B).await, Ok(U256::from(1)));
    assert!(ledger.balance_of(B).await.is_zero());
    assert_eq!(ledger.transfer().received(&B), U256::from(1));

    let err = ledger.withdraw(B).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    assert_eq!(err.to_string(), "Splitter: balance can't be 0");
}

#[tokio::test]
async fn test_invalid_recipients() {
    let ledger = ledger_with_abc().await;

    let self_split = ledger.split_eth(pay(A, 2), B, A).await.unwrap_err();
    assert_eq!(self_split.kind(), ErrorKind::InvalidRecipient);
    assert_eq!(self_split.to_string(), "Splitter: can't split to yourself");

    let duplicate = ledger.split_eth(pay(A, 2), B, B).await.unwrap_err();
    assert_eq!(duplicate.kind(), ErrorKind::InvalidRecipient);

    assert!(ledger.total_owed().await.is_zero());
    assert!(ledger.custody().await.is_zero());
}

#[tokio::test]
async fn test_amount_validation() {
    let ledger = ledger_with_abc().await;

    let zero = ledger.split_eth(pay(A, 0), B, C).await.unwrap_err();
    assert_eq!(zero.kind(), ErrorKind::InvalidAmount);
    assert_eq!(zero.to_string(), "Splitter: value can't be 0");

    let odd = ledger.split_eth(pay(A, 7), B, C).await.unwrap_err();
    assert_eq!(odd.kind(), ErrorKind::InvalidAmount);
    assert_eq!(odd.to_string(), "Splitter: splitted result is not round");

    let receipt = ledger.split_eth(pay(A, 1_000), B, C).await.unwrap();
    assert_eq!(receipt.share, U256::from(500));
    assert_eq!(ledger.total_owed().await, U256::from(1_000));
}

#[tokio::test]
async fn test_only_administrator_mutates_registry_and_gate() {
    let ledger = ledger_with_abc().await;

    for result in [
        ledger.add_participant(A, OUTSIDER).await,
        ledger.remove_participant(A, B).await,
        ledger.pause(A).await,
        ledger.transfer_ownership(A, A).await,
    ] {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.to_string(), "Ownable: caller is not the owner");
    }

    assert_eq!(ledger.list_active_participants().await, vec![A, B, C]);
    assert!(!ledger.is_paused().await);
    assert_eq!(ledger.owner().await, OWNER);

    ledger.pause(OWNER).await.unwrap();
    assert_eq!(
        ledger.unpause(A).await.unwrap_err().kind(),
        ErrorKind::Unauthorized
    );
    assert!(ledger.is_paused().await);
}

#[tokio::test]
async fn test_pause_halts_then_unpause_restores() {
    let ledger = ledger_with_abc().await;
    ledger.pause(OWNER).await.unwrap();

    for err in [
        ledger.split_eth(pay(A, 2), B, C).await.unwrap_err(),
        ledger.add_participant(OWNER, OUTSIDER).await.unwrap_err(),
        ledger.remove_participant(OWNER, A).await.unwrap_err(),
    ] {
        assert_eq!(err.kind(), ErrorKind::Halted);
        assert_eq!(err.to_string(), "Pausable: paused");
    }

    assert_eq!(
        ledger.pause(OWNER).await.unwrap_err().kind(),
        ErrorKind::InvalidState
    );

    ledger.unpause(OWNER).await.unwrap();
    assert_eq!(
        ledger.unpause(OWNER).await.unwrap_err().kind(),
        ErrorKind::InvalidState
    );
    ledger.split_eth(pay(A, 2), B, C).await.unwrap();
}

#[tokio::test]
async fn test_remove_absent_participant() {
    let ledger = ledger_with_abc().await;

    ledger.remove_participant(OWNER, C).await.unwrap();
    let err = ledger.remove_participant(OWNER, C).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.to_string(),
        "Splitter: the remove target address is not a participant"
    );

    let err = ledger.split_eth(pay(C, 2), A, B).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.to_string(), "Splitter: only participants can use this function");
}

#[tokio::test]
async fn test_listing_is_sorted() {
    let ledger = ledger();
    for who in [C, A, B] {
        ledger.add_participant(OWNER, who).await.unwrap();
    }
    ledger.add_participant(OWNER, A).await.unwrap();

    assert_eq!(ledger.list_active_participants().await, vec![A, B, C]);
    assert!(ledger.is_active_participant(B).await);
    assert!(!ledger.is_active_participant(OUTSIDER).await);
}

#[tokio::test]
async fn test_minimum_participants_policy() {
    let mut config = SplitterConfig::default();
    config.policy.min_active_participants = 3;
    let ledger = create_in_memory_service(OWNER, config).unwrap();
    ledger.add_participant(OWNER, A).await.unwrap();
    ledger.add_participant(OWNER, B).await.unwrap();

    let err = ledger.split_eth(pay(A, 2), B, C).await.unwrap_err();
    assert_eq!(err.to_string(), "Splitter: not enough participants");

    ledger.add_participant(OWNER, C).await.unwrap();
    ledger.split_eth(pay(A, 2), B, C).await.unwrap();
}

#[tokio::test]
async fn test_open_policy_splits_without_registry() {
    let mut config = SplitterConfig::default();
    config.policy.require_participant_caller = false;
    let ledger = create_in_memory_service(OWNER, config).unwrap();

    ledger.split_eth(pay(A, 2), B, C).await.unwrap();
    assert!(ledger.list_active_participants().await.is_empty());
    assert_eq!(ledger.balance_of(B).await, U256::from(1));
    assert_eq!(ledger.withdraw(C).await, Ok(U256::from(1)));

    let duplicate = ledger.split_eth(pay(A, 2), B, B).await.unwrap_err();
    assert_eq!(
        duplicate.to_string(),
        "Splitter: _participant1 and _participant2 can't be the same"
    );
}

#[tokio::test]
async fn test_event_stream_matches_history() {
    let ledger = ledger_with_abc().await;
    ledger.split_eth(pay(A, 4), B, C).await.unwrap();
    ledger.pause(OWNER).await.unwrap();
    ledger.unpause(OWNER).await.unwrap();
    ledger.withdraw(C).await.unwrap();
    ledger.remove_participant(OWNER, A).await.unwrap();

    let topics_seen: Vec<&str> = ledger
        .publisher()
        .events()
        .iter()
        .map(SplitterEvent::topic)
        .collect();
    assert_eq!(
        topics_seen,
        vec![
            topics::PARTICIPANT_ADDED,
            topics::PARTICIPANT_ADDED,
            topics::PARTICIPANT_ADDED,
            topics::SPLIT,
            topics::PAUSED,
            topics::UNPAUSED,
            topics::WITHDRAWN,
            topics::PARTICIPANT_REMOVED,
        ]
    );
}

/// Value sink that re-enters the ledger before accepting the payment.
struct GreedySink {
    ledger: std::sync::OnceLock<Arc<SplitterService<GreedySink, InMemoryEventLog>>>,
    attempts: std::sync::Mutex<Vec<Result<U256, SplitterError>>>,
}

#[async_trait::async_trait]
impl ValueTransfer for GreedySink {
    async fn release(&self, recipient: Address, _amount: U256) -> Result<(), TransferError> {
        let Some(ledger) = self.ledger.get() else {
            return Err(TransferError::Unavailable);
        };
        for _ in 0..3 {
            let again = ledger.withdraw(recipient).await;
            if let Ok(mut attempts) = self.attempts.lock() {
                attempts.push(again);
            }
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_reentrant_withdrawals_claim_nothing() {
    let sink = Arc::new(GreedySink {
        ledger: std::sync::OnceLock::new(),
        attempts: std::sync::Mutex::new(Vec::new()),
    });
    let ledger = Arc::new(
        SplitterService::new(
            OWNER,
            Arc::clone(&sink),
            Arc::new(InMemoryEventLog::new()),
            SplitterConfig::default(),
        )
        .unwrap(),
    );
    assert!(sink.ledger.set(Arc::clone(&ledger)).is_ok());

    ledger.add_participant(OWNER, A).await.unwrap();
    ledger.split_eth(pay(A, 6), B, C).await.unwrap();

    assert_eq!(ledger.withdraw(B).await, Ok(U256::from(3)));

    let attempts = sink.attempts.lock().unwrap().clone();
    assert_eq!(attempts.len(), 3);
    assert!(attempts
        .iter()
        .all(|r| *r == Err(SplitterError::ZeroBalance { identity: B })));
    assert_eq!(ledger.custody().await, U256::from(3));
    assert_eq!(ledger.balance_of(C).await, U256::from(3));
    assert!(check_all_invariants(&ledger.snapshot().await).is_valid());
}

#[tokio::test]
async fn test_failed_release_is_retriable() {
    let ledger = ledger_with_abc().await;
    ledger.split_eth(pay(A, 2), B, C).await.unwrap();

    ledger.transfer().set_failing(true);
    let err = ledger.withdraw(C).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReleaseFailed);
    assert_eq!(ledger.balance_of(C).await, U256::from(1));

    ledger.transfer().set_failing(false);
    assert_eq!(ledger.withdraw(C).await, Ok(U256::from(1)));
    assert_eq!(ledger.transfer().history(), vec![(C, U256::from(1))]);
}
