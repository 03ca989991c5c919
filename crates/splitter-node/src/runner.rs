//! # Script Runner
//!
//! Replays a [`Script`] against a fresh in-memory ledger. Rejected calls are
//! recorded and the replay continues; the summary reports every outcome and
//! the final ledger state.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument, warn};

use splitter_ledger::prelude::*;

use crate::script::{Call, Script};

/// Result of one replayed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallOutcome {
    /// Position in the script.
    pub index: usize,
    /// Operation name.
    pub op: &'static str,
    /// Issuing identity.
    pub caller: Address,
    /// Whether the call succeeded.
    pub ok: bool,
    /// Share credited (splits) or amount released (withdrawals), decimal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A value release observed by the payout adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    /// Receiving identity.
    pub recipient: Address,
    /// Decimal amount.
    pub amount: String,
}

/// Final ledger state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Administrator at the end of the run.
    pub owner: Address,
    /// Pause switch at the end of the run.
    pub paused: bool,
    /// Active participants, ascending.
    pub participants: Vec<Address>,
    /// Non-zero balances, decimal.
    pub balances: BTreeMap<Address, String>,
    /// Value held by the ledger, decimal.
    pub custody: String,
    /// Releases in order.
    pub payouts: Vec<Payout>,
    /// Per-call outcomes.
    pub outcomes: Vec<CallOutcome>,
    /// Committed events in order.
    pub events: Vec<SplitterEvent>,
    /// Service counters.
    pub stats: ServiceStats,
}

impl RunSummary {
    /// Number of calls that were rejected.
    #[must_use]
    pub fn failed_calls(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.ok).count()
    }
}

/// Replay `script` against a new ledger built from `config`.
#[instrument(skip_all, fields(owner = %script.owner, calls = script.calls.len()))]
pub async fn run_script(script: &Script, config: SplitterConfig) -> Result<RunSummary> {
    let ledger =
        create_in_memory_service(script.owner, config).context("Failed to create ledger")?;

    let mut outcomes = Vec::with_capacity(script.calls.len());
    for (index, call) in script.calls.iter().enumerate() {
        let result = apply_call(&ledger, call).await;
        match &result {
            Ok(_) => info!(index, op = call.name(), "Call applied"),
            Err(err) => warn!(index, op = call.name(), error = %err, "Call rejected"),
        }
        outcomes.push(outcome(index, call, result));
    }

    Ok(summarize(&ledger, outcomes).await)
}

/// Dispatch one call through the public API.
///
/// Returns the amount the call moved, if any.
pub async fn apply_call<A>(api: &A, call: &Call) -> Result<Option<U256>, SplitterError>
where
    A: SplitterApi + ?Sized,
{
    match *call {
        Call::AddParticipant { caller, identity } => {
            api.add_participant(caller, identity).await.map(|()| None)
        }
        Call::RemoveParticipant { caller, identity } => {
            api.remove_participant(caller, identity).await.map(|()| None)
        }
        Call::Pause { caller } => api.pause(caller).await.map(|()| None),
        Call::Unpause { caller } => api.unpause(caller).await.map(|()| None),
        Call::TransferOwnership { caller, new_owner } => api
            .transfer_ownership(caller, new_owner)
            .await
            .map(|()| None),
        Call::SplitEth {
            caller,
            value,
            recipient1,
            recipient2,
        } => api
            .split_eth(CallContext::with_value(caller, value), recipient1, recipient2)
            .await
            .map(|receipt| Some(receipt.share)),
        Call::Withdraw { caller } => api.withdraw(caller).await.map(Some),
    }
}

fn outcome(index: usize, call: &Call, result: Result<Option<U256>, SplitterError>) -> CallOutcome {
    let (ok, amount, error, kind) = match result {
        Ok(amount) => (true, amount.map(|a| a.to_string()), None, None),
        Err(err) => (
            false,
            None,
            Some(err.to_string()),
            Some(format!("{:?}", err.kind())),
        ),
    };
    CallOutcome {
        index,
        op: call.name(),
        caller: call.caller(),
        ok,
        amount,
        error,
        kind,
    }
}

async fn summarize(
    ledger: &SplitterService<InMemoryPayouts, InMemoryEventLog>,
    outcomes: Vec<CallOutcome>,
) -> RunSummary {
    let state = ledger.snapshot().await;
    let balances = state
        .balances()
        .map(|(who, amount)| (*who, amount.to_string()))
        .collect();
    let payouts = ledger
        .transfer()
        .history()
        .into_iter()
        .map(|(recipient, amount)| Payout {
            recipient,
            amount: amount.to_string(),
        })
        .collect();

    RunSummary {
        owner: state.owner(),
        paused: state.is_paused(),
        participants: state.active_participants(),
        balances,
        custody: state.custody().to_string(),
        payouts,
        outcomes,
        events: ledger.publisher().events(),
        stats: ledger.stats().await,
    }
}

// =============================================================================
// TESTS
// =============================================================================
