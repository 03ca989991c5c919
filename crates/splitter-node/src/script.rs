//! # Call Scripts
//!
//! A script names the administrator and lists the calls to replay, in order:
//!
//! ```json
//! {
//!   "owner": "0x0101010101010101010101010101010101010101",
//!   "calls": [
//!     { "op": "add_participant", "caller": "0x01..", "identity": "0xaa.." },
//!     { "op": "split_eth", "caller": "0xaa..", "value": "2",
//!       "recipient1": "0xbb..", "recipient2": "0xcc.." },
//!     { "op": "withdraw", "caller": "0xbb.." }
//!   ]
//! }
//! ```
//!
//! `value` accepts a JSON integer, a decimal string or a `0x` hex string.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{de, Deserialize, Deserializer};
use splitter_ledger::prelude::{Address, U256};

/// A replayable sequence of ledger calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Administrator the ledger is created with.
    pub owner: Address,
    /// Calls in replay order.
    #[serde(default)]
    pub calls: Vec<Call>,
}

/// One ledger call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    /// Whitelist `identity`.
    AddParticipant { caller: Address, identity: Address },
    /// De-list `identity`.
    RemoveParticipant { caller: Address, identity: Address },
    /// Close the pause gate.
    Pause { caller: Address },
    /// Open the pause gate.
    Unpause { caller: Address },
    /// Hand over the administrator role.
    TransferOwnership { caller: Address, new_owner: Address },
    /// Deposit `value` and split it between two recipients.
    SplitEth {
        caller: Address,
        #[serde(deserialize_with = "deserialize_amount")]
        value: U256,
        recipient1: Address,
        recipient2: Address,
    },
    /// Claim the caller's balance.
    Withdraw { caller: Address },
}

impl Call {
    /// Operation name as written in scripts.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddParticipant { .. } => "add_participant",
            Self::RemoveParticipant { .. } => "remove_participant",
            Self::Pause { .. } => "pause",
            Self::Unpause { .. } => "unpause",
            Self::TransferOwnership { .. } => "transfer_ownership",
            Self::SplitEth { .. } => "split_eth",
            Self::Withdraw { .. } => "withdraw",
        }
    }

    /// Identity issuing the call.
    #[must_use]
    pub fn caller(&self) -> Address {
        match *self {
            Self::AddParticipant { caller, .. }
            | Self::RemoveParticipant { caller, .. }
            | Self::Pause { caller }
            | Self::Unpause { caller }
            | Self::TransferOwnership { caller, .. }
            | Self::SplitEth { caller, .. }
            | Self::Withdraw { caller } => caller,
        }
    }
}

impl Script {
    /// Parse a script from JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Malformed call script")
    }

    /// Read and parse a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("In script {}", path.display()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(u64),
    Text(String),
}

fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    match AmountRepr::deserialize(deserializer)? {
        AmountRepr::Number(n) => Ok(U256::from(n)),
        AmountRepr::Text(text) => parse_amount(&text).map_err(de::Error::custom),
    }
}

fn parse_amount(text: &str) -> Result<U256, String> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x") {
        U256::from_str_radix(hex, 16).map_err(|e| format!("invalid hex amount {text}: {e:?}"))
    } else {
        U256::from_dec_str(text).map_err(|e| format!("invalid decimal amount {text}: {e:?}"))
    }
}

// =============================================================================
// TESTS
// =============================================================================
