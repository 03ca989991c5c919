//! # Ledger Configuration
//!
//! Defaults suit the whitelist-only deployment: callers must be participants,
//! no minimum registry size, invariants verified after every mutation.
//!
//! ## Environment overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SPLITTER_REQUIRE_PARTICIPANT` | `policy.require_participant_caller` |
//! | `SPLITTER_MIN_PARTICIPANTS` | `policy.min_active_participants` |
//! | `SPLITTER_VERIFY_INVARIANTS` | `verify_invariants` |

use crate::domain::entities::SplitPolicy;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Upper bound accepted for `min_active_participants`.
pub const MAX_MIN_PARTICIPANTS: usize = 1024;

/// Environment variable names.
pub mod env_keys {
    /// Overrides `policy.require_participant_caller`.
    pub const REQUIRE_PARTICIPANT: &str = "SPLITTER_REQUIRE_PARTICIPANT";
    /// Overrides `policy.min_active_participants`.
    pub const MIN_PARTICIPANTS: &str = "SPLITTER_MIN_PARTICIPANTS";
    /// Overrides `verify_invariants`.
    pub const VERIFY_INVARIANTS: &str = "SPLITTER_VERIFY_INVARIANTS";
}

/// Complete ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Split eligibility rules.
    pub policy: SplitPolicy,
    /// Check domain invariants after every committed mutation.
    pub verify_invariants: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            policy: SplitPolicy::default(),
            verify_invariants: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Minimum registry size is unreasonably large.
    #[error("min_active_participants {value} exceeds maximum {max}")]
    MinParticipantsTooLarge { value: usize, max: usize },
}

impl SplitterConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Unparsable values are ignored.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(env_keys::REQUIRE_PARTICIPANT) {
            match parse_bool(&raw) {
                Some(v) => self.policy.require_participant_caller = v,
                None => warn!(key = env_keys::REQUIRE_PARTICIPANT, value = %raw, "Ignoring non-boolean override"),
            }
        }
        if let Some(raw) = lookup(env_keys::MIN_PARTICIPANTS) {
            match raw.trim().parse() {
                Ok(v) => self.policy.min_active_participants = v,
                Err(_) => warn!(key = env_keys::MIN_PARTICIPANTS, value = %raw, "Ignoring non-numeric override"),
            }
        }
        if let Some(raw) = lookup(env_keys::VERIFY_INVARIANTS) {
            match parse_bool(&raw) {
                Some(v) => self.verify_invariants = v,
                None => warn!(key = env_keys::VERIFY_INVARIANTS, value = %raw, "Ignoring non-boolean override"),
            }
        }
        info!(
            require_participant = self.policy.require_participant_caller,
            min_participants = self.policy.min_active_participants,
            verify_invariants = self.verify_invariants,
            "Ledger configuration resolved"
        );
        self
    }

    /// Rejects configurations that cannot be operated.
    ///
    /// # Errors
    ///
    /// `MinParticipantsTooLarge` if the minimum exceeds [`MAX_MIN_PARTICIPANTS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.policy.min_active_participants > MAX_MIN_PARTICIPANTS {
            return Err(ConfigError::MinParticipantsTooLarge {
                value: self.policy.min_active_participants,
                max: MAX_MIN_PARTICIPANTS,
            });
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
