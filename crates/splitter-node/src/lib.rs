//! # Splitter Node
//!
//! Command-line host for the split ledger.
//!
//! ## Startup Sequence
//!
//! 1. Initialise logging (`RUST_LOG`, default `info`)
//! 2. Load configuration (JSON file, then environment overrides, then validation)
//! 3. Parse the call script
//! 4. Replay every call against a fresh in-memory ledger
//! 5. Print the final state as JSON on stdout
//!
//! ## Modular Structure
//!
//! - `settings` - configuration loading
//! - `script` - call script format
//! - `runner` - replay and summary

pub mod runner;
pub mod script;
pub mod settings;

pub use runner::{apply_call, run_script, CallOutcome, Payout, RunSummary};
pub use script::{Call, Script};
pub use settings::{load_config, load_config_with};
