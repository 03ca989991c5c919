//! Ledger configuration loading: optional JSON file, then environment
//! overrides, then validation.

use std::path::Path;

use anyhow::{Context, Result};
use splitter_ledger::config::SplitterConfig;

/// Load configuration using the process environment for overrides.
pub fn load_config(path: Option<&Path>) -> Result<SplitterConfig> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit override source.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<SplitterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str::<SplitterConfig>(&raw)
                .with_context(|| format!("Malformed config {}", path.display()))?
        }
        None => SplitterConfig::default(),
    };

    let config = base.with_overrides(lookup);
    config.validate().context("Invalid ledger configuration")?;
    Ok(config)
}
