//! CLI configuration
//!
//! Settings come from `~/.egg/config.toml` and the `EGG_*` variables (resolved by
//! `egg-config`). Output preferences that only matter to the terminal are read here directly.

use anyhow::{Context, Result};
use egg_config::ConfigLoader;
use std::env;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Default to JSON diagnostic output (EGG_DIAGNOSTICS=json)
    pub default_json: bool,
    /// Disable colored output (NO_COLOR=1)
    pub no_color: bool,
    /// Settings resolved from the config file and environment
    pub settings: egg_config::Config,
}

impl Config {
    /// Load the config file and environment
    pub fn load() -> Result<Self> {
        let settings = ConfigLoader::new()
            .load()
            .context("Failed to load egg configuration")?;
        Ok(Self::with_settings(settings))
    }

    /// Combine already-resolved settings with the terminal variables
    pub fn with_settings(settings: egg_config::Config) -> Self {
        Self {
            default_json: env::var("EGG_DIAGNOSTICS")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            no_color: env::var_os("NO_COLOR").is_some(),
            settings,
        }
    }

    /// Effective call depth: the CLI flag wins over configured values
    pub fn max_call_depth(&self, flag: Option<usize>) -> usize {
        flag.unwrap_or(self.settings.max_call_depth).max(1)
    }

    /// History file for the REPL, or `None` when history is off
    pub fn history_path(&self, no_history_flag: bool) -> Option<PathBuf> {
        if no_history_flag {
            return None;
        }
        self.settings.history_path()
    }
}
