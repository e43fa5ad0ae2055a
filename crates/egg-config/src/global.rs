//! Global Configuration (~/.egg/config.toml)
//!
//! Handles user-level configuration stored in `~/.egg/config.toml`:
//!
//! ```toml
//! [runtime]
//! max_call_depth = 1024
//! echo_program = false
//!
//! [repl]
//! history = true
//! history_file = "/home/me/.egg_history"
//! show_types = true
//! ```

use crate::loader::MAX_CALL_DEPTH_LIMIT;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.egg/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Evaluation settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeSection>,

    /// Interactive shell settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repl: Option<ReplSection>,
}

/// `[runtime]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSection {
    /// Maximum nesting of function calls (default: 512, at most 10000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_call_depth: Option<usize>,

    /// Print the program text before running a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo_program: Option<bool>,
}

/// `[repl]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ReplSection {
    /// Persist line history between sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<bool>,

    /// History file location (default: ~/.egg/history)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,

    /// Show the type next to each result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_types: Option<bool>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(depth) = self.max_call_depth() {
            validate_call_depth("runtime.max_call_depth", depth)?;
        }
        Ok(())
    }

    /// Get the global config file path (~/.egg/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".egg").join("config.toml"))
    }

    pub fn max_call_depth(&self) -> Option<usize> {
        self.runtime.as_ref().and_then(|r| r.max_call_depth)
    }

    pub fn echo_program(&self) -> Option<bool> {
        self.runtime.as_ref().and_then(|r| r.echo_program)
    }

    pub fn history(&self) -> Option<bool> {
        self.repl.as_ref().and_then(|r| r.history)
    }

    pub fn history_file(&self) -> Option<&Path> {
        self.repl.as_ref().and_then(|r| r.history_file.as_deref())
    }

    pub fn show_types(&self) -> Option<bool> {
        self.repl.as_ref().and_then(|r| r.show_types)
    }
}

/// Call depth must lie in `1..=MAX_CALL_DEPTH_LIMIT`
pub(crate) fn validate_call_depth(field: &str, depth: usize) -> ConfigResult<()> {
    let reason = if depth == 0 {
        "must be at least 1".to_string()
    } else if depth > MAX_CALL_DEPTH_LIMIT {
        format!("must be at most {}", MAX_CALL_DEPTH_LIMIT)
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidValue {
        field: field.to_string(),
        reason,
    })
}
