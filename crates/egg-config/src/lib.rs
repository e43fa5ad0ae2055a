//! Egg Configuration System
//!
//! Provides user configuration for the `egg` tool:
//! - Global user configuration (~/.egg/config.toml)
//! - Environment variable overrides (EGG_*)
//! - Resolution into one effective [`Config`]
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config (~/.egg/config.toml)
//! 3. Environment variables (EGG_*)
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use egg_config::ConfigLoader;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load().unwrap();
//! println!("max call depth: {}", config.max_call_depth);
//! ```

pub mod global;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use global::{GlobalConfig, ReplSection, RuntimeSection};
pub use loader::{Config, ConfigLoader, DEFAULT_MAX_CALL_DEPTH, MAX_CALL_DEPTH_LIMIT};
