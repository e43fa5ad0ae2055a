//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::{validate_call_depth, GlobalConfig};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Call depth used when nothing else is configured
pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

/// Largest call depth any source may configure
pub const MAX_CALL_DEPTH_LIMIT: usize = 10_000;

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Built-in defaults - lowest priority
/// 2. Global config (~/.egg/config.toml) - overrides defaults
/// 3. Environment variables (EGG_*) - overrides global
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Effective configuration after merging every source
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub max_call_depth: usize,
    /// Print the program text before running a file
    pub echo_program: bool,
    /// Persist REPL history
    pub history: bool,
    /// Explicit history file; `None` means the default location
    pub history_file: Option<PathBuf>,
    /// Show result types in the REPL
    pub show_types: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            echo_program: false,
            history: true,
            history_file: None,
            show_types: false,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader reading ~/.egg/config.toml
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Create a loader that reads the global config from `path` instead
    pub fn with_global_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load the effective configuration
    ///
    /// A missing global config file is not an error; a malformed one is.
    pub fn load(&mut self) -> ConfigResult<Config> {
        let global = self.load_global_config()?;
        let config = Self::resolve(&global);
        Self::apply_env_overrides(config)
    }

    /// Apply a global config on top of the defaults
    pub fn resolve(global: &GlobalConfig) -> Config {
        let defaults = Config::default();
        Config {
            max_call_depth: global.max_call_depth().unwrap_or(defaults.max_call_depth),
            echo_program: global.echo_program().unwrap_or(defaults.echo_program),
            history: global.history().unwrap_or(defaults.history),
            history_file: global.history_file().map(Path::to_path_buf),
            show_types: global.show_types().unwrap_or(defaults.show_types),
        }
    }

    /// Load global configuration from ~/.egg/config.toml
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        // Global config is optional - if it doesn't exist, return default
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }

    /// Apply environment variable overrides
    ///
    /// - EGG_MAX_CALL_DEPTH=<n>
    /// - EGG_NO_HISTORY=1
    /// - EGG_HISTORY_FILE=<path>
    fn apply_env_overrides(mut config: Config) -> ConfigResult<Config> {
        if let Ok(depth) = env::var("EGG_MAX_CALL_DEPTH") {
            let depth: usize = depth.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "EGG_MAX_CALL_DEPTH".to_string(),
                reason: format!("expected a positive integer, got '{}'", depth),
            })?;
            validate_call_depth("EGG_MAX_CALL_DEPTH", depth)?;
            config.max_call_depth = depth;
        }

        if let Ok(no_history) = env::var("EGG_NO_HISTORY") {
            if is_truthy(&no_history) {
                config.history = false;
            }
        }

        if let Ok(path) = env::var("EGG_HISTORY_FILE") {
            if !path.is_empty() {
                config.history_file = Some(PathBuf::from(path));
            }
        }

        Ok(config)
    }

    /// Get the global configuration directory (~/.egg)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".egg"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// History file to use, or `None` when history is disabled
    ///
    /// Falls back to ~/.egg/history when no file is configured.
    pub fn history_path(&self) -> Option<PathBuf> {
        if !self.history {
            return None;
        }
        self.history_file
            .clone()
            .or_else(|| ConfigLoader::global_config_dir().ok().map(|dir| dir.join("history")))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join("config.toml");
        fs::write(&config_path, content).unwrap();
        config_path
    }

    #[test]
    #[serial]
    fn test_missing_global_config_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = ConfigLoader::with_global_path(temp_dir.path().join("absent.toml"));
        assert_eq!(loader.load().unwrap(), Config::default());
    }

    #[test]
    #[serial]
    fn test_load_global_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_config_file(
            temp_dir.path(),
            r#"
[runtime]
max_call_depth = 100
echo_program = true

[repl]
show_types = true
"#,
        );

        let config = ConfigLoader::with_global_path(path).load().unwrap();
        assert_eq!(config.max_call_depth, 100);
        assert!(config.echo_program);
        assert!(config.show_types);
        assert!(config.history);
    }

    #[test]
    #[serial]
    fn test_malformed_global_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_config_file(temp_dir.path(), "[runtime\nmax_call_depth = 1");

        let err = ConfigLoader::with_global_path(path).load().unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseError { .. }));
    }

    #[test]
    #[serial]
    fn test_env_override_call_depth() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_config_file(temp_dir.path(), "[runtime]\nmax_call_depth = 100\n");

        env::set_var("EGG_MAX_CALL_DEPTH", "42");
        let config = ConfigLoader::with_global_path(path).load();
        env::remove_var("EGG_MAX_CALL_DEPTH");

        assert_eq!(config.unwrap().max_call_depth, 42);
    }

    #[test]
    #[serial]
    fn test_env_override_call_depth_invalid() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var("EGG_MAX_CALL_DEPTH", "lots");
        let result = ConfigLoader::with_global_path(temp_dir.path().join("none.toml")).load();
        env::remove_var("EGG_MAX_CALL_DEPTH");

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    #[serial]
    fn test_env_disables_history() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var("EGG_NO_HISTORY", "1");
        let config = ConfigLoader::with_global_path(temp_dir.path().join("none.toml"))
            .load()
            .unwrap();
        env::remove_var("EGG_NO_HISTORY");

        assert!(!config.history);
        assert_eq!(config.history_path(), None);
    }

    #[test]
    fn test_explicit_history_file_wins() {
        let config = Config {
            history_file: Some(PathBuf::from("/tmp/custom-history")),
            ..Config::default()
        };
        assert_eq!(
            config.history_path(),
            Some(PathBuf::from("/tmp/custom-history"))
        );
    }
}
