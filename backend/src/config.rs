//! # Core Configuration
//!
//! Settings shared by every session, read from a YAML file.
//!
//! ```yaml
//! data_directory: /home/ana/Documents/Fluid Check
//! default_daily_goal_ml: 3000
//! recent_log_limit: 5
//! suggestion_fallback: Could not get recommendation
//! log_filter: info
//! ```
//!
//! Every field is optional. `$FLUID_CHECK_CONFIG` points at the file and
//! `$FLUID_CHECK_DATA_DIR` overrides `data_directory`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::DEFAULT_DAILY_GOAL_ML;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::storage::csv::connection::default_data_directory;

pub const CONFIG_PATH_ENV: &str = "FLUID_CHECK_CONFIG";
pub const DATA_DIR_ENV: &str = "FLUID_CHECK_DATA_DIR";

pub const DEFAULT_RECENT_LOG_LIMIT: usize = 5;
pub const DEFAULT_SUGGESTION_FALLBACK: &str = "Could not get recommendation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Root of the per-user data directories
    pub data_directory: PathBuf,
    /// Goal used until the user saves one
    pub default_daily_goal_ml: i64,
    /// How many entries the home screen lists
    pub recent_log_limit: usize,
    /// Shown when the coach cannot produce a tip
    pub suggestion_fallback: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let data_directory = default_data_directory().unwrap_or_else(|e| {
            warn!("{}; using a relative data directory", e);
            PathBuf::from("Fluid Check")
        });

        Self {
            data_directory,
            default_daily_goal_ml: DEFAULT_DAILY_GOAL_ML,
            recent_log_limit: DEFAULT_RECENT_LOG_LIMIT,
            suggestion_fallback: DEFAULT_SUGGESTION_FALLBACK.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl CoreConfig {
    /// Load using the process environment
    pub fn load() -> Result<Self> {
        let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let data_dir_override = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self::load_from(config_path.as_deref(), data_dir_override)
    }

    /// Load from an optional file, then apply an optional data directory
    /// override
    pub fn load_from(config_path: Option<&Path>, data_dir_override: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(data_directory) = data_dir_override {
            info!("Data directory overridden to {}", data_directory.display());
            config.data_directory = data_directory;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml_content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.default_daily_goal_ml, 3000);
        assert_eq!(config.recent_log_limit, 5);
        assert_eq!(config.suggestion_fallback, "Could not get recommendation");
        assert!(config.data_directory.ends_with("Fluid Check"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = CoreConfig::from_yaml_str("recent_log_limit: 8\nlog_filter: debug\n").unwrap();
        assert_eq!(config.recent_log_limit, 8);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.default_daily_goal_ml, 3000);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(CoreConfig::from_yaml_str("").unwrap(), CoreConfig::default());
    }

    #[test]
    fn test_load_from_file_with_override() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            "data_directory: /srv/fluid\ndefault_daily_goal_ml: 2500\n",
        )
        .unwrap();

        let config = CoreConfig::load_from(Some(&config_path), None).unwrap();
        assert_eq!(config.data_directory, PathBuf::from("/srv/fluid"));
        assert_eq!(config.default_daily_goal_ml, 2500);

        let overridden =
            CoreConfig::load_from(Some(&config_path), Some(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(overridden.data_directory, temp_dir.path());
        assert_eq!(overridden.default_daily_goal_ml, 2500);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = CoreConfig::load_from(Some(&temp_dir.path().join("absent.yaml")), None);
        assert!(result.is_err());
    }
}
