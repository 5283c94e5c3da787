//! CLI configuration management

use moi_evm::EvmConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::CliError;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default tracing filter
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Engine limits
    #[serde(default)]
    pub evm: EvmConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            evm: EvmConfig::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".moi"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from the default path, or defaults when there is no file
    pub fn load() -> Result<Self, CliError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = Self::config_path()
            .ok_or_else(|| CliError::Config("Cannot determine config path".to_string()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
