//! Configuration management
//!
//! Holds the back-office API settings. Configuration files are stored in
//! platform-specific directories:
//! - macOS: `~/Library/Application Support/cadastro/config.yaml`
//! - Linux: `~/.config/cadastro/config.yaml`
//! - Windows: `%APPDATA%\cadastro\config.yaml`

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default API location used by the registration screens
pub const DEFAULT_BASE_URL: &str = "http://localhost:3300";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Back-office API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Application configuration
///
/// Persisted as YAML in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Loads configuration from the default config file location
    ///
    /// # Returns
    /// - `Ok(Config)` with the loaded configuration, or defaults if the file doesn't exist
    /// - `Err` if the file exists but cannot be read or parsed
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from an explicit path
    ///
    /// # Errors
    /// Returns an error if the file exists but is malformed or unreadable.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: Config =
            serde_yaml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Saves the configuration to the default config file location
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let contents = serde_yaml::to_string(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Returns the platform-specific configuration file path
    ///
    /// Falls back to `~/.config/cadastro/config.yaml` if platform detection fails.
    ///
    /// # Errors
    /// Returns an error if the HOME environment variable is not set (fallback case only).
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "cadastro") {
            Ok(proj_dirs.config_dir().join("config.yaml"))
        } else {
            let home = std::env::var("HOME").context("HOME not set")?;
            Ok(PathBuf::from(home).join(".config/cadastro/config.yaml"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("cadastro_test_missing/config.yaml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3300");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("api:\n  base_url: http://api.local\n").unwrap();
        assert_eq!(config.api.base_url, "http://api.local");
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let empty: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join("cadastro_test_config");
        let path = dir.join("nested/config.yaml");

        let mut config = Config::default();
        config.api.base_url = "http://10.0.0.5:3300".to_string();
        config.api.timeout_secs = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        // Cleanup
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join("cadastro_test_malformed.yaml");
        fs::write(&path, "api: [not, a, map").unwrap();
        assert!(Config::load_from(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
