//! Configuration loading and management
//!
//! Settings live in `~/.gbd-tui/config.json`. Command-line flags override
//! individual fields for a single run.

use crate::model::PageSize;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL of the GBD server; only scheme, host and port are used
    #[serde(default = "default_server")]
    pub server: String,
    /// Initial rows per page (10, 20 or 30)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Field separator for CSV export
    #[serde(default = "default_delimiter")]
    pub csv_delimiter: char,
}

fn default_server() -> String {
    "http://localhost:5000".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_timeout() -> u64 {
    30
}

fn default_delimiter() -> char {
    ','
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: default_server(),
            page_size: default_page_size(),
            request_timeout_secs: default_timeout(),
            csv_delimiter: default_delimiter(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".gbd-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            // Create config directory if it doesn't exist
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Validate the settings that have a restricted range
    pub fn validate(&self) -> anyhow::Result<()> {
        if PageSize::from_rows(self.page_size).is_none() {
            anyhow::bail!("page size must be 10, 20 or 30, got {}", self.page_size);
        }
        if ![' ', ',', ';'].contains(&self.csv_delimiter) {
            anyhow::bail!(
                "CSV delimiter must be a space, ',' or ';', got {:?}",
                self.csv_delimiter
            );
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request timeout must be at least 1 second");
        }
        Ok(())
    }

    pub fn page_size(&self) -> PageSize {
        PageSize::from_rows(self.page_size).unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn delimiter_byte(&self) -> u8 {
        // validated to be ASCII
        self.csv_delimiter as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server, "http://localhost:5000");
        assert_eq!(config.page_size(), PageSize::Ten);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"server": "http://gbd:8080"}"#).unwrap();
        assert_eq!(config.server, "http://gbd:8080");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.csv_delimiter, ',');
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            page_size: 30,
            csv_delimiter: ';',
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), Some(config));
    }

    #[test]
    fn test_load_missing_or_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Config::load_from(&path), None);

        fs::write(&path, "not json").unwrap();
        assert_eq!(Config::load_from(&path), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            page_size: 15,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            csv_delimiter: '|',
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout"));

        let config = Config {
            request_timeout_secs: 1,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
