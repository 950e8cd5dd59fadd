//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which covers the content origin for the offline guide and an optional
//! offline-only mode.
//!
//! Configuration is stored at `~/.config/amor-fati/config.json`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data/cache directory paths
const APP_NAME: &str = "amor-fati";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default origin the guide pages and icons are fetched from
pub const DEFAULT_CONTENT_BASE_URL: &str = "https://amor-fati.app/content";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Overrides the built-in content origin
    pub content_base_url: Option<String>,
    /// Skip the cache worker entirely and serve nothing remote
    #[serde(default)]
    pub offline_mode: bool,
}

impl Config {
    /// Load the configuration, writing out a default file on first run so
    /// the user has something to edit.
    pub fn load_or_create() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Self::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn content_base_url(&self) -> &str {
        self.content_base_url
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_BASE_URL)
    }

    /// Where assessment data lives.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Where the offline asset cache and logs live.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = Config {
            content_base_url: Some("https://example.com/guide".to_string()),
            offline_mode: true,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.content_base_url(), "https://example.com/guide");
        assert!(loaded.offline_mode);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{}").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.content_base_url(), DEFAULT_CONTENT_BASE_URL);
        assert!(!loaded.offline_mode);
    }
}
