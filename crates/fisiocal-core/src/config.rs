//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the backend URL, the API token, the last selected physiotherapist filter
//! and the event color.
//!
//! Configuration is stored at `~/.config/fisiocal/config.json`. The
//! `FISIOCAL_API_URL` and `FISIOCAL_API_TOKEN` environment variables take
//! precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::schedule::DEFAULT_EVENT_COLOR;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "fisiocal";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when nothing is configured (Django development server)
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const API_URL_ENV: &str = "FISIOCAL_API_URL";
pub const API_TOKEN_ENV: &str = "FISIOCAL_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub last_physiotherapist: Option<i64>,
    #[serde(default)]
    pub event_color: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
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

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Backend URL: environment, then config file, then the default.
    pub fn api_base_url(&self) -> String {
        resolve(std::env::var(API_URL_ENV).ok(), self.api_base_url.as_deref())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// API token: environment, then config file.
    pub fn api_token(&self) -> Option<String> {
        resolve(std::env::var(API_TOKEN_ENV).ok(), self.api_token.as_deref())
    }

    /// Event color; an empty string in the config disables the hint.
    pub fn event_color(&self) -> Option<String> {
        match self.event_color.as_deref() {
            Some("") => None,
            Some(color) => Some(color.to_string()),
            None => Some(DEFAULT_EVENT_COLOR.to_string()),
        }
    }
}

/// First non-blank value wins.
fn resolve(env_value: Option<String>, configured: Option<&str>) -> Option<String> {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            configured
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_precedence() {
        assert_eq!(
            resolve(Some("http://env".to_string()), Some("http://file")),
            Some("http://env".to_string())
        );
        assert_eq!(
            resolve(Some("  ".to_string()), Some("http://file")),
            Some("http://file".to_string())
        );
        assert_eq!(resolve(None, Some("")), None);
        assert_eq!(resolve(None, None), None);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            api_base_url: Some("https://clinica.example.com".to_string()),
            api_token: None,
            last_physiotherapist: Some(4),
            event_color: Some("#123456".to_string()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"last_physiotherapist": 2}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.last_physiotherapist, Some(2));
        assert_eq!(config.api_base_url, None);
    }

    #[test]
    fn test_event_color() {
        let mut config = Config::default();
        assert_eq!(config.event_color().as_deref(), Some(DEFAULT_EVENT_COLOR));

        config.event_color = Some(String::new());
        assert_eq!(config.event_color(), None);

        config.event_color = Some("#FF0000".to_string());
        assert_eq!(config.event_color().as_deref(), Some("#FF0000"));
    }
}
