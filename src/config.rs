//! Application configuration management.
//!
//! Configuration lives at `~/.config/chatroster/config.json` and can be
//! overridden per-run with environment variables (loaded from `.env` by
//! main): `CHATROSTER_API_URL`, `CHATROSTER_USER_ID`, `CHATROSTER_INIT_DATA`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::UserContext;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "chatroster";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default backend URL for local development
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Color scheme, persisted across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub user_id: Option<i64>,
    pub init_data: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub offline_mode: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
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
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Backend URL: env override, then config, then local default.
    pub fn api_base_url(&self) -> String {
        std::env::var("CHATROSTER_API_URL")
            .ok()
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Resolve the Telegram identity forwarded to the backend.
    /// Returns `None` when no user id is available from env or config.
    pub fn identity(&self) -> Option<UserContext> {
        let user_id = std::env::var("CHATROSTER_USER_ID")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .or(self.user_id)?;

        let init_data = std::env::var("CHATROSTER_INIT_DATA")
            .ok()
            .or_else(|| self.init_data.clone())
            .unwrap_or_default();

        Some(UserContext { user_id, init_data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_requires_user_id() {
        let config = Config::default();
        // No config value; env may leak from the host, so only assert the
        // config-driven path.
        if std::env::var("CHATROSTER_USER_ID").is_err() {
            assert!(config.identity().is_none());
        }

        let config = Config {
            user_id: Some(42),
            init_data: Some("user=abc".to_string()),
            ..Default::default()
        };
        let ctx = config.identity().expect("identity from config");
        if std::env::var("CHATROSTER_USER_ID").is_err() {
            assert_eq!(ctx.user_id, 42);
        }
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn test_theme_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}
