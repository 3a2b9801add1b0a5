//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default gateway address (the port the SberGate web server listens on).
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:9123";

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gateway base URL.
    #[serde(default)]
    pub url: Option<String>,
}

impl Config {
    /// Path to the config file (`<config-dir>/sbergate-console/config.toml`).
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sbergate-console").join("config.toml"))
    }

    /// Load the config file, returning defaults when none exists.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.url.is_none());
    }

    #[test]
    fn url_is_read() {
        let config: Config = toml::from_str(r#"url = "http://gateway.local:9123""#).unwrap();
        assert_eq!(config.url.as_deref(), Some("http://gateway.local:9123"));
    }
}
