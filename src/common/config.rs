//! Configuration file handling

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};
use crate::results::MSG_MAXLEN;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// API driver settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Report rendering settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Fixture store settings
    #[serde(default)]
    pub fixtures: FixtureConfig,
}

/// Settings for the HTTP driver
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// Base URL that request paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            headers: HashMap::new(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout() -> u64 {
    30
}

/// Report settings
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// Show note trees by default
    #[serde(default)]
    pub verbose: bool,

    /// Longest message shown on one report line
    #[serde(default = "default_message_max_len")]
    pub message_max_len: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            message_max_len: default_message_max_len(),
        }
    }
}

fn default_message_max_len() -> usize {
    MSG_MAXLEN
}

/// Fixture store settings
#[derive(Debug, Deserialize)]
pub struct FixtureConfig {
    /// Pick one random element when a fixture path resolves to a list
    #[serde(default = "default_random_pick")]
    pub random_pick: bool,

    /// Seed for reproducible picks
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            random_pick: default_random_pick(),
            seed: None,
        }
    }
}

fn default_random_pick() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.report.message_max_len, 200);
        assert!(!config.report.verbose);
        assert!(config.fixtures.random_pick);
        assert_eq!(config.fixtures.seed, None);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "https://api.example.com"
            headers = { Authorization = "Bearer abc" }

            [fixtures]
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(
            config.api.headers.get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert_eq!(config.fixtures.seed, Some(7));
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::parse("[api]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
