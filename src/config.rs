use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Articles shown per display page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Articles requested from the provider per call.
    #[serde(default = "default_fetch_size")]
    pub fetch_size: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,

    /// Relative paths resolve against the working directory.
    #[serde(default = "default_favorites_path")]
    pub favorites_path: String,
}

fn default_base_url() -> String {
    "https://newsapi.org/v2/".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_fetch_size() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_base_ms() -> u64 {
    500
}

fn default_favorites_path() -> String {
    "favorites.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            country: default_country(),
            language: default_language(),
            page_size: default_page_size(),
            fetch_size: default_fetch_size(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_base_ms: default_retry_base_ms(),
            favorites_path: default_favorites_path(),
        }
    }
}

impl Config {
    /// Parse config from a TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Serialize config to a TOML string
    pub fn to_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        // Environment variable overrides the config file value
        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            config.api_key = Some(key);
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newsdeck")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Default values ====================

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, "https://newsapi.org/v2/");
        assert_eq!(config.country, "us");
        assert_eq!(config.language, "en");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.fetch_size, 100);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_base_ms, 500);
        assert_eq!(config.favorites_path, "favorites.json");
    }

    // ==================== TOML parsing ====================

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
api_key = "0123456789abcdef0123456789abcdef"
base_url = "https://proxy.internal/v2/"
country = "gb"
language = "fr"
page_size = 5
fetch_size = 50
timeout_secs = 30
retry_attempts = 5
retry_base_ms = 250
favorites_path = "/tmp/favorites.json"
"#;

        let config = Config::from_str(toml).unwrap();

        assert_eq!(
            config.api_key.as_deref(),
            Some("0123456789abcdef0123456789abcdef")
        );
        assert_eq!(config.base_url, "https://proxy.internal/v2/");
        assert_eq!(config.country, "gb");
        assert_eq!(config.language, "fr");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.fetch_size, 50);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_base_ms, 250);
        assert_eq!(config.favorites_path, "/tmp/favorites.json");
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = Config::from_str("").unwrap();

        assert_eq!(config.api_key, None);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.retry_attempts, 3);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
page_size = 25
country = "in"
"#;

        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.page_size, 25);
        assert_eq!(config.country, "in");
        // Defaults for unspecified
        assert_eq!(config.language, "en");
        assert_eq!(config.fetch_size, 100);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = Config::from_str("this is not valid toml [[[");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = Config::from_str("timeout_secs = \"ten\"");
        assert!(result.is_err());
    }

    // ==================== Serialization ====================

    #[test]
    fn test_roundtrip_serialization() {
        let original = Config {
            api_key: Some("0123456789abcdef0123456789abcdef".to_string()),
            country: "de".to_string(),
            page_size: 15,
            retry_attempts: 4,
            ..Config::default()
        };

        let toml = original.to_string().unwrap();
        let parsed = Config::from_str(&toml).unwrap();

        assert_eq!(parsed.api_key, original.api_key);
        assert_eq!(parsed.country, original.country);
        assert_eq!(parsed.page_size, original.page_size);
        assert_eq!(parsed.retry_attempts, original.retry_attempts);
    }

    // ==================== Edge cases ====================

    #[test]
    fn test_config_path_contains_newsdeck() {
        let path = Config::config_path();
        assert!(path.to_string_lossy().contains("newsdeck"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
