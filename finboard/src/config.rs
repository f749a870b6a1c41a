use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, deserialize_with = "secret::deserialize")]
    pub access_token: Option<SecretString>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_range_debounce_ms")]
    pub range_debounce_ms: u64,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

mod secret {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::from))
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_page_size() -> usize {
    20
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_range_debounce_ms() -> u64 {
    400
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            access_token: None,
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            range_debounce_ms: default_range_debounce_ms(),
            log_dir: None,
        }
    }
}

impl Settings {
    /// Load `finboard.toml` (or `$FINBOARD_CONFIG`) layered with `FINBOARD__*` env vars
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("FINBOARD_CONFIG").unwrap_or_else(|_| "finboard.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("FINBOARD").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url.is_empty() {
            return Err("api_base_url is required".to_string());
        }
        if !self.api_base_url.starts_with("http") {
            return Err("api_base_url must be a valid HTTP(S) URL".to_string());
        }
        if self.page_size == 0 {
            return Err("page_size must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn range_debounce(&self) -> Duration {
        Duration::from_millis(self.range_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use secrecy::ExposeSecret;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_apply_to_missing_keys() {
        let settings = from_toml("api_base_url = \"https://ledger.example.com/api\"");
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.search_debounce(), Duration::from_millis(300));
        assert_eq!(settings.range_debounce(), Duration::from_millis(400));
        assert!(settings.access_token.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn token_is_read_as_secret() {
        let settings = from_toml("access_token = \"tok-123\"\npage_size = 50");
        assert_eq!(
            settings.access_token.as_ref().map(|t| t.expose_secret().to_string()),
            Some("tok-123".to_string())
        );
        assert_eq!(settings.page_size, 50);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.api_base_url = "ftp://nope".to_string();
        assert!(settings.validate().is_err());

        settings.api_base_url = String::new();
        assert!(settings.validate().is_err());

        let settings = Settings {
            page_size: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
