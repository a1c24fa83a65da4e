//! Client configuration loading and validation

use crate::client::error::{SubmitError, SubmitResult};
use crate::client::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the backend base address
pub const BASE_URL_ENV: &str = "CONTACT_FORM_BASE_URL";

/// Settings for the contact form backend client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address of the backend service
    pub base_url: String,

    /// Path of the GraphQL endpoint, relative to `base_url`
    pub graphql_path: String,

    /// Response field holding the mutation result
    pub mutation_field: String,

    /// Replacement mutation document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation_query: Option<String>,

    /// Per-request timeout
    #[serde(with = "duration_millis")]
    pub request_timeout: Duration,

    /// Retry policy for failed submissions
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            graphql_path: "/graphql".to_string(),
            mutation_field: "submitContactForm".to_string(),
            mutation_query: None,
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("contact-form")
            .join("config.toml")
    }

    /// Load configuration from file, falling back to defaults when it does not exist
    pub async fn load_from_file(path: &Path) -> SubmitResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SubmitError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> SubmitResult<Self> {
        let config: ClientConfig = toml::from_str(content)
            .map_err(|e| SubmitError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` (or the default location) and apply environment overrides
    pub async fn load(path: Option<&Path>) -> SubmitResult<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let mut config = Self::load_from_file(&path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                tracing::debug!("Using base URL from {}", BASE_URL_ENV);
                self.base_url = base_url.trim().to_string();
            }
        }
    }

    /// Serialize configuration as TOML
    pub fn to_toml(&self) -> SubmitResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SubmitError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate configuration values
    pub fn validate(&self) -> SubmitResult<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| SubmitError::config(format!("Invalid base_url '{}': {}", self.base_url, e)))?;

        if self.graphql_path.trim().is_empty() {
            return Err(SubmitError::config("graphql_path must not be empty"));
        }

        if self.mutation_field.trim().is_empty() {
            return Err(SubmitError::config("mutation_field must not be empty"));
        }

        if self.request_timeout.is_zero() {
            return Err(SubmitError::config("request_timeout must be greater than zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(SubmitError::config("retry.max_attempts must be at least 1"));
        }

        Ok(())
    }
}

/// Serde helpers storing a `Duration` as whole milliseconds
pub mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_attempts, 4);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            base_url = "https://cms.example.com"
            request_timeout = 5000

            [retry]
            max_attempts = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://cms.example.com");
        assert_eq!(config.graphql_path, "/graphql");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ClientConfig::from_toml(r#"base_url = "::not a url::""#);
        assert!(matches!(result, Err(SubmitError::Configuration { .. })));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = ClientConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ClientConfig {
            base_url: "https://cms.example.com".to_string(),
            mutation_query: Some("mutation { ping }".to_string()),
            ..ClientConfig::default()
        };

        let text = config.to_toml().unwrap();
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_from_file(&dir.path().join("absent.toml"))
            .await
            .unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "graphql_path = \"/wp/graphql\"\n")
            .await
            .unwrap();

        let config = ClientConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.graphql_path, "/wp/graphql");
    }
}
