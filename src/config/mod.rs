//! Configuration management for the orchestrator service
//!
//! This module handles loading, validation, and management of all service configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::types::ProviderConfig;
use crate::utils::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable overriding the server host
pub const ENV_HOST: &str = "ORCHESTRATOR_HOST";
/// Environment variable overriding the server port
pub const ENV_PORT: &str = "ORCHESTRATOR_PORT";
/// Environment variable overriding the database URL
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "ORCHESTRATOR_LOG_LEVEL";
/// Environment variable toggling JSON log output
pub const ENV_LOG_JSON: &str = "ORCHESTRATOR_LOG_JSON";
/// Environment variable overriding the health check interval
pub const ENV_HEALTH_INTERVAL: &str = "ORCHESTRATOR_HEALTH_CHECK_INTERVAL_SECS";

/// Main configuration struct for the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Configuration store
    #[serde(default)]
    pub storage: StorageConfig,
    /// Dispatch, health and usage settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Provider configurations written to an empty store at startup
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServiceError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_yaml_str(&content)?;
        config.apply_overrides_from(|key| std::env::var(key).ok())?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse configuration from a YAML document without validating it
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ServiceError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_overrides_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_| ServiceError::Config(format!("Invalid {}: {}", ENV_PORT, port)))?;
        }

        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.storage.database.url = url;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }

        if let Some(json) = lookup(ENV_LOG_JSON) {
            self.logging.json = matches!(json.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(interval) = lookup(ENV_HEALTH_INTERVAL) {
            let secs: u64 = interval.parse().map_err(|_| {
                ServiceError::Config(format!("Invalid {}: {}", ENV_HEALTH_INTERVAL, interval))
            })?;
            self.orchestrator.health_check_interval_secs = (secs > 0).then_some(secs);
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| ServiceError::Config(format!("Server config error: {}", e)))?;

        self.storage
            .database
            .validate()
            .map_err(|e| ServiceError::Config(format!("Database config error: {}", e)))?;

        self.orchestrator
            .validate()
            .map_err(|e| ServiceError::Config(format!("Orchestrator config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| ServiceError::Config(format!("Logging config error: {}", e)))?;

        self.providers
            .as_slice()
            .validate()
            .map_err(|e| ServiceError::Config(format!("Provider config error: {}", e)))?;

        if self.storage.database.is_memory() && self.providers.is_empty() {
            warn!("In-memory store without seeded providers: every category starts empty");
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ServiceError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProviderCategory;
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"
server:
  host: "127.0.0.1"
  port: 9000

storage:
  database:
    url: "sqlite::memory:"

orchestrator:
  timeouts:
    tax_ms: 3000
  health_check_interval_secs: 300
  batch:
    batch_size: 5
    delay_ms: 250

providers:
  - category: TAX
    provider_name: avalara
    display_name: Avalara AvaTax
    is_primary: true
    credentials:
      account_id: "1100012345"
      license_key: "ABCDEF0123456789"
    settings:
      company_code: DEFAULT
  - category: EMAIL
    provider_name: sendgrid
    priority: 2
    credentials:
      api_key: "SG.test-key"
    settings:
      from_email: billing@example.com
"#;

    #[tokio::test]
    async fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(CONFIG.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.database.url, "sqlite::memory:");
        assert_eq!(
            config.orchestrator.timeouts.for_category(ProviderCategory::Tax),
            Duration::from_millis(3000)
        );
        // Unspecified timeouts keep their defaults
        assert_eq!(
            config.orchestrator.timeouts.for_category(ProviderCategory::Email),
            Duration::from_millis(10_000)
        );
        assert_eq!(
            config.orchestrator.health_check_interval(),
            Some(Duration::from_secs(300))
        );
        assert_eq!(config.orchestrator.batch.batch_size, 5);

        assert_eq!(config.providers.len(), 2);
        let avalara = &config.providers[0];
        assert_eq!(avalara.category, ProviderCategory::Tax);
        assert!(avalara.is_primary);
        assert!(avalara.is_active);
        assert_eq!(avalara.credential("license_key"), Some("ABCDEF0123456789"));
        assert_eq!(config.providers[1].priority, 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let err = Config::from_file("/nonexistent/orchestrator.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_HOST, "10.0.0.5"),
            (ENV_PORT, "7070"),
            (ENV_DATABASE_URL, "postgres://db/orchestrator"),
            (ENV_LOG_JSON, "true"),
            (ENV_HEALTH_INTERVAL, "0"),
        ]);

        let mut config = Config::from_yaml_str(CONFIG).unwrap();
        config
            .apply_overrides_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.host, "10.0.0.5");
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.storage.database.url, "postgres://db/orchestrator");
        assert!(config.logging.json);
        assert_eq!(config.orchestrator.health_check_interval(), None);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = Config::default();
        let result = config.apply_overrides_from(|key| {
            (key == ENV_PORT).then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.storage.database.is_memory());
        assert_eq!(config.orchestrator.health_check_interval(), None);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::from_yaml_str(CONFIG).unwrap();
        let yaml = config.to_yaml().unwrap();
        let parsed = Config::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.providers.len(), 2);
        assert_eq!(parsed.server.port, 9000);
    }
}
