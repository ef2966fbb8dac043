//! Configuration validation

use super::models::*;
use crate::core::types::{ProviderCategory, ProviderConfig};
use std::collections::HashSet;
use tracing::debug;

/// Trait for validating configuration structures
pub trait Validate {
    /// Validate the configuration
    fn validate(&self) -> Result<(), String>;
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.trim().is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
            if workers > 1000 {
                return Err("Worker count should not exceed 1000".to_string());
            }
        }

        if self.max_body_size == 0 {
            return Err("Max body size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        if !self.is_memory()
            && !self.url.starts_with("sqlite:")
            && !self.url.starts_with("postgres://")
            && !self.url.starts_with("postgresql://")
        {
            return Err(format!(
                "Unsupported database URL scheme: {} (expected memory, sqlite: or postgres://)",
                self.url.split(':').next().unwrap_or_default()
            ));
        }

        if self.max_connections == 0 {
            return Err("Database max connections must be greater than 0".to_string());
        }

        if self.connection_timeout == 0 {
            return Err("Database connection timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for OrchestratorConfig {
    fn validate(&self) -> Result<(), String> {
        for category in ProviderCategory::ALL {
            if self.timeouts.for_category(category).is_zero() {
                return Err(format!("Timeout for {} must be greater than 0", category));
            }
        }

        if self.health_check_timeout_ms == 0 {
            return Err("Health check timeout must be greater than 0".to_string());
        }

        if self.usage_flush_interval_secs == 0 {
            return Err("Usage flush interval must be greater than 0".to_string());
        }

        if self.batch.batch_size == 0 {
            return Err("Batch size must be greater than 0".to_string());
        }

        if self.batch.max_messages == 0 {
            return Err("Batch message limit must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        if self.provider_name.trim().is_empty() {
            return Err(format!("{} provider name cannot be empty", self.category));
        }

        if self.provider_name.contains(char::is_whitespace) {
            return Err(format!(
                "Provider name '{}' must not contain whitespace",
                self.provider_name
            ));
        }

        Ok(())
    }
}

impl Validate for [ProviderConfig] {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for provider in self {
            provider.validate()?;
            if !seen.insert((provider.category, provider.provider_name.to_lowercase())) {
                return Err(format!(
                    "Duplicate provider '{}' in category {}",
                    provider.provider_name, provider.category
                ));
            }
        }
        Ok(())
    }
}
