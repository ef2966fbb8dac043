//! Failover orchestration settings

use super::*;
use crate::core::types::ProviderCategory;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Per-category adapter call timeouts
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Upper bound for one health probe
    #[serde(default = "default_health_check_timeout_ms")]
    pub health_check_timeout_ms: u64,
    /// Periodic health probing interval (disabled when absent)
    #[serde(default)]
    pub health_check_interval_secs: Option<u64>,
    /// How often accumulated usage is written back to the store
    #[serde(default = "default_usage_flush_interval_secs")]
    pub usage_flush_interval_secs: u64,
    /// Batch dispatch pacing
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            timeouts: TimeoutConfig::default(),
            health_check_timeout_ms: default_health_check_timeout_ms(),
            health_check_interval_secs: None,
            usage_flush_interval_secs: default_usage_flush_interval_secs(),
            batch: BatchConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_millis(self.health_check_timeout_ms)
    }

    pub fn health_check_interval(&self) -> Option<Duration> {
        self.health_check_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn usage_flush_interval(&self) -> Duration {
        Duration::from_secs(self.usage_flush_interval_secs.max(1))
    }
}

/// Adapter call timeouts in milliseconds
///
/// Synchronous calculations get a few seconds; message delivery and payment
/// calls are allowed longer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_tax_timeout_ms")]
    pub tax_ms: u64,
    #[serde(default = "default_email_timeout_ms")]
    pub email_ms: u64,
    #[serde(default = "default_sms_timeout_ms")]
    pub sms_ms: u64,
    #[serde(default = "default_payment_timeout_ms")]
    pub payment_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            tax_ms: default_tax_timeout_ms(),
            email_ms: default_email_timeout_ms(),
            sms_ms: default_sms_timeout_ms(),
            payment_ms: default_payment_timeout_ms(),
        }
    }
}

impl TimeoutConfig {
    /// Timeout applied to one adapter call of the given category
    pub fn for_category(&self, category: ProviderCategory) -> Duration {
        let millis = match category {
            ProviderCategory::Tax => self.tax_ms,
            ProviderCategory::Email => self.email_ms,
            ProviderCategory::Sms => self.sms_ms,
            ProviderCategory::Payment => self.payment_ms,
        };
        Duration::from_millis(millis)
    }
}

/// Batch dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum dispatches in flight per window
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause between windows in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub delay_ms: u64,
    /// Largest batch accepted in one request
    #[serde(default = "default_batch_max_messages")]
    pub max_messages: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            delay_ms: default_batch_delay_ms(),
            max_messages: default_batch_max_messages(),
        }
    }
}

impl BatchConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
