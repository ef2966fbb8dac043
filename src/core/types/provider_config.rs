//! Persisted provider configuration
//!
//! One [`ProviderConfig`] describes one adapter instance: its identity within
//! a category, the routing flags the registry orders by, the vendor
//! credentials and settings the adapter is built from, and the health and
//! usage fields written back by the health monitor and usage accumulator.

use super::category::ProviderCategory;
use crate::utils::sanitization::mask_credentials;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of monthly usage buckets kept per provider
pub const MAX_MONTHLY_BUCKETS: usize = 12;

fn default_active() -> bool {
    true
}

/// Configuration of one provider instance
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub category: ProviderCategory,
    /// Unique within the category; selects the adapter implementation
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_primary: bool,
    /// Lower values are preferred
    #[serde(default)]
    pub priority: i32,
    /// Secret vendor fields (API keys, tokens)
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
    /// Non-secret vendor settings (`api_base`, `from_email`, ...)
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub rate_limits: RateLimits,
    #[serde(default)]
    pub health_status: HealthRecord,
    #[serde(default)]
    pub usage: UsageRecord,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl ProviderConfig {
    /// Create an active, non-primary config with no credentials
    pub fn new(category: ProviderCategory, provider_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            category,
            provider_name: provider_name.into(),
            display_name: None,
            is_active: true,
            is_primary: false,
            priority: 0,
            credentials: BTreeMap::new(),
            settings: BTreeMap::new(),
            rate_limits: RateLimits::default(),
            health_status: HealthRecord::default(),
            usage: UsageRecord::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_credential(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.credentials.insert(key.into(), value.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn with_rate_limits(mut self, rate_limits: RateLimits) -> Self {
        self.rate_limits = rate_limits;
        self
    }

    /// Non-empty credential value
    pub fn credential(&self, key: &str) -> Option<&str> {
        self.credentials
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Non-empty setting value
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Human-readable name, falling back to the provider name
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.provider_name)
    }

    /// Case-insensitive provider name match
    pub fn is_named(&self, name: &str) -> bool {
        self.provider_name.eq_ignore_ascii_case(name)
    }

    /// Copy safe to hand to external readers: credentials masked to their last four characters
    pub fn redacted(&self) -> Self {
        Self {
            credentials: mask_credentials(&self.credentials),
            ..self.clone()
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("category", &self.category)
            .field("provider_name", &self.provider_name)
            .field("display_name", &self.display_name)
            .field("is_active", &self.is_active)
            .field("is_primary", &self.is_primary)
            .field("priority", &self.priority)
            .field("credentials", &mask_credentials(&self.credentials))
            .field("settings", &self.settings)
            .field("rate_limits", &self.rate_limits)
            .field("health_status", &self.health_status)
            .field("usage", &self.usage)
            .finish()
    }
}

/// Vendor request quotas (informational, reported with stats)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_day: Option<u32>,
}

/// Health classification written to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthState {
    Healthy,
    /// Reachable but slow
    Warning,
    Error,
    #[default]
    Unknown,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Healthy => "HEALTHY",
            HealthState::Warning => "WARNING",
            HealthState::Error => "ERROR",
            HealthState::Unknown => "UNKNOWN",
        }
    }
}

/// Last recorded health probe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: HealthState,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    #[serde(default)]
    pub last_error: Option<String>,
}

/// Usage counters persisted with the config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub successful_requests: u64,
    #[serde(default)]
    pub failed_requests: u64,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    /// Oldest first, at most [`MAX_MONTHLY_BUCKETS`] entries
    #[serde(default)]
    pub monthly_usage: Vec<MonthlyUsage>,
}

/// Usage within one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyUsage {
    /// `YYYY-MM`
    pub month: String,
    pub requests: u64,
    #[serde(default)]
    pub successful_requests: u64,
    /// Percentage of successful requests, 0-100
    pub success_rate: f64,
}

impl MonthlyUsage {
    pub fn new(month: impl Into<String>, requests: u64, successful_requests: u64) -> Self {
        Self {
            month: month.into(),
            requests,
            successful_requests,
            success_rate: success_rate(requests, successful_requests),
        }
    }
}

/// Success percentage rounded to two decimals; 0 when nothing was requested
pub fn success_rate(requests: u64, successful: u64) -> f64 {
    if requests == 0 {
        return 0.0;
    }
    let rate = successful as f64 / requests as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
