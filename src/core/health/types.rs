//! Health report types

use crate::core::providers::HealthCheckResult;
use crate::core::registry::ExcludedProvider;
use crate::core::types::{HealthRecord, HealthState, ProviderCategory};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate verdict over every probed provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Healthy,
    Degraded,
}

impl OverallHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, OverallHealth::Healthy)
    }
}

/// Probe result of one live provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderHealthStatus {
    pub status: HealthState,
    pub healthy: bool,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&HealthCheckResult> for ProviderHealthStatus {
    fn from(result: &HealthCheckResult) -> Self {
        Self {
            status: result.state(),
            healthy: result.healthy,
            response_time_ms: result.response_time_ms,
            error: result.error.clone(),
        }
    }
}

impl ProviderHealthStatus {
    pub fn to_record(&self, checked_at: DateTime<Utc>) -> HealthRecord {
        HealthRecord {
            last_checked: Some(checked_at),
            status: self.status,
            response_time_ms: Some(self.response_time_ms),
            last_error: self.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryHealth {
    /// Live providers keyed by name
    pub providers: BTreeMap<String, ProviderHealthStatus>,
    /// Providers left out of the live set at the last load
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<ExcludedProvider>,
}

/// Result of probing every live provider
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub overall: OverallHealth,
    pub checked_at: DateTime<Utc>,
    pub categories: BTreeMap<ProviderCategory, CategoryHealth>,
}

impl HealthReport {
    /// `healthy` only if every probed provider is; vacuously healthy when none are live
    pub fn from_categories(
        checked_at: DateTime<Utc>,
        categories: BTreeMap<ProviderCategory, CategoryHealth>,
    ) -> Self {
        let all_healthy = categories
            .values()
            .flat_map(|c| c.providers.values())
            .all(|p| p.healthy);
        Self {
            overall: if all_healthy {
                OverallHealth::Healthy
            } else {
                OverallHealth::Degraded
            },
            checked_at,
            categories,
        }
    }

    pub fn provider(&self, category: ProviderCategory, name: &str) -> Option<&ProviderHealthStatus> {
        self.categories.get(&category)?.providers.get(name)
    }
}
