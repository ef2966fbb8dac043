//! Registry snapshot types

use crate::core::providers::{Adapter, HealthCheckResult};
use crate::core::types::{ProviderCategory, ProviderConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// An adapter admitted to the live set, with the config and probe it was loaded from
#[derive(Debug)]
pub struct LoadedProvider {
    pub adapter: Adapter,
    pub config: ProviderConfig,
    pub health: HealthCheckResult,
}

impl LoadedProvider {
    pub fn name(&self) -> &str {
        &self.config.provider_name
    }

    pub fn category(&self) -> ProviderCategory {
        self.config.category
    }
}

/// Why a configured provider is not live
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The adapter could not be constructed
    Configuration { message: String },
    /// The load-time probe failed
    Unhealthy {
        error: Option<String>,
        response_time_ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedProvider {
    pub provider_name: String,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

/// Outcome of loading one category
#[derive(Debug)]
pub struct CategorySet {
    pub category: ProviderCategory,
    /// Primary first, then ascending priority
    pub live: Vec<Arc<LoadedProvider>>,
    pub excluded: Vec<ExcludedProvider>,
    pub loaded_at: DateTime<Utc>,
}

impl CategorySet {
    pub fn empty(category: ProviderCategory) -> Self {
        Self {
            category,
            live: Vec::new(),
            excluded: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    pub fn live_names(&self) -> Vec<&str> {
        self.live.iter().map(|p| p.name()).collect()
    }

    pub fn find_live(&self, name: &str) -> Option<&Arc<LoadedProvider>> {
        self.live.iter().find(|p| p.config.is_named(name))
    }
}

/// Immutable view of every category
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    pub categories: HashMap<ProviderCategory, Arc<CategorySet>>,
    /// Incremented on every publish
    pub generation: u64,
}

impl RegistrySnapshot {
    pub fn category(&self, category: ProviderCategory) -> Option<&Arc<CategorySet>> {
        self.categories.get(&category)
    }

    pub fn live(&self, category: ProviderCategory) -> &[Arc<LoadedProvider>] {
        self.categories
            .get(&category)
            .map(|set| set.live.as_slice())
            .unwrap_or_default()
    }
}
