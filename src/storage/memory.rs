//! In-process provider config store

use super::ProviderConfigStore;
use crate::core::types::{HealthRecord, ProviderCategory, ProviderConfig, UsageRecord};
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;

type StoreKey = (ProviderCategory, String);

fn key(category: ProviderCategory, name: &str) -> StoreKey {
    (category, name.to_ascii_lowercase())
}

/// Map-backed store; contents are lost on restart
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    configs: RwLock<BTreeMap<StoreKey, ProviderConfig>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `configs`
    pub fn with_configs(configs: impl IntoIterator<Item = ProviderConfig>) -> Self {
        let store = Self::new();
        {
            let mut map = store.configs.write();
            for config in configs {
                map.insert(key(config.category, &config.provider_name), config);
            }
        }
        store
    }

    fn modify<F>(&self, category: ProviderCategory, name: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut ProviderConfig),
    {
        let mut configs = self.configs.write();
        let config = configs.get_mut(&key(category, name)).ok_or_else(|| {
            ServiceError::not_found(format!("provider {} in category {}", name, category))
        })?;
        apply(config);
        config.updated_at = Utc::now();
        Ok(())
    }

    fn select<P>(&self, category: ProviderCategory, predicate: P) -> Vec<ProviderConfig>
    where
        P: Fn(&ProviderConfig) -> bool,
    {
        self.configs
            .read()
            .values()
            .filter(|c| c.category == category && predicate(c))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProviderConfigStore for InMemoryConfigStore {
    async fn find_active(&self, category: ProviderCategory) -> Result<Vec<ProviderConfig>> {
        Ok(self.select(category, |c| c.is_active))
    }

    async fn find_all(&self, category: ProviderCategory) -> Result<Vec<ProviderConfig>> {
        Ok(self.select(category, |_| true))
    }

    async fn get(
        &self,
        category: ProviderCategory,
        name: &str,
    ) -> Result<Option<ProviderConfig>> {
        Ok(self.configs.read().get(&key(category, name)).cloned())
    }

    async fn save(&self, config: &ProviderConfig) -> Result<()> {
        let mut configs = self.configs.write();
        let key = key(config.category, &config.provider_name);
        let mut stored = config.clone();
        if let Some(existing) = configs.get(&key) {
            stored.created_at = existing.created_at;
        }
        stored.updated_at = Utc::now();
        configs.insert(key, stored);
        Ok(())
    }

    async fn update_health(
        &self,
        category: ProviderCategory,
        name: &str,
        health: &HealthRecord,
    ) -> Result<()> {
        self.modify(category, name, |c| c.health_status = health.clone())
    }

    async fn update_usage(
        &self,
        category: ProviderCategory,
        name: &str,
        usage: &UsageRecord,
    ) -> Result<()> {
        self.modify(category, name, |c| c.usage = usage.clone())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.configs.read().len() as u64)
    }
}
