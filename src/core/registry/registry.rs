//! Registry handle

use super::loader::{load_category, registry_order};
use super::types::{CategorySet, LoadedProvider, RegistrySnapshot};
use crate::core::providers::AdapterFactory;
use crate::core::types::{ProviderCategory, ProviderConfig};
use crate::core::usage::UsageAccumulator;
use crate::storage::ProviderConfigStore;
use crate::utils::error::{Result, ServiceError};
use arc_swap::ArcSwap;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Live adapters per category, rebuilt from the store on reload
pub struct ProviderRegistry {
    store: Arc<dyn ProviderConfigStore>,
    factory: AdapterFactory,
    snapshot: ArcSwap<RegistrySnapshot>,
    /// Seeded from stored usage before a live provider is published
    usage: Arc<UsageAccumulator>,
    health_timeout: Duration,
    /// Serializes reloads; readers never take it
    reload_lock: Mutex<()>,
}

impl ProviderRegistry {
    /// Create an empty registry; call [`ProviderRegistry::init`] to load it
    pub fn new(
        store: Arc<dyn ProviderConfigStore>,
        factory: AdapterFactory,
        health_timeout: Duration,
    ) -> Self {
        Self {
            store,
            factory,
            snapshot: ArcSwap::from_pointee(RegistrySnapshot::default()),
            usage: Arc::new(UsageAccumulator::new()),
            health_timeout,
            reload_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn ProviderConfigStore> {
        &self.store
    }

    /// Usage counters of every provider this registry has published
    pub fn usage(&self) -> &Arc<UsageAccumulator> {
        &self.usage
    }

    /// Load every category
    pub async fn init(&self) -> Result<()> {
        info!("Initializing provider registry");
        self.reload(None).await
    }

    /// Build the live set of one category without publishing it
    pub async fn load(&self, category: ProviderCategory) -> Result<CategorySet> {
        load_category(
            self.store.as_ref(),
            &self.factory,
            category,
            self.health_timeout,
        )
        .await
    }

    /// Rebuild one category, or all of them, and publish the result atomically
    ///
    /// Categories whose load fails keep their previous live set; the first
    /// failure is returned after the others are published.
    pub async fn reload(&self, category: Option<ProviderCategory>) -> Result<()> {
        let _guard = self.reload_lock.lock().await;

        let categories: Vec<ProviderCategory> = match category {
            Some(category) => vec![category],
            None => ProviderCategory::ALL.to_vec(),
        };
        let results = join_all(categories.iter().map(|c| self.load(*c))).await;

        let current = self.snapshot.load_full();
        let mut next = current.categories.clone();
        let mut first_error = None;
        for (category, result) in categories.into_iter().zip(results) {
            match result {
                Ok(set) => {
                    for provider in &set.live {
                        self.usage.seed(&provider.config);
                    }
                    next.insert(category, Arc::new(set));
                }
                Err(e) => {
                    error!(category = %category, error = %e, "Category reload failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        let generation = current.generation + 1;
        self.snapshot.store(Arc::new(RegistrySnapshot {
            categories: next,
            generation,
        }));
        info!(generation, "Provider registry published");

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Current immutable view
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.snapshot.load_full()
    }

    /// Live providers in dispatch order
    ///
    /// A `preferred` name that matches a live provider moves it to the front.
    /// An unknown or excluded preferred name is ignored.
    pub fn get_ordered_candidates(
        &self,
        category: ProviderCategory,
        preferred: Option<&str>,
    ) -> Vec<Arc<LoadedProvider>> {
        let snapshot = self.snapshot.load();
        let live = snapshot.live(category);

        let preferred = preferred
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .and_then(|name| live.iter().position(|p| p.config.is_named(name)));

        match preferred {
            Some(index) => {
                let mut candidates = Vec::with_capacity(live.len());
                candidates.push(live[index].clone());
                candidates.extend(
                    live.iter()
                        .enumerate()
                        .filter(|(i, _)| *i != index)
                        .map(|(_, p)| p.clone()),
                );
                candidates
            }
            None => live.to_vec(),
        }
    }

    /// Make `name` the only primary of its category, then reload the category
    pub async fn set_primary(&self, category: ProviderCategory, name: &str) -> Result<()> {
        let configs = self.store.find_all(category).await?;
        let target = configs.iter().find(|c| c.is_named(name)).ok_or_else(|| {
            ServiceError::not_found(format!("provider {} in category {}", name, category))
        })?;
        if !target.is_active {
            return Err(ServiceError::validation(format!(
                "provider {} is inactive and cannot be primary",
                target.provider_name
            )));
        }

        for config in configs.iter() {
            let primary = config.is_named(name);
            if config.is_primary != primary {
                let mut updated = config.clone();
                updated.is_primary = primary;
                self.store.save(&updated).await?;
            }
        }

        info!(category = %category, provider = %name, "Primary provider changed");
        self.reload(Some(category)).await
    }

    /// Activate or deactivate a provider, then reload the category
    ///
    /// Deactivating the primary also clears its primary flag.
    pub async fn set_active(
        &self,
        category: ProviderCategory,
        name: &str,
        active: bool,
    ) -> Result<()> {
        let mut config = self.store.get(category, name).await?.ok_or_else(|| {
            ServiceError::not_found(format!("provider {} in category {}", name, category))
        })?;

        config.is_active = active;
        if !active {
            config.is_primary = false;
        }
        self.store.save(&config).await?;

        info!(category = %category, provider = %name, active, "Provider activation changed");
        self.reload(Some(category)).await
    }

    /// Every stored config of a category in registry order, credentials masked
    pub async fn list_configs(&self, category: ProviderCategory) -> Result<Vec<ProviderConfig>> {
        let mut configs = self.store.find_all(category).await?;
        configs.sort_by(registry_order);
        Ok(configs.iter().map(ProviderConfig::redacted).collect())
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("generation", &self.snapshot.load().generation)
            .field("health_timeout", &self.health_timeout)
            .finish()
    }
}
