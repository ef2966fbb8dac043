//! Storage layer for provider configuration
//!
//! The registry, health monitor and usage accumulator only ever talk to a
//! [`ProviderConfigStore`]. Two backends exist: an in-process map for tests
//! and single-node deployments, and a SeaORM database.

/// Database storage module
pub mod database;
/// In-process storage module
pub mod memory;

use crate::config::DatabaseConfig;
use crate::core::types::{HealthRecord, ProviderCategory, ProviderConfig, UsageRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub use database::SeaOrmConfigStore;
pub use memory::InMemoryConfigStore;

/// Persistence of [`ProviderConfig`] records
///
/// Provider names are matched case-insensitively within a category.
#[async_trait]
pub trait ProviderConfigStore: Send + Sync {
    /// Active configs of a category
    async fn find_active(&self, category: ProviderCategory) -> Result<Vec<ProviderConfig>>;

    /// Every config of a category, active or not
    async fn find_all(&self, category: ProviderCategory) -> Result<Vec<ProviderConfig>>;

    async fn get(&self, category: ProviderCategory, name: &str)
    -> Result<Option<ProviderConfig>>;

    /// Insert or replace the config identified by its category and name
    async fn save(&self, config: &ProviderConfig) -> Result<()>;

    /// Overwrite only the health fields
    async fn update_health(
        &self,
        category: ProviderCategory,
        name: &str,
        health: &HealthRecord,
    ) -> Result<()>;

    /// Overwrite only the usage fields
    async fn update_usage(
        &self,
        category: ProviderCategory,
        name: &str,
        usage: &UsageRecord,
    ) -> Result<()>;

    /// Number of stored configs across all categories
    async fn count(&self) -> Result<u64>;
}

/// Open the store selected by the database URL
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn ProviderConfigStore>> {
    if config.is_memory() {
        info!("Using in-memory provider config store");
        return Ok(Arc::new(InMemoryConfigStore::new()));
    }

    let store = SeaOrmConfigStore::connect(config).await?;
    if config.run_migrations {
        store.migrate().await?;
    }
    Ok(Arc::new(store))
}

/// Write `seed` into an empty store; a populated store is left alone
pub async fn seed_if_empty(store: &dyn ProviderConfigStore, seed: &[ProviderConfig]) -> Result<usize> {
    if seed.is_empty() || store.count().await? > 0 {
        return Ok(0);
    }
    for config in seed {
        store.save(config).await?;
    }
    info!(count = seed.len(), "Seeded provider config store");
    Ok(seed.len())
}
