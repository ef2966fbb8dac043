use crate::core::types::{HealthRecord, ProviderCategory, ProviderConfig, UsageRecord};
use crate::storage::ProviderConfigStore;
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, provider_config};
use super::types::SeaOrmConfigStore;

impl SeaOrmConfigStore {
    async fn find_row(
        &self,
        category: ProviderCategory,
        name: &str,
    ) -> Result<Option<provider_config::Model>> {
        entities::ProviderConfigs::find()
            .filter(provider_config::Column::Category.eq(category.as_str()))
            .filter(provider_config::Column::ProviderKey.eq(provider_config::provider_key(name)))
            .one(&self.db)
            .await
            .map_err(ServiceError::Database)
    }

    async fn require_row(
        &self,
        category: ProviderCategory,
        name: &str,
    ) -> Result<provider_config::Model> {
        self.find_row(category, name).await?.ok_or_else(|| {
            ServiceError::not_found(format!("provider {} in category {}", name, category))
        })
    }

    async fn find_where(
        &self,
        category: ProviderCategory,
        active_only: bool,
    ) -> Result<Vec<ProviderConfig>> {
        let mut query = entities::ProviderConfigs::find()
            .filter(provider_config::Column::Category.eq(category.as_str()));
        if active_only {
            query = query.filter(provider_config::Column::IsActive.eq(true));
        }

        let rows = query
            .order_by_asc(provider_config::Column::ProviderKey)
            .all(&self.db)
            .await
            .map_err(ServiceError::Database)?;

        rows.iter().map(provider_config::Model::to_domain).collect()
    }
}

#[async_trait]
impl ProviderConfigStore for SeaOrmConfigStore {
    async fn find_active(&self, category: ProviderCategory) -> Result<Vec<ProviderConfig>> {
        debug!(category = %category, "Loading active provider configs");
        self.find_where(category, true).await
    }

    async fn find_all(&self, category: ProviderCategory) -> Result<Vec<ProviderConfig>> {
        self.find_where(category, false).await
    }

    async fn get(
        &self,
        category: ProviderCategory,
        name: &str,
    ) -> Result<Option<ProviderConfig>> {
        self.find_row(category, name)
            .await?
            .map(|row| row.to_domain())
            .transpose()
    }

    async fn save(&self, config: &ProviderConfig) -> Result<()> {
        debug!(
            category = %config.category,
            provider = %config.provider_name,
            "Saving provider config"
        );

        let mut active = provider_config::Model::from_domain(config)?;
        active.updated_at = Set(Utc::now().into());

        match self.find_row(config.category, &config.provider_name).await? {
            Some(existing) => {
                active.id = Set(existing.id);
                active.created_at = Set(existing.created_at);
                active.update(&self.db).await.map_err(ServiceError::Database)?;
            }
            None => {
                entities::ProviderConfigs::insert(active)
                    .exec(&self.db)
                    .await
                    .map_err(ServiceError::Database)?;
            }
        }
        Ok(())
    }

    async fn update_health(
        &self,
        category: ProviderCategory,
        name: &str,
        health: &HealthRecord,
    ) -> Result<()> {
        let mut active: provider_config::ActiveModel =
            self.require_row(category, name).await?.into();
        active.health_status = Set(serde_json::to_value(health)?);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await.map_err(ServiceError::Database)?;
        Ok(())
    }

    async fn update_usage(
        &self,
        category: ProviderCategory,
        name: &str,
        usage: &UsageRecord,
    ) -> Result<()> {
        let mut active: provider_config::ActiveModel =
            self.require_row(category, name).await?.into();
        active.usage = Set(serde_json::to_value(usage)?);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await.map_err(ServiceError::Database)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        entities::ProviderConfigs::find()
            .count(&self.db)
            .await
            .map_err(ServiceError::Database)
    }
}
