use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::{ProviderCategory, ProviderConfig};
use crate::utils::error::ServiceError;

/// Provider config database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Category name (`EMAIL`, `SMS`, `TAX`, `PAYMENT`)
    pub category: String,

    /// Provider name as configured
    pub provider_name: String,

    /// Lowercased provider name, unique within a category
    pub provider_key: String,

    pub display_name: Option<String>,

    pub is_active: bool,

    pub is_primary: bool,

    pub priority: i32,

    pub credentials: Json,

    pub settings: Json,

    pub rate_limits: Json,

    pub health_status: Json,

    pub usage: Json,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Key a provider name is stored and looked up under
pub fn provider_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl Model {
    /// Convert a database row into a domain config
    pub fn to_domain(&self) -> crate::utils::error::Result<ProviderConfig> {
        let category: ProviderCategory = self.category.parse().map_err(|e: String| {
            ServiceError::storage(format!("provider_configs row {}: {}", self.id, e))
        })?;

        Ok(ProviderConfig {
            category,
            provider_name: self.provider_name.clone(),
            display_name: self.display_name.clone(),
            is_active: self.is_active,
            is_primary: self.is_primary,
            priority: self.priority,
            credentials: serde_json::from_value(self.credentials.clone())?,
            settings: serde_json::from_value(self.settings.clone())?,
            rate_limits: serde_json::from_value(self.rate_limits.clone())?,
            health_status: serde_json::from_value(self.health_status.clone())?,
            usage: serde_json::from_value(self.usage.clone())?,
            created_at: self.created_at.naive_utc().and_utc(),
            updated_at: self.updated_at.naive_utc().and_utc(),
        })
    }

    /// Convert a domain config into an active model without a primary key
    pub fn from_domain(config: &ProviderConfig) -> crate::utils::error::Result<ActiveModel> {
        Ok(ActiveModel {
            id: sea_orm::NotSet,
            category: Set(config.category.as_str().to_string()),
            provider_name: Set(config.provider_name.clone()),
            provider_key: Set(provider_key(&config.provider_name)),
            display_name: Set(config.display_name.clone()),
            is_active: Set(config.is_active),
            is_primary: Set(config.is_primary),
            priority: Set(config.priority),
            credentials: Set(serde_json::to_value(&config.credentials)?),
            settings: Set(serde_json::to_value(&config.settings)?),
            rate_limits: Set(serde_json::to_value(&config.rate_limits)?),
            health_status: Set(serde_json::to_value(&config.health_status)?),
            usage: Set(serde_json::to_value(&config.usage)?),
            created_at: Set(config.created_at.into()),
            updated_at: Set(config.updated_at.into()),
        })
    }
}
