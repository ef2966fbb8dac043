//! Provider configs table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProviderConfigs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProviderConfigs::Category).string_len(16).not_null())
                    .col(ColumnDef::new(ProviderConfigs::ProviderName).string_len(64).not_null())
                    .col(ColumnDef::new(ProviderConfigs::ProviderKey).string_len(64).not_null())
                    .col(ColumnDef::new(ProviderConfigs::DisplayName).string_len(128))
                    .col(
                        ColumnDef::new(ProviderConfigs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ProviderConfigs::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProviderConfigs::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ProviderConfigs::Credentials).json().not_null())
                    .col(ColumnDef::new(ProviderConfigs::Settings).json().not_null())
                    .col(ColumnDef::new(ProviderConfigs::RateLimits).json().not_null())
                    .col(ColumnDef::new(ProviderConfigs::HealthStatus).json().not_null())
                    .col(ColumnDef::new(ProviderConfigs::Usage).json().not_null())
                    .col(
                        ColumnDef::new(ProviderConfigs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderConfigs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_provider_configs_category_key")
                    .table(ProviderConfigs::Table)
                    .col(ProviderConfigs::Category)
                    .col(ProviderConfigs::ProviderKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_provider_configs_category_active")
                    .table(ProviderConfigs::Table)
                    .col(ProviderConfigs::Category)
                    .col(ProviderConfigs::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProviderConfigs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProviderConfigs {
    Table,
    Id,
    Category,
    ProviderName,
    ProviderKey,
    DisplayName,
    IsActive,
    IsPrimary,
    Priority,
    Credentials,
    Settings,
    RateLimits,
    HealthStatus,
    Usage,
    CreatedAt,
    UpdatedAt,
}
