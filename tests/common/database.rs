//! Test database utilities
//!
//! Each call creates a completely isolated in-memory SQLite database.

use provider_failover::config::DatabaseConfig;
use provider_failover::storage::{self, ProviderConfigStore};
use std::sync::Arc;

pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // In-memory DB only supports 1 connection
        max_connections: 1,
        connection_timeout: 5,
        run_migrations: true,
    }
}

/// Migrated SQLite store
pub async fn sqlite_store() -> Arc<dyn ProviderConfigStore> {
    storage::connect(&test_db_config())
        .await
        .expect("Failed to create in-memory test database")
}
