// Module declarations
mod connection;
mod provider_config_ops;
mod types;

// Re-export public types
pub use types::{DatabaseBackendType, SeaOrmConfigStore};
