//! Server builder and run_server function

use crate::config::Config;
use crate::core::providers::AdapterFactory;
use crate::server::server::HttpServer;
use crate::storage::ProviderConfigStore;
use crate::utils::error::{Result, ServiceError};
use std::sync::Arc;
use tracing::info;

/// Server builder for easier configuration
///
/// Without a store the one named by `storage.database` is connected; without
/// a factory the built-in vendor adapters are used.
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    store: Option<Arc<dyn ProviderConfigStore>>,
    factory: Option<AdapterFactory>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ProviderConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_factory(mut self, factory: AdapterFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| ServiceError::config("Configuration is required"))?;

        let store = match self.store {
            Some(store) => store,
            None => crate::storage::connect(&config.storage.database).await?,
        };
        let factory = self.factory.unwrap_or_else(AdapterFactory::with_builtin);

        HttpServer::with_parts(&config, store, factory).await
    }
}

/// Build and run the server for an already loaded configuration
pub async fn run_server(config: Config) -> Result<()> {
    let server = ServerBuilder::new().with_config(config).build().await?;

    let bind = server.config().bind_address();
    info!("Server starting at: http://{}", bind);
    info!("API Endpoints:");
    info!("   GET  /health - Liveness");
    info!("   POST /api/v1/tax/calculate - Tax calculation");
    info!("   POST /api/v1/email/send - Email delivery");
    info!("   POST /api/v1/sms/send - SMS delivery");
    info!("   POST /api/v1/payments/charges - Card charges");
    info!("   GET  /api/v1/providers/health - Provider health");

    server.start().await
}
