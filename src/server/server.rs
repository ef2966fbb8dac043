//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, ServerConfig};
use crate::core::orchestrator::FailoverOrchestrator;
use crate::core::providers::AdapterFactory;
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::{self, ProviderConfigStore};
use crate::utils::error::{Result, ServiceError};
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Connect the configuration store and build the server with the built-in adapters
    pub async fn new(config: &Config) -> Result<Self> {
        let store = storage::connect(&config.storage.database).await?;
        Self::with_parts(config, store, AdapterFactory::with_builtin()).await
    }

    /// Build the server over an existing store and adapter factory
    ///
    /// Seeds an empty store from `config.providers`, loads every category and
    /// starts the background tasks.
    pub async fn with_parts(
        config: &Config,
        store: Arc<dyn ProviderConfigStore>,
        factory: AdapterFactory,
    ) -> Result<Self> {
        info!("Creating HTTP server");

        let seeded = storage::seed_if_empty(store.as_ref(), &config.providers).await?;
        if seeded > 0 {
            info!(providers = seeded, "Seeded configuration store");
        }

        let orchestrator = Arc::new(FailoverOrchestrator::new(
            store,
            factory,
            config.orchestrator.clone(),
        ));
        orchestrator.init().await?;
        orchestrator.spawn_background_tasks();

        Ok(Self {
            config: config.server.clone(),
            state: AppState::new(config.clone(), orchestrator),
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let max_body_size = state.config.server.max_body_size;

        App::new()
            .app_data(state)
            .app_data(routes::json_config(max_body_size))
            .app_data(routes::query_config())
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "provider-failover")))
            .configure(routes::configure_routes)
    }

    /// Serve until the process is signalled, then stop background tasks and flush usage
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.bind_address();
        info!("Starting HTTP server on {}", bind_addr);

        let orchestrator = self.state.orchestrator.clone();
        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }
        let server = server
            .bind(&bind_addr)
            .map_err(|e| ServiceError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);
        let served = server
            .await
            .map_err(|e| ServiceError::internal(format!("Server error: {}", e)));

        orchestrator.shutdown().await;
        info!("HTTP server stopped");
        served
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
