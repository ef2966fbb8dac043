//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::orchestrator::FailoverOrchestrator;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Both fields are `Arc`s so cloning the state per worker is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Failover orchestrator every dispatch goes through
    pub orchestrator: Arc<FailoverOrchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<FailoverOrchestrator>) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
