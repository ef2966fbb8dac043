//! Failover orchestrator implementation

use super::error::FailoverError;
use super::types::{Attempt, BatchOptions, DispatchOptions, FailoverResult};
use crate::config::OrchestratorConfig;
use crate::core::health::{HealthMonitor, HealthReport};
use crate::core::providers::{AdapterFactory, ProviderError};
use crate::core::registry::ProviderRegistry;
use crate::core::types::{ProviderCategory, ProviderRequest, RequestContext};
use crate::core::usage::{MonthRange, UsageAccumulator, UsageReport};
use crate::storage::ProviderConfigStore;
use crate::utils::error::Result;
use crate::utils::generate_request_id;
use chrono::Utc;
use futures::future::join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Dispatches requests across the live providers of a category
///
/// Lifecycle: [`new`](Self::new), [`init`](Self::init), optionally
/// [`spawn_background_tasks`](Self::spawn_background_tasks), serve, and
/// [`shutdown`](Self::shutdown) to stop the tasks and flush usage.
pub struct FailoverOrchestrator {
    config: OrchestratorConfig,
    registry: Arc<ProviderRegistry>,
    usage: Arc<UsageAccumulator>,
    health: Arc<HealthMonitor>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl FailoverOrchestrator {
    pub fn new(
        store: Arc<dyn ProviderConfigStore>,
        factory: AdapterFactory,
        config: OrchestratorConfig,
    ) -> Self {
        let registry = Arc::new(ProviderRegistry::new(
            store,
            factory,
            config.health_check_timeout(),
        ));
        let health = Arc::new(HealthMonitor::new(
            registry.clone(),
            config.health_check_timeout(),
        ));

        Self {
            config,
            usage: registry.usage().clone(),
            registry,
            health,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Load every category; live providers resume their stored usage
    pub async fn init(&self) -> Result<()> {
        self.registry.init().await
    }

    /// Rebuild one category, or all, from the store
    pub async fn reload(&self, category: Option<ProviderCategory>) -> Result<()> {
        self.registry.reload(category).await
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn usage(&self) -> &Arc<UsageAccumulator> {
        &self.usage
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Start periodic health probing and usage flushing
    pub fn spawn_background_tasks(self: &Arc<Self>) {
        let mut tasks = self.tasks.lock();

        if let Some(interval) = self.config.health_check_interval() {
            tasks.push(self.health.clone().spawn_periodic(interval));
        }

        let interval = self.config.usage_flush_interval();
        let usage = self.usage.clone();
        let store = self.registry.store().clone();
        tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                usage.flush(store.as_ref()).await;
            }
        }));

        info!(tasks = tasks.len(), "Background tasks started");
    }

    /// Stop background tasks and flush usage counters
    pub async fn shutdown(&self) {
        info!("Shutting down orchestrator");
        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            task.abort();
        }

        let written = self.usage.flush(self.registry.store().as_ref()).await;
        info!(flushed = written, "Orchestrator shutdown complete");
    }

    /// Time allowed for the next attempt, or `None` once the deadline passed
    fn attempt_timeout(&self, category: ProviderCategory, deadline: Option<Instant>) -> Option<Duration> {
        let timeout = self.config.timeouts.for_category(category);
        match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                (!remaining.is_zero()).then(|| remaining.min(timeout))
            }
            None => Some(timeout),
        }
    }

    /// Run `request` against the candidates of its category
    pub async fn dispatch(
        &self,
        request: &ProviderRequest,
        options: &DispatchOptions,
    ) -> FailoverResult {
        let request_id = generate_request_id();
        let category = request.category();
        let operation = request.operation();
        let is_write = request.is_write();

        let candidates = self
            .registry
            .get_ordered_candidates(category, options.preferred_provider.as_deref());
        if candidates.is_empty() {
            warn!(
                request_id = %request_id,
                category = %category,
                operation = %operation,
                "No provider configured"
            );
            return FailoverResult::failed(
                request_id,
                category,
                operation,
                FailoverError::NoProviderConfigured { category },
                Vec::new(),
            );
        }

        let mut attempts: Vec<Attempt> = Vec::with_capacity(candidates.len());
        for (index, provider) in candidates.iter().enumerate() {
            let Some(timeout) = self.attempt_timeout(category, options.deadline) else {
                warn!(
                    request_id = %request_id,
                    category = %category,
                    operation = %operation,
                    attempts = attempts.len(),
                    "Deadline reached before next provider"
                );
                break;
            };

            let name = provider.name();
            debug!(
                request_id = %request_id,
                category = %category,
                provider = %name,
                operation = %operation,
                attempt = index + 1,
                timeout_ms = timeout.as_millis() as u64,
                "Dispatching to provider"
            );

            let context = RequestContext::new(request_id.clone(), timeout);
            let started = Instant::now();
            let outcome =
                match tokio::time::timeout(timeout, provider.adapter.execute(request, &context))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ProviderError::timeout(
                        name,
                        format!("no response within {}ms", timeout.as_millis()),
                    )),
                };
            let latency_ms = started.elapsed().as_millis() as u64;
            self.usage
                .record_outcome(category, name, outcome.is_ok(), Utc::now());

            let error = match outcome {
                Ok(data) => {
                    attempts.push(Attempt::success(name, latency_ms));
                    info!(
                        request_id = %request_id,
                        category = %category,
                        provider = %name,
                        operation = %operation,
                        attempt = index + 1,
                        latency_ms,
                        "Provider succeeded"
                    );
                    return FailoverResult::succeeded(
                        request_id, category, operation, name, data, attempts,
                    );
                }
                Err(error) => error,
            };
            attempts.push(Attempt::failure(name, &error, latency_ms));

            if error.is_ambiguous() && is_write {
                error!(
                    request_id = %request_id,
                    category = %category,
                    provider = %name,
                    operation = %operation,
                    attempt = index + 1,
                    error = %error,
                    "Write failed with unknown outcome, not failing over"
                );
                return FailoverResult::failed(
                    request_id,
                    category,
                    operation,
                    FailoverError::ProviderAmbiguous {
                        provider: name.to_string(),
                        message: error.to_string(),
                    },
                    attempts,
                );
            }

            warn!(
                request_id = %request_id,
                category = %category,
                provider = %name,
                operation = %operation,
                attempt = index + 1,
                error = %error,
                "Provider failed"
            );

            if !options.enable_failover {
                return FailoverResult::failed(
                    request_id,
                    category,
                    operation,
                    FailoverError::ProviderRejection {
                        provider: name.to_string(),
                        message: error.to_string(),
                    },
                    attempts,
                );
            }
        }

        error!(
            request_id = %request_id,
            category = %category,
            operation = %operation,
            attempts = attempts.len(),
            "All providers failed"
        );
        let attempted = attempts.len();
        FailoverResult::failed(
            request_id,
            category,
            operation,
            FailoverError::AllProvidersExhausted {
                category,
                attempted,
            },
            attempts,
        )
    }

    /// Dispatch `requests` in windows of `batch.batch_size`, pausing between windows
    ///
    /// Results are in input order; one item's failure never stops the batch.
    pub async fn dispatch_batch(
        &self,
        requests: &[ProviderRequest],
        options: &DispatchOptions,
        batch: BatchOptions,
    ) -> Vec<FailoverResult> {
        let window = batch.batch_size.max(1);
        let mut results = Vec::with_capacity(requests.len());

        for (index, chunk) in requests.chunks(window).enumerate() {
            if index > 0 && !batch.delay.is_zero() {
                tokio::time::sleep(batch.delay).await;
            }
            let chunk_results =
                join_all(chunk.iter().map(|request| self.dispatch(request, options))).await;
            results.extend(chunk_results);
        }

        debug!(
            items = results.len(),
            succeeded = results.iter().filter(|r| r.success).count(),
            "Batch dispatch complete"
        );
        results
    }

    /// Probe every live provider
    pub async fn health_check_all(&self) -> HealthReport {
        self.health.check_all().await
    }

    /// Usage of one category, or all, restricted to `range`
    pub async fn provider_stats(
        &self,
        category: Option<ProviderCategory>,
        range: &MonthRange,
    ) -> Result<UsageReport> {
        let categories = match category {
            Some(category) => vec![category],
            None => ProviderCategory::ALL.to_vec(),
        };

        let mut configs = Vec::new();
        for category in categories {
            configs.extend(self.registry.store().find_all(category).await?);
        }
        Ok(self.usage.report(&configs, range))
    }

    /// Write dirty usage counters now
    pub async fn flush_usage(&self) -> usize {
        self.usage.flush(self.registry.store().as_ref()).await
    }
}

impl std::fmt::Debug for FailoverOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverOrchestrator")
            .field("registry", &self.registry)
            .field("background_tasks", &self.tasks.lock().len())
            .finish()
    }
}
