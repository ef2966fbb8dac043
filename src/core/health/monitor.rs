//! Health monitor implementation

use super::types::{CategoryHealth, HealthReport};
use crate::core::registry::{ProviderRegistry, loader::probe};
use crate::core::types::ProviderCategory;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Probes the live set on demand or on an interval
///
/// Probing never changes the live set: an adapter that turns unhealthy
/// stays a candidate, and a recovered one is not re-admitted, until the
/// registry reloads its category.
#[derive(Debug)]
pub struct HealthMonitor {
    registry: Arc<ProviderRegistry>,
    timeout: Duration,
}

impl HealthMonitor {
    pub fn new(registry: Arc<ProviderRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Probe every live provider concurrently
    pub async fn check_all(&self) -> HealthReport {
        let snapshot = self.registry.snapshot();

        let mut categories: BTreeMap<ProviderCategory, CategoryHealth> = BTreeMap::new();
        let mut targets = Vec::new();
        for (category, set) in snapshot.categories.iter() {
            if set.live.is_empty() && set.excluded.is_empty() {
                continue;
            }
            categories.insert(
                *category,
                CategoryHealth {
                    providers: BTreeMap::new(),
                    excluded: set.excluded.clone(),
                },
            );
            targets.extend(set.live.iter().cloned());
        }

        let results = join_all(
            targets
                .iter()
                .map(|provider| probe(&provider.adapter, self.timeout)),
        )
        .await;
        let checked_at = chrono::Utc::now();

        for (provider, result) in targets.iter().zip(results) {
            if !result.healthy {
                debug!(
                    category = %provider.category(),
                    provider = %provider.name(),
                    error = result.error.as_deref().unwrap_or("unknown"),
                    "Provider probe failed"
                );
            }
            if let Some(category) = categories.get_mut(&provider.category()) {
                category
                    .providers
                    .insert(provider.name().to_string(), (&result).into());
            }
        }

        HealthReport::from_categories(checked_at, categories)
    }

    /// Write every probed status to the store
    pub async fn persist(&self, report: &HealthReport) -> usize {
        let store = self.registry.store();
        let mut written = 0;
        for (category, health) in &report.categories {
            for (name, status) in &health.providers {
                match store
                    .update_health(*category, name, &status.to_record(report.checked_at))
                    .await
                {
                    Ok(()) => written += 1,
                    Err(e) => warn!(
                        category = %category,
                        provider = %name,
                        error = %e,
                        "Failed to persist health status"
                    ),
                }
            }
        }
        written
    }

    /// Re-probe and persist every `interval` until aborted
    pub fn spawn_periodic(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        info!(interval_secs = interval.as_secs(), "Starting periodic health checks");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; the registry just probed at load
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let report = self.check_all().await;
                let written = self.persist(&report).await;
                debug!(
                    overall = ?report.overall,
                    written,
                    "Periodic health check complete"
                );
            }
        })
    }
}
