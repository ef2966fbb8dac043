//! Loading one category: order, construct, probe

use super::types::{CategorySet, ExcludedProvider, ExclusionReason, LoadedProvider};
use crate::core::providers::{Adapter, AdapterFactory, HealthCheckResult};
use crate::core::types::{ProviderCategory, ProviderConfig};
use crate::storage::ProviderConfigStore;
use crate::utils::error::Result;
use chrono::Utc;
use futures::future::join_all;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Registry order: primary first, then ascending priority, then name
pub fn registry_order(a: &ProviderConfig, b: &ProviderConfig) -> Ordering {
    (!a.is_primary, a.priority, a.provider_name.to_ascii_lowercase()).cmp(&(
        !b.is_primary,
        b.priority,
        b.provider_name.to_ascii_lowercase(),
    ))
}

/// Sort `configs` into registry order, keeping a single primary
pub fn order_configs(mut configs: Vec<ProviderConfig>) -> Vec<ProviderConfig> {
    configs.sort_by(registry_order);

    let mut seen_primary = false;
    for config in configs.iter_mut().filter(|c| c.is_primary) {
        if seen_primary {
            warn!(
                category = %config.category,
                provider = %config.provider_name,
                "Multiple primary providers configured, treating this one as secondary"
            );
            config.is_primary = false;
        }
        seen_primary = true;
    }

    configs.sort_by(registry_order);
    configs
}

/// Probe an adapter, turning a timeout into an unhealthy result
pub async fn probe(adapter: &Adapter, timeout: Duration) -> HealthCheckResult {
    let started = Instant::now();
    match tokio::time::timeout(timeout, adapter.health_check()).await {
        Ok(result) => result,
        Err(_) => HealthCheckResult::unhealthy(
            started.elapsed().as_millis() as u64,
            format!("health check timed out after {}ms", timeout.as_millis()),
        ),
    }
}

/// Build the live set of `category` from the store
///
/// A store read failure aborts the load. Construction failures and failed
/// probes only exclude the provider concerned; the stored activation flags
/// are never changed here, only `health_status`.
pub async fn load_category(
    store: &dyn ProviderConfigStore,
    factory: &AdapterFactory,
    category: ProviderCategory,
    health_timeout: Duration,
) -> Result<CategorySet> {
    let configs = order_configs(store.find_active(category).await?);
    debug!(category = %category, count = configs.len(), "Loading providers");

    let mut set = CategorySet::empty(category);
    let mut built: Vec<(ProviderConfig, Adapter)> = Vec::with_capacity(configs.len());
    for config in configs {
        match factory.build(&config) {
            Ok(adapter) => built.push((config, adapter)),
            Err(e) => {
                warn!(
                    category = %category,
                    provider = %config.provider_name,
                    error = %e,
                    "Provider excluded: adapter construction failed"
                );
                set.excluded.push(ExcludedProvider {
                    provider_name: config.provider_name,
                    reason: ExclusionReason::Configuration {
                        message: e.to_string(),
                    },
                });
            }
        }
    }

    let probes = join_all(built.iter().map(|(_, adapter)| probe(adapter, health_timeout))).await;
    let checked_at = Utc::now();

    for ((config, adapter), health) in built.into_iter().zip(probes) {
        if let Err(e) = store
            .update_health(category, &config.provider_name, &health.to_record(checked_at))
            .await
        {
            warn!(
                category = %category,
                provider = %config.provider_name,
                error = %e,
                "Failed to persist health status"
            );
        }

        if health.healthy {
            set.live.push(Arc::new(LoadedProvider {
                adapter,
                config,
                health,
            }));
        } else {
            warn!(
                category = %category,
                provider = %config.provider_name,
                error = health.error.as_deref().unwrap_or("unknown"),
                "Provider excluded: health check failed"
            );
            set.excluded.push(ExcludedProvider {
                provider_name: config.provider_name,
                reason: ExclusionReason::Unhealthy {
                    error: health.error,
                    response_time_ms: health.response_time_ms,
                },
            });
        }
    }

    info!(
        category = %category,
        live = ?set.live_names(),
        excluded = set.excluded.len(),
        "Category loaded"
    );
    Ok(set)
}
