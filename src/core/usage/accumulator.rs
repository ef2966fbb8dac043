//! Concurrent usage accumulator
//!
//! Dispatches record outcomes here without touching the store. Dirty
//! counters are written back by [`UsageAccumulator::flush`], which the
//! orchestrator runs on an interval and at shutdown.

use super::counters::ProviderUsage;
use super::types::{CategoryTotals, MonthRange, PeriodTotals, ProviderStats, UsageReport};
use crate::core::types::{ProviderCategory, ProviderConfig, UsageRecord, success_rate};
use crate::storage::ProviderConfigStore;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

type UsageKey = (ProviderCategory, String);

fn key(category: ProviderCategory, name: &str) -> UsageKey {
    (category, name.to_ascii_lowercase())
}

/// Usage counters for every provider the process has seen
#[derive(Debug, Default)]
pub struct UsageAccumulator {
    providers: DashMap<UsageKey, Arc<ProviderUsage>>,
}

impl UsageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from the stored usage; live counters win over a reseed
    pub fn seed(&self, config: &ProviderConfig) {
        self.providers
            .entry(key(config.category, &config.provider_name))
            .or_insert_with(|| {
                Arc::new(ProviderUsage::from_record(
                    &config.provider_name,
                    &config.usage,
                ))
            });
    }

    fn counters(&self, category: ProviderCategory, name: &str) -> Arc<ProviderUsage> {
        self.providers
            .entry(key(category, name))
            .or_insert_with(|| Arc::new(ProviderUsage::new(name)))
            .clone()
    }

    pub fn record_outcome(
        &self,
        category: ProviderCategory,
        provider: &str,
        success: bool,
        at: DateTime<Utc>,
    ) {
        self.counters(category, provider).record(success, at);
    }

    /// Current counters of one provider
    pub fn snapshot(&self, category: ProviderCategory, provider: &str) -> Option<UsageRecord> {
        self.providers
            .get(&key(category, provider))
            .map(|usage| usage.to_record())
    }

    /// Records changed since the last call, clearing their dirty flags
    pub fn take_dirty(&self) -> Vec<(ProviderCategory, Arc<ProviderUsage>)> {
        self.providers
            .iter()
            .filter(|entry| entry.value().take_dirty())
            .map(|entry| (entry.key().0, entry.value().clone()))
            .collect()
    }

    /// Write dirty counters to the store, returning how many were written
    ///
    /// A failed write leaves that provider dirty for the next flush.
    pub async fn flush(&self, store: &dyn ProviderConfigStore) -> usize {
        let mut written = 0;
        for (category, usage) in self.take_dirty() {
            let record = usage.to_record();
            match store
                .update_usage(category, usage.provider_name(), &record)
                .await
            {
                Ok(()) => written += 1,
                Err(e) => {
                    usage.mark_dirty();
                    warn!(
                        category = %category,
                        provider = %usage.provider_name(),
                        error = %e,
                        "Failed to persist usage counters"
                    );
                }
            }
        }
        if written > 0 {
            debug!(count = written, "Flushed usage counters");
        }
        written
    }

    /// Aggregate usage of `configs`, keeping only buckets inside `range`
    pub fn report(&self, configs: &[ProviderConfig], range: &MonthRange) -> UsageReport {
        let mut providers: Vec<ProviderStats> = configs
            .iter()
            .map(|config| self.provider_stats(config, range))
            .collect();
        providers.sort_by(|a, b| {
            (a.category, &a.provider_name).cmp(&(b.category, &b.provider_name))
        });

        let mut totals: BTreeMap<ProviderCategory, CategoryTotals> = BTreeMap::new();
        for stats in &providers {
            totals.entry(stats.category).or_default().add(stats);
        }

        UsageReport {
            generated_at: Utc::now(),
            range: range.clone(),
            providers,
            totals,
        }
    }

    fn provider_stats(&self, config: &ProviderConfig, range: &MonthRange) -> ProviderStats {
        let usage = self
            .snapshot(config.category, &config.provider_name)
            .unwrap_or_else(|| config.usage.clone());

        let monthly_usage: Vec<_> = usage
            .monthly_usage
            .into_iter()
            .filter(|bucket| range.contains(&bucket.month))
            .collect();
        let period = (!range.is_unbounded()).then(|| PeriodTotals::from_buckets(&monthly_usage));

        ProviderStats {
            category: config.category,
            provider_name: config.provider_name.clone(),
            display_name: config.display_name.clone(),
            is_active: config.is_active,
            is_primary: config.is_primary,
            total_requests: usage.total_requests,
            successful_requests: usage.successful_requests,
            failed_requests: usage.failed_requests,
            success_rate: success_rate(usage.total_requests, usage.successful_requests),
            last_used_at: usage.last_used_at,
            monthly_usage,
            period,
            rate_limits: config.rate_limits.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MonthlyUsage, RateLimits};
    use crate::storage::InMemoryConfigStore;
    use chrono::TimeZone;

    fn at(month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, 10, 9, 30, 0).unwrap()
    }

    fn twilio() -> ProviderConfig {
        ProviderConfig::new(ProviderCategory::Sms, "twilio")
            .with_primary(true)
            .with_rate_limits(RateLimits {
                per_minute: Some(60),
                per_hour: None,
                per_day: None,
            })
    }

    #[test]
    fn test_record_outcome_is_case_insensitive() {
        let usage = UsageAccumulator::new();
        usage.record_outcome(ProviderCategory::Sms, "Twilio", true, at(1));
        usage.record_outcome(ProviderCategory::Sms, "twilio", false, at(1));

        let record = usage.snapshot(ProviderCategory::Sms, "TWILIO").unwrap();
        assert_eq!(record.total_requests, 2);
        assert!(usage.snapshot(ProviderCategory::Email, "twilio").is_none());
    }

    #[test]
    fn test_seed_does_not_reset_live_counters() {
        let usage = UsageAccumulator::new();
        let mut config = twilio();
        config.usage.total_requests = 5;
        config.usage.successful_requests = 5;

        usage.seed(&config);
        usage.record_outcome(ProviderCategory::Sms, "twilio", true, at(2));
        usage.seed(&config);

        let record = usage.snapshot(ProviderCategory::Sms, "twilio").unwrap();
        assert_eq!(record.total_requests, 6);
    }

    #[test]
    fn test_report_filters_months_and_totals_category() {
        let usage = UsageAccumulator::new();
        for month in 1..=4 {
            usage.record_outcome(ProviderCategory::Sms, "twilio", true, at(month));
        }
        usage.record_outcome(ProviderCategory::Sms, "twilio", false, at(3));

        let mut backup = ProviderConfig::new(ProviderCategory::Sms, "messagebird").with_priority(2);
        backup.usage = UsageRecord {
            total_requests: 3,
            successful_requests: 0,
            failed_requests: 3,
            last_used_at: None,
            monthly_usage: vec![MonthlyUsage::new("2024-02", 3, 0)],
        };

        let range = MonthRange::new(Some("2024-02"), Some("2024-03")).unwrap();
        let report = usage.report(&[twilio(), backup], &range);

        assert_eq!(report.providers.len(), 2);
        let stats = report
            .providers
            .iter()
            .find(|p| p.provider_name == "twilio")
            .unwrap();
        assert_eq!(stats.total_requests, 5);
        assert_eq!(stats.success_rate, 80.0);
        assert_eq!(stats.monthly_usage.len(), 2);
        assert_eq!(stats.period.as_ref().unwrap().requests, 3);
        assert_eq!(stats.rate_limits.per_minute, Some(60));

        let totals = &report.totals[&ProviderCategory::Sms];
        assert_eq!(totals.providers, 2);
        assert_eq!(totals.total_requests, 8);
        assert_eq!(totals.failed_requests, 4);
        assert_eq!(totals.success_rate, 50.0);
    }

    #[test]
    fn test_report_without_range_has_no_period() {
        let usage = UsageAccumulator::new();
        let report = usage.report(&[twilio()], &MonthRange::default());
        assert!(report.providers[0].period.is_none());
        assert_eq!(report.providers[0].success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_flush_writes_only_dirty_providers() {
        let store = InMemoryConfigStore::with_configs([twilio()]);
        let usage = UsageAccumulator::new();
        usage.seed(&twilio());
        assert_eq!(usage.flush(&store).await, 0);

        usage.record_outcome(ProviderCategory::Sms, "twilio", true, at(5));
        assert_eq!(usage.flush(&store).await, 1);
        assert_eq!(usage.flush(&store).await, 0);

        let stored = store
            .get(ProviderCategory::Sms, "twilio")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.usage.total_requests, 1);
        assert_eq!(stored.usage.monthly_usage[0].month, "2024-05");
    }

    #[tokio::test]
    async fn test_failed_flush_stays_dirty() {
        let store = InMemoryConfigStore::new();
        let usage = UsageAccumulator::new();
        usage.record_outcome(ProviderCategory::Email, "sendgrid", true, at(5));

        assert_eq!(usage.flush(&store).await, 0);
        assert_eq!(usage.take_dirty().len(), 1);
    }
}
