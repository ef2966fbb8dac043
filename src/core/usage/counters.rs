//! Counters for a single provider

use crate::core::types::{MAX_MONTHLY_BUCKETS, MonthlyUsage, UsageRecord, success_rate};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// `YYYY-MM` bucket key for a timestamp
pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Usage counters for one provider instance
///
/// Totals are atomics; the monthly ring and `last_used_at` sit behind short
/// `parking_lot` locks that are never held across an await.
#[derive(Debug)]
pub struct ProviderUsage {
    provider_name: String,
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    last_used_at: Mutex<Option<DateTime<Utc>>>,
    monthly: Mutex<VecDeque<MonthlyUsage>>,
    dirty: AtomicBool,
}

impl ProviderUsage {
    pub fn new(provider_name: impl Into<String>) -> Self {
        Self::from_record(provider_name, &UsageRecord::default())
    }

    /// Resume counting from a persisted record
    pub fn from_record(provider_name: impl Into<String>, record: &UsageRecord) -> Self {
        let mut monthly: Vec<MonthlyUsage> = record.monthly_usage.clone();
        monthly.sort_by(|a, b| a.month.cmp(&b.month));
        let skip = monthly.len().saturating_sub(MAX_MONTHLY_BUCKETS);

        Self {
            provider_name: provider_name.into(),
            total: AtomicU64::new(record.total_requests),
            successful: AtomicU64::new(record.successful_requests),
            failed: AtomicU64::new(record.failed_requests),
            last_used_at: Mutex::new(record.last_used_at),
            monthly: Mutex::new(monthly.into_iter().skip(skip).collect()),
            dirty: AtomicBool::new(false),
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Count one finished call
    pub fn record(&self, success: bool, at: DateTime<Utc>) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }

        {
            let mut last = self.last_used_at.lock();
            if last.is_none_or(|previous| previous < at) {
                *last = Some(at);
            }
        }

        self.bump_month(&month_key(at), success);
        self.dirty.store(true, Ordering::Release);
    }

    fn bump_month(&self, month: &str, success: bool) {
        let mut monthly = self.monthly.lock();
        let index = match monthly.iter().position(|b| b.month.as_str() >= month) {
            Some(i) if monthly[i].month == month => i,
            Some(i) => {
                monthly.insert(i, MonthlyUsage::new(month, 0, 0));
                i
            }
            None => {
                monthly.push_back(MonthlyUsage::new(month, 0, 0));
                monthly.len() - 1
            }
        };

        let bucket = &mut monthly[index];
        bucket.requests += 1;
        if success {
            bucket.successful_requests += 1;
        }
        bucket.success_rate = success_rate(bucket.requests, bucket.successful_requests);

        while monthly.len() > MAX_MONTHLY_BUCKETS {
            monthly.pop_front();
        }
    }

    /// Point-in-time copy in the persisted shape
    pub fn to_record(&self) -> UsageRecord {
        UsageRecord {
            total_requests: self.total.load(Ordering::Relaxed),
            successful_requests: self.successful.load(Ordering::Relaxed),
            failed_requests: self.failed.load(Ordering::Relaxed),
            last_used_at: *self.last_used_at.lock(),
            monthly_usage: self.monthly.lock().iter().cloned().collect(),
        }
    }

    /// Clear the dirty flag, returning whether it was set
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}
