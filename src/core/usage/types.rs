//! Usage report types

use crate::core::types::{MonthlyUsage, ProviderCategory, RateLimits, success_rate};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn parse_month(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
        .map(|date| date.format("%Y-%m").to_string())
        .map_err(|_| format!("invalid month '{}', expected YYYY-MM", value))
}

/// Inclusive `[from, to]` range of `YYYY-MM` months; open ends are unbounded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl MonthRange {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        let from = from.map(parse_month).transpose()?;
        let to = to.map(parse_month).transpose()?;
        if let (Some(from), Some(to)) = (&from, &to) {
            if from > to {
                return Err(format!("month range starts after it ends ({} > {})", from, to));
            }
        }
        Ok(Self { from, to })
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// `YYYY-MM` strings order chronologically
    pub fn contains(&self, month: &str) -> bool {
        self.from.as_deref().is_none_or(|from| month >= from)
            && self.to.as_deref().is_none_or(|to| month <= to)
    }
}

/// Requests counted inside a month range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub requests: u64,
    pub successful_requests: u64,
    pub success_rate: f64,
}

impl PeriodTotals {
    pub fn from_buckets<'a>(buckets: impl IntoIterator<Item = &'a MonthlyUsage>) -> Self {
        let (requests, successful_requests) = buckets
            .into_iter()
            .fold((0, 0), |(r, s), b| (r + b.requests, s + b.successful_requests));
        Self {
            requests,
            successful_requests,
            success_rate: success_rate(requests, successful_requests),
        }
    }
}

/// Usage of one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStats {
    pub category: ProviderCategory,
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub is_active: bool,
    pub is_primary: bool,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
    pub last_used_at: Option<DateTime<Utc>>,
    /// Buckets inside the requested range
    pub monthly_usage: Vec<MonthlyUsage>,
    /// Sum of `monthly_usage`, present when a range was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodTotals>,
    pub rate_limits: RateLimits,
}

/// Totals across every provider of a category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub providers: usize,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
}

impl CategoryTotals {
    pub(crate) fn add(&mut self, stats: &ProviderStats) {
        self.providers += 1;
        self.total_requests += stats.total_requests;
        self.successful_requests += stats.successful_requests;
        self.failed_requests += stats.failed_requests;
        self.success_rate = success_rate(self.total_requests, self.successful_requests);
    }
}

/// Result of a stats query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "MonthRange::is_unbounded")]
    pub range: MonthRange,
    pub providers: Vec<ProviderStats>,
    pub totals: BTreeMap<ProviderCategory, CategoryTotals>,
}
