//! Dispatch options and results

use super::error::FailoverError;
use crate::config::BatchConfig;
use crate::core::providers::ProviderError;
use crate::core::types::{OperationKind, ProviderCategory};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Per-dispatch knobs
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Tried first when it names a live provider
    pub preferred_provider: Option<String>,
    /// When false, only the first candidate is tried
    pub enable_failover: bool,
    /// No new attempt starts after this instant
    pub deadline: Option<Instant>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            preferred_provider: None,
            enable_failover: true,
            deadline: None,
        }
    }
}

impl DispatchOptions {
    pub fn with_preferred(mut self, provider: impl Into<String>) -> Self {
        self.preferred_provider = Some(provider.into());
        self
    }

    pub fn with_failover(mut self, enable_failover: bool) -> Self {
        self.enable_failover = enable_failover;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `budget` from now
    pub fn with_budget(self, budget: Duration) -> Self {
        self.with_deadline(Instant::now() + budget)
    }
}

/// Windowing of batch dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Dispatches run concurrently per window, at least 1
    pub batch_size: usize,
    /// Pause between windows
    pub delay: Duration,
}

impl From<&BatchConfig> for BatchOptions {
    fn from(config: &BatchConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            delay: config.delay(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Rejected,
    Ambiguous,
}

/// One provider call made during a dispatch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    pub provider: String,
    pub outcome: AttemptOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

impl Attempt {
    pub fn success(provider: &str, latency_ms: u64) -> Self {
        Self {
            provider: provider.to_string(),
            outcome: AttemptOutcome::Success,
            status: None,
            message: None,
            latency_ms,
        }
    }

    pub fn failure(provider: &str, error: &ProviderError, latency_ms: u64) -> Self {
        Self {
            provider: provider.to_string(),
            outcome: if error.is_ambiguous() {
                AttemptOutcome::Ambiguous
            } else {
                AttemptOutcome::Rejected
            },
            status: error.status(),
            message: Some(error.to_string()),
            latency_ms,
        }
    }
}

/// Outcome of a dispatch
#[derive(Debug, Clone)]
pub struct FailoverResult {
    pub request_id: String,
    pub category: ProviderCategory,
    pub operation: OperationKind,
    pub success: bool,
    pub provider_used: Option<String>,
    pub data: Option<Value>,
    pub error: Option<FailoverError>,
    /// Every call made, in order
    pub attempts: Vec<Attempt>,
}

impl FailoverResult {
    pub(crate) fn succeeded(
        request_id: String,
        category: ProviderCategory,
        operation: OperationKind,
        provider: &str,
        data: Value,
        attempts: Vec<Attempt>,
    ) -> Self {
        Self {
            request_id,
            category,
            operation,
            success: true,
            provider_used: Some(provider.to_string()),
            data: Some(data),
            error: None,
            attempts,
        }
    }

    pub(crate) fn failed(
        request_id: String,
        category: ProviderCategory,
        operation: OperationKind,
        error: FailoverError,
        attempts: Vec<Attempt>,
    ) -> Self {
        Self {
            request_id,
            category,
            operation,
            success: false,
            provider_used: None,
            data: None,
            error: Some(error),
            attempts,
        }
    }

    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(FailoverError::code)
    }
}
