//! Capability contracts per provider category
//!
//! Every adapter implements [`ProviderAdapter`] plus exactly one category
//! trait. The orchestrator never calls vendor-specific methods; it only sees
//! these contracts through [`super::Adapter`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{
    Address, AddressValidation, ChargeRequest, ChargeResult, DeliveryStats, DeliveryStatus,
    HealthRecord, HealthState, Message, ProviderCategory, RecipientValidation, RefundRequest,
    RefundResult, RequestContext, SendReceipt, StatsWindow, TaxCalculation, TaxCalculationResult,
    TaxRates, TaxTransaction, TransactionResult,
};

/// Probes slower than this are reported as `WARNING` even when they succeed
pub const SLOW_RESPONSE_THRESHOLD_MS: u64 = 2_000;

/// Outcome of one health probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub healthy: bool,
    pub response_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthCheckResult {
    pub fn healthy(response_time_ms: u64) -> Self {
        Self {
            healthy: true,
            response_time_ms,
            error: None,
        }
    }

    pub fn unhealthy(response_time_ms: u64, error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            response_time_ms,
            error: Some(error.into()),
        }
    }

    /// Stored classification of this probe
    pub fn state(&self) -> HealthState {
        match (self.healthy, self.response_time_ms > SLOW_RESPONSE_THRESHOLD_MS) {
            (true, false) => HealthState::Healthy,
            (true, true) => HealthState::Warning,
            (false, _) => HealthState::Error,
        }
    }

    /// Record persisted to the configuration store
    pub fn to_record(&self, checked_at: DateTime<Utc>) -> HealthRecord {
        HealthRecord {
            last_checked: Some(checked_at),
            status: self.state(),
            response_time_ms: Some(self.response_time_ms),
            last_error: self.error.clone(),
        }
    }
}

/// Identity and health probe shared by every adapter
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Configured provider name
    fn name(&self) -> &str;

    /// Vendor implementing the adapter
    fn vendor(&self) -> &'static str;

    /// Cheap authenticated probe; never fails, reports instead
    async fn health_check(&self) -> HealthCheckResult;
}

/// Tax calculation and document recording
#[async_trait]
pub trait TaxProvider: ProviderAdapter {
    async fn calculate_tax(
        &self,
        request: &TaxCalculation,
        context: &RequestContext,
    ) -> Result<TaxCalculationResult, ProviderError>;

    async fn create_transaction(
        &self,
        request: &TaxTransaction,
        context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError>;

    async fn commit_transaction(
        &self,
        transaction_id: &str,
        context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError>;

    async fn void_transaction(
        &self,
        transaction_id: &str,
        reason: Option<&str>,
        context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError>;

    async fn validate_address(
        &self,
        address: &Address,
        context: &RequestContext,
    ) -> Result<AddressValidation, ProviderError>;

    async fn get_tax_rates(
        &self,
        address: &Address,
        context: &RequestContext,
    ) -> Result<TaxRates, ProviderError>;
}

/// Email or SMS delivery
#[async_trait]
pub trait MessagingProvider: ProviderAdapter {
    /// `EMAIL` or `SMS`
    fn channel(&self) -> ProviderCategory;

    async fn send(
        &self,
        message: &Message,
        context: &RequestContext,
    ) -> Result<SendReceipt, ProviderError>;

    async fn validate_recipient(
        &self,
        recipient: &str,
        context: &RequestContext,
    ) -> Result<RecipientValidation, ProviderError>;

    async fn get_delivery_status(
        &self,
        message_id: &str,
        context: &RequestContext,
    ) -> Result<DeliveryStatus, ProviderError>;

    async fn get_stats(
        &self,
        window: &StatsWindow,
        context: &RequestContext,
    ) -> Result<DeliveryStats, ProviderError>;
}

/// Card payments
#[async_trait]
pub trait PaymentProvider: ProviderAdapter {
    async fn create_charge(
        &self,
        request: &ChargeRequest,
        context: &RequestContext,
    ) -> Result<ChargeResult, ProviderError>;

    async fn refund_charge(
        &self,
        request: &RefundRequest,
        context: &RequestContext,
    ) -> Result<RefundResult, ProviderError>;

    async fn get_charge(
        &self,
        charge_id: &str,
        context: &RequestContext,
    ) -> Result<ChargeResult, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_state_classification() {
        assert_eq!(HealthCheckResult::healthy(120).state(), HealthState::Healthy);
        assert_eq!(HealthCheckResult::healthy(2_500).state(), HealthState::Warning);
        assert_eq!(
            HealthCheckResult::unhealthy(10, "401 Unauthorized").state(),
            HealthState::Error
        );
    }

    #[test]
    fn test_to_record() {
        let now = Utc::now();
        let record = HealthCheckResult::unhealthy(35, "connection refused").to_record(now);
        assert_eq!(record.last_checked, Some(now));
        assert_eq!(record.status, HealthState::Error);
        assert_eq!(record.response_time_ms, Some(35));
        assert_eq!(record.last_error.as_deref(), Some("connection refused"));
    }
}
