//! Scripted in-process adapter for orchestration tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::capabilities::{
    HealthCheckResult, MessagingProvider, PaymentProvider, ProviderAdapter, TaxProvider,
};
use super::factory::AdapterFactory;
use super::unified_provider::ProviderError;
use super::Adapter;
use crate::core::types::{
    Address, AddressValidation, ChargeRequest, ChargeResult, DeliveryStats, DeliveryStatus,
    Message, ProviderCategory, RecipientValidation, RefundRequest, RefundResult, RequestContext,
    SendReceipt, StatsWindow, TaxCalculation, TaxCalculationResult, TaxRates, TaxTransaction,
    TransactionResult, TransactionStatus,
};

/// What the scripted adapter does when called
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Succeed,
    /// Clean vendor rejection (HTTP 422)
    Reject,
    /// Adapter-reported timeout
    Timeout,
    /// Never answers; the caller's timeout must fire
    Hang,
    /// Succeeds after a delay
    Delay(Duration),
}

struct Inner {
    name: String,
    category: ProviderCategory,
    behavior: Mutex<Behavior>,
    healthy: AtomicBool,
    health_delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    health_checks: AtomicUsize,
}

/// Adapter whose outcome is chosen by the test
#[derive(Clone)]
pub struct ScriptedProvider {
    inner: Arc<Inner>,
}

impl ScriptedProvider {
    pub fn new(name: &str, category: ProviderCategory) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.to_string(),
                category,
                behavior: Mutex::new(Behavior::Succeed),
                healthy: AtomicBool::new(true),
                health_delay: Mutex::new(None),
                calls: AtomicUsize::new(0),
                health_checks: AtomicUsize::new(0),
            }),
        }
    }

    pub fn with_behavior(self, behavior: Behavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    pub fn unhealthy(self) -> Self {
        self.set_healthy(false);
        self
    }

    /// Delay every health probe by `delay`
    pub fn with_health_delay(self, delay: Duration) -> Self {
        *self.inner.health_delay.lock() = Some(delay);
        self
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.inner.behavior.lock() = behavior;
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.inner.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn category(&self) -> ProviderCategory {
        self.inner.category
    }

    /// Operation calls received (health probes excluded)
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn health_checks(&self) -> usize {
        self.inner.health_checks.load(Ordering::SeqCst)
    }

    pub fn adapter(&self) -> Adapter {
        match self.inner.category {
            ProviderCategory::Tax => Adapter::Tax(Arc::new(self.clone())),
            ProviderCategory::Email | ProviderCategory::Sms => {
                Adapter::Messaging(Arc::new(self.clone()))
            }
            ProviderCategory::Payment => Adapter::Payment(Arc::new(self.clone())),
        }
    }

    async fn run(&self) -> Result<(), ProviderError> {
        let call = self.inner.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let behavior = *self.inner.behavior.lock();
        match behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Reject => Err(ProviderError::rejected(
                self.name(),
                Some(422),
                format!("scripted rejection #{}", call),
            )),
            Behavior::Timeout => Err(ProviderError::timeout(self.name(), "scripted timeout")),
            Behavior::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
            Behavior::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }

    fn transaction(&self, id: &str, status: TransactionStatus) -> TransactionResult {
        TransactionResult {
            transaction_id: format!("{}-{}", self.name(), id),
            status,
            calculation: None,
        }
    }
}

/// Factory that builds the given scripted providers by name
pub fn scripted_factory(providers: &[ScriptedProvider]) -> AdapterFactory {
    let mut factory = AdapterFactory::new();
    for provider in providers {
        let provider = provider.clone();
        factory.register(provider.category(), &provider.name().to_string(), move |_| {
            Ok(provider.adapter())
        });
    }
    factory
}

#[async_trait]
impl ProviderAdapter for ScriptedProvider {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn vendor(&self) -> &'static str {
        "scripted"
    }

    async fn health_check(&self) -> HealthCheckResult {
        self.inner.health_checks.fetch_add(1, Ordering::SeqCst);
        let delay = *self.inner.health_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.inner.healthy.load(Ordering::SeqCst) {
            HealthCheckResult::healthy(1)
        } else {
            HealthCheckResult::unhealthy(1, "scripted outage")
        }
    }
}

#[async_trait]
impl TaxProvider for ScriptedProvider {
    async fn calculate_tax(
        &self,
        request: &TaxCalculation,
        _context: &RequestContext,
    ) -> Result<TaxCalculationResult, ProviderError> {
        self.run().await?;
        let total = request.total_amount();
        Ok(TaxCalculationResult {
            total_amount: total,
            total_taxable: total,
            total_tax: total * 0.1,
            currency: request.currency.clone(),
            lines: Vec::new(),
        })
    }

    async fn create_transaction(
        &self,
        request: &TaxTransaction,
        _context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError> {
        self.run().await?;
        let status = if request.commit {
            TransactionStatus::Committed
        } else {
            TransactionStatus::Saved
        };
        Ok(self.transaction(request.code.as_deref().unwrap_or("doc"), status))
    }

    async fn commit_transaction(
        &self,
        transaction_id: &str,
        _context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError> {
        self.run().await?;
        Ok(self.transaction(transaction_id, TransactionStatus::Committed))
    }

    async fn void_transaction(
        &self,
        transaction_id: &str,
        _reason: Option<&str>,
        _context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError> {
        self.run().await?;
        Ok(self.transaction(transaction_id, TransactionStatus::Voided))
    }

    async fn validate_address(
        &self,
        address: &Address,
        _context: &RequestContext,
    ) -> Result<AddressValidation, ProviderError> {
        self.run().await?;
        Ok(AddressValidation {
            valid: true,
            normalized: Some(address.clone()),
            messages: Vec::new(),
        })
    }

    async fn get_tax_rates(
        &self,
        address: &Address,
        _context: &RequestContext,
    ) -> Result<TaxRates, ProviderError> {
        self.run().await?;
        Ok(TaxRates {
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            combined_rate: 0.1,
            state_rate: None,
            county_rate: None,
            city_rate: None,
        })
    }
}

#[async_trait]
impl MessagingProvider for ScriptedProvider {
    fn channel(&self) -> ProviderCategory {
        self.inner.category
    }

    async fn send(
        &self,
        _message: &Message,
        _context: &RequestContext,
    ) -> Result<SendReceipt, ProviderError> {
        self.run().await?;
        Ok(SendReceipt {
            message_id: format!("{}-{}", self.name(), self.calls()),
            status: "queued".to_string(),
            accepted_at: Utc::now(),
        })
    }

    async fn validate_recipient(
        &self,
        recipient: &str,
        _context: &RequestContext,
    ) -> Result<RecipientValidation, ProviderError> {
        self.run().await?;
        Ok(RecipientValidation {
            recipient: recipient.to_string(),
            valid: true,
            reason: None,
        })
    }

    async fn get_delivery_status(
        &self,
        message_id: &str,
        _context: &RequestContext,
    ) -> Result<DeliveryStatus, ProviderError> {
        self.run().await?;
        Ok(DeliveryStatus {
            message_id: message_id.to_string(),
            status: "delivered".to_string(),
            updated_at: None,
        })
    }

    async fn get_stats(
        &self,
        _window: &StatsWindow,
        _context: &RequestContext,
    ) -> Result<DeliveryStats, ProviderError> {
        self.run().await?;
        Ok(DeliveryStats::default())
    }
}

#[async_trait]
impl PaymentProvider for ScriptedProvider {
    async fn create_charge(
        &self,
        request: &ChargeRequest,
        _context: &RequestContext,
    ) -> Result<ChargeResult, ProviderError> {
        self.run().await?;
        Ok(ChargeResult {
            charge_id: format!("{}-ch-{}", self.name(), self.calls()),
            status: "succeeded".to_string(),
            amount_cents: request.amount_cents,
            currency: request.currency.clone(),
            captured: true,
        })
    }

    async fn refund_charge(
        &self,
        request: &RefundRequest,
        _context: &RequestContext,
    ) -> Result<RefundResult, ProviderError> {
        self.run().await?;
        Ok(RefundResult {
            refund_id: format!("{}-re-{}", self.name(), self.calls()),
            charge_id: request.charge_id.clone(),
            status: "succeeded".to_string(),
            amount_cents: request.amount_cents.unwrap_or_default(),
        })
    }

    async fn get_charge(
        &self,
        charge_id: &str,
        _context: &RequestContext,
    ) -> Result<ChargeResult, ProviderError> {
        self.run().await?;
        Ok(ChargeResult {
            charge_id: charge_id.to_string(),
            status: "succeeded".to_string(),
            amount_cents: 0,
            currency: "USD".to_string(),
            captured: true,
        })
    }
}
