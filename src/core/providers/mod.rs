//! Provider adapters using an enum-based dispatch design
//!
//! This module contains the [`Adapter`] enum the orchestrator calls through,
//! the capability traits each vendor implements, and the vendor adapters.

// Base infrastructure
pub mod base;

// Vendor adapters
pub mod avalara;
pub mod sendgrid;
pub mod stripe;
pub mod taxjar;
pub mod twilio;

pub mod capabilities;
pub mod factory;
pub mod unified_provider;

#[cfg(test)]
pub(crate) mod testing;

pub use capabilities::{
    HealthCheckResult, MessagingProvider, PaymentProvider, ProviderAdapter, TaxProvider,
};
pub use factory::AdapterFactory;
pub use unified_provider::ProviderError;

use crate::core::types::{
    MessageRequest, PaymentRequest, ProviderCategory, ProviderRequest, RequestContext, TaxRequest,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A constructed adapter, tagged by the capability contract it implements
#[derive(Clone)]
pub enum Adapter {
    Tax(Arc<dyn TaxProvider>),
    Messaging(Arc<dyn MessagingProvider>),
    Payment(Arc<dyn PaymentProvider>),
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("name", &self.name())
            .field("vendor", &self.vendor())
            .finish()
    }
}

impl Adapter {
    pub fn name(&self) -> &str {
        match self {
            Adapter::Tax(p) => p.name(),
            Adapter::Messaging(p) => p.name(),
            Adapter::Payment(p) => p.name(),
        }
    }

    pub fn vendor(&self) -> &'static str {
        match self {
            Adapter::Tax(p) => p.vendor(),
            Adapter::Messaging(p) => p.vendor(),
            Adapter::Payment(p) => p.vendor(),
        }
    }

    /// Whether this adapter can serve requests of the category
    pub fn serves(&self, category: ProviderCategory) -> bool {
        match self {
            Adapter::Tax(_) => category == ProviderCategory::Tax,
            Adapter::Messaging(p) => p.channel() == category,
            Adapter::Payment(_) => category == ProviderCategory::Payment,
        }
    }

    pub async fn health_check(&self) -> HealthCheckResult {
        match self {
            Adapter::Tax(p) => p.health_check().await,
            Adapter::Messaging(p) => p.health_check().await,
            Adapter::Payment(p) => p.health_check().await,
        }
    }

    /// Run one request against this adapter and return the normalized result as JSON
    pub async fn execute(
        &self,
        request: &ProviderRequest,
        context: &RequestContext,
    ) -> Result<Value, ProviderError> {
        if !self.serves(request.category()) {
            return Err(ProviderError::not_supported(
                self.name(),
                format!("{} {}", request.category(), request.operation()),
            ));
        }

        match (self, request) {
            (Adapter::Tax(p), ProviderRequest::Tax(request)) => {
                execute_tax(p.as_ref(), request, context).await
            }
            (
                Adapter::Messaging(p),
                ProviderRequest::Email(request) | ProviderRequest::Sms(request),
            ) => execute_messaging(p.as_ref(), request, context).await,
            (Adapter::Payment(p), ProviderRequest::Payment(request)) => {
                execute_payment(p.as_ref(), request, context).await
            }
            _ => Err(ProviderError::not_supported(
                self.name(),
                request.operation().as_str(),
            )),
        }
    }
}

async fn execute_tax(
    provider: &dyn TaxProvider,
    request: &TaxRequest,
    context: &RequestContext,
) -> Result<Value, ProviderError> {
    let name = provider.name();
    match request {
        TaxRequest::CalculateTax(calculation) => {
            encode(name, provider.calculate_tax(calculation, context).await?)
        }
        TaxRequest::CreateTransaction(transaction) => {
            encode(name, provider.create_transaction(transaction, context).await?)
        }
        TaxRequest::CommitTransaction { transaction_id } => encode(
            name,
            provider.commit_transaction(transaction_id, context).await?,
        ),
        TaxRequest::VoidTransaction {
            transaction_id,
            reason,
        } => encode(
            name,
            provider
                .void_transaction(transaction_id, reason.as_deref(), context)
                .await?,
        ),
        TaxRequest::ValidateAddress(address) => {
            encode(name, provider.validate_address(address, context).await?)
        }
        TaxRequest::GetTaxRates(address) => {
            encode(name, provider.get_tax_rates(address, context).await?)
        }
    }
}

async fn execute_messaging(
    provider: &dyn MessagingProvider,
    request: &MessageRequest,
    context: &RequestContext,
) -> Result<Value, ProviderError> {
    let name = provider.name();
    match request {
        MessageRequest::Send(message) => encode(name, provider.send(message, context).await?),
        MessageRequest::ValidateRecipient { recipient } => encode(
            name,
            provider.validate_recipient(recipient, context).await?,
        ),
        MessageRequest::GetDeliveryStatus { message_id } => encode(
            name,
            provider.get_delivery_status(message_id, context).await?,
        ),
        MessageRequest::GetStats(window) => {
            encode(name, provider.get_stats(window, context).await?)
        }
    }
}

async fn execute_payment(
    provider: &dyn PaymentProvider,
    request: &PaymentRequest,
    context: &RequestContext,
) -> Result<Value, ProviderError> {
    let name = provider.name();
    match request {
        PaymentRequest::CreateCharge(charge) => {
            encode(name, provider.create_charge(charge, context).await?)
        }
        PaymentRequest::RefundCharge(refund) => {
            encode(name, provider.refund_charge(refund, context).await?)
        }
        PaymentRequest::GetCharge { charge_id } => {
            encode(name, provider.get_charge(charge_id, context).await?)
        }
    }
}

/// The vendor already acted, so a local encoding failure leaves the outcome unknown
fn encode<T: Serialize>(provider: &str, value: T) -> Result<Value, ProviderError> {
    serde_json::to_value(value).map_err(|e| {
        ProviderError::ambiguous(provider, None, format!("failed to encode result: {}", e))
    })
}
