//! Tests for the failover orchestrator


use super::FailoverOrchestrator;
use crate::config::{BatchConfig, OrchestratorConfig, TimeoutConfig};
use crate::core::providers::testing::{ScriptedProvider, scripted_factory};
use crate::core::types::{
    Address, Message, MessageRequest, ProviderConfig, ProviderRequest, TaxCalculation,
    TaxLineItem, TaxRequest, TaxTransaction,
};
use crate::storage::InMemoryConfigStore;
use std::sync::Arc;

/// Adapter call timeout used by every category in these tests
pub(super) const CALL_TIMEOUT_MS: u64 = 150;

pub(super) fn config() -> OrchestratorConfig {
    OrchestratorConfig {
        timeouts: TimeoutConfig {
            tax_ms: CALL_TIMEOUT_MS,
            email_ms: CALL_TIMEOUT_MS,
            sms_ms: CALL_TIMEOUT_MS,
            payment_ms: CALL_TIMEOUT_MS,
        },
        health_check_timeout_ms: 100,
        health_check_interval_secs: None,
        usage_flush_interval_secs: 60,
        batch: BatchConfig {
            batch_size: 2,
            delay_ms: 0,
            max_messages: 100,
        },
    }
}

pub(super) async fn orchestrator(
    configs: Vec<ProviderConfig>,
    providers: &[ScriptedProvider],
) -> (FailoverOrchestrator, Arc<InMemoryConfigStore>) {
    let store = Arc::new(InMemoryConfigStore::with_configs(configs));
    let orchestrator =
        FailoverOrchestrator::new(store.clone(), scripted_factory(providers), config());
    orchestrator.init().await.unwrap();
    (orchestrator, store)
}

fn calculation() -> TaxCalculation {
    TaxCalculation {
        customer_code: Some("CUST-42".to_string()),
        currency: "USD".to_string(),
        ship_from: None,
        ship_to: Address {
            line1: "100 Ravine Ln NE".to_string(),
            line2: None,
            city: "Bainbridge Island".to_string(),
            region: "WA".to_string(),
            postal_code: "98110".to_string(),
            country: "US".to_string(),
        },
        lines: vec![TaxLineItem {
            amount: 100.0,
            quantity: 1.0,
            tax_code: None,
            description: None,
        }],
    }
}

/// Idempotent read
pub(super) fn calculate_tax() -> ProviderRequest {
    ProviderRequest::Tax(TaxRequest::CalculateTax(calculation()))
}

/// Non-idempotent write
pub(super) fn create_transaction() -> ProviderRequest {
    ProviderRequest::Tax(TaxRequest::CreateTransaction(TaxTransaction {
        code: Some("INV-1001".to_string()),
        calculation: calculation(),
        commit: true,
    }))
}

pub(super) fn send_email(to: &str) -> ProviderRequest {
    ProviderRequest::Email(MessageRequest::Send(Message {
        to: to.to_string(),
        from: None,
        subject: Some("Your receipt".to_string()),
        text: "Thanks for your order.".to_string(),
        html: None,
        reference: None,
    }))
}
