//! Test fixtures

use provider_failover::config::{BatchConfig, OrchestratorConfig, TimeoutConfig};
use provider_failover::core::providers::base::API_BASE_SETTING;
use provider_failover::core::types::{
    Address, Message, MessageRequest, ProviderCategory, ProviderConfig, ProviderRequest,
    TaxCalculation, TaxLineItem, TaxRequest, TaxTransaction,
};

/// Per-call timeout used for every category
pub const CALL_TIMEOUT_MS: u64 = 300;

pub fn orchestrator_config() -> OrchestratorConfig {
    OrchestratorConfig {
        timeouts: TimeoutConfig {
            tax_ms: CALL_TIMEOUT_MS,
            email_ms: CALL_TIMEOUT_MS,
            sms_ms: CALL_TIMEOUT_MS,
            payment_ms: CALL_TIMEOUT_MS,
        },
        health_check_timeout_ms: 500,
        health_check_interval_secs: None,
        usage_flush_interval_secs: 60,
        batch: BatchConfig {
            batch_size: 5,
            delay_ms: 0,
            max_messages: 100,
        },
    }
}

pub fn avalara(api_base: &str) -> ProviderConfig {
    ProviderConfig::new(ProviderCategory::Tax, "avalara")
        .with_primary(true)
        .with_priority(1)
        .with_credential("account_id", "1100012345")
        .with_credential("license_key", "AVA-LICENSE-9876")
        .with_setting(API_BASE_SETTING, api_base)
}

pub fn taxjar(api_base: &str) -> ProviderConfig {
    ProviderConfig::new(ProviderCategory::Tax, "taxjar")
        .with_priority(2)
        .with_credential("api_token", "tj-token-5555")
        .with_setting(API_BASE_SETTING, api_base)
}

pub fn sendgrid(api_base: &str) -> ProviderConfig {
    ProviderConfig::new(ProviderCategory::Email, "sendgrid")
        .with_primary(true)
        .with_credential("api_key", "SG.test-key-4321")
        .with_setting("from_email", "billing@example.com")
        .with_setting(API_BASE_SETTING, api_base)
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
            description: Some("Widget".to_string()),
        }],
    }
}

pub fn calculate_tax() -> ProviderRequest {
    ProviderRequest::Tax(TaxRequest::CalculateTax(calculation()))
}

pub fn create_transaction(code: &str) -> ProviderRequest {
    ProviderRequest::Tax(TaxRequest::CreateTransaction(TaxTransaction {
        code: Some(code.to_string()),
        calculation: calculation(),
        commit: true,
    }))
}

pub fn send_email(to: &str) -> ProviderRequest {
    ProviderRequest::Email(MessageRequest::Send(Message {
        to: to.to_string(),
        from: None,
        subject: Some("Invoice INV-1001".to_string()),
        text: "Your invoice is attached.".to_string(),
        html: None,
        reference: Some("INV-1001".to_string()),
    }))
}
