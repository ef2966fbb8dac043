//! Request payloads for every category operation
//!
//! [`ProviderRequest`] is the unit the orchestrator dispatches: it names the
//! category, the operation and carries the operation's input.

use super::category::ProviderCategory;
use crate::utils::{is_valid_email, is_valid_phone_number};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation names across all categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CalculateTax,
    CreateTransaction,
    CommitTransaction,
    VoidTransaction,
    ValidateAddress,
    GetTaxRates,
    Send,
    ValidateRecipient,
    GetDeliveryStatus,
    GetStats,
    CreateCharge,
    RefundCharge,
    GetCharge,
}

impl OperationKind {
    /// Writes change remote state and are never replayed after an ambiguous failure
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            OperationKind::CreateTransaction
                | OperationKind::CommitTransaction
                | OperationKind::VoidTransaction
                | OperationKind::Send
                | OperationKind::CreateCharge
                | OperationKind::RefundCharge
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::CalculateTax => "calculate_tax",
            OperationKind::CreateTransaction => "create_transaction",
            OperationKind::CommitTransaction => "commit_transaction",
            OperationKind::VoidTransaction => "void_transaction",
            OperationKind::ValidateAddress => "validate_address",
            OperationKind::GetTaxRates => "get_tax_rates",
            OperationKind::Send => "send",
            OperationKind::ValidateRecipient => "validate_recipient",
            OperationKind::GetDeliveryStatus => "get_delivery_status",
            OperationKind::GetStats => "get_stats",
            OperationKind::CreateCharge => "create_charge",
            OperationKind::RefundCharge => "refund_charge",
            OperationKind::GetCharge => "get_charge",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    /// State, province or region code
    pub region: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "US".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_quantity() -> f64 {
    1.0
}

impl Address {
    pub fn validate(&self) -> Result<(), String> {
        if self.postal_code.trim().is_empty() {
            return Err("address.postal_code is required".to_string());
        }
        if self.country.trim().len() != 2 {
            return Err("address.country must be a two-letter country code".to_string());
        }
        Ok(())
    }
}

/// One taxable line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLineItem {
    /// Extended line amount in the document currency
    pub amount: f64,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tax calculation input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_code: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_from: Option<Address>,
    pub ship_to: Address,
    pub lines: Vec<TaxLineItem>,
}

impl TaxCalculation {
    pub fn validate(&self) -> Result<(), String> {
        if self.lines.is_empty() {
            return Err("at least one line item is required".to_string());
        }
        for (index, line) in self.lines.iter().enumerate() {
            if !line.amount.is_finite() || line.amount < 0.0 {
                return Err(format!("lines[{}].amount must be a non-negative number", index));
            }
            if !line.quantity.is_finite() || line.quantity <= 0.0 {
                return Err(format!("lines[{}].quantity must be positive", index));
            }
        }
        self.ship_to.validate()?;
        if let Some(ship_from) = &self.ship_from {
            ship_from.validate()?;
        }
        Ok(())
    }

    /// Sum of line amounts
    pub fn total_amount(&self) -> f64 {
        self.lines.iter().map(|line| line.amount).sum()
    }
}

/// Tax document to record with the vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTransaction {
    /// Caller's document code (invoice number)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub calculation: TaxCalculation,
    /// Commit immediately instead of saving an uncommitted document
    #[serde(default)]
    pub commit: bool,
}

/// Tax operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum TaxRequest {
    CalculateTax(TaxCalculation),
    CreateTransaction(TaxTransaction),
    CommitTransaction { transaction_id: String },
    VoidTransaction {
        transaction_id: String,
        #[serde(default)]
        reason: Option<String>,
    },
    ValidateAddress(Address),
    GetTaxRates(Address),
}

impl TaxRequest {
    pub fn operation(&self) -> OperationKind {
        match self {
            TaxRequest::CalculateTax(_) => OperationKind::CalculateTax,
            TaxRequest::CreateTransaction(_) => OperationKind::CreateTransaction,
            TaxRequest::CommitTransaction { .. } => OperationKind::CommitTransaction,
            TaxRequest::VoidTransaction { .. } => OperationKind::VoidTransaction,
            TaxRequest::ValidateAddress(_) => OperationKind::ValidateAddress,
            TaxRequest::GetTaxRates(_) => OperationKind::GetTaxRates,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            TaxRequest::CalculateTax(calculation) => calculation.validate(),
            TaxRequest::CreateTransaction(transaction) => transaction.calculation.validate(),
            TaxRequest::CommitTransaction { transaction_id }
            | TaxRequest::VoidTransaction { transaction_id, .. } => {
                require_non_empty("transaction_id", transaction_id)
            }
            TaxRequest::ValidateAddress(address) | TaxRequest::GetTaxRates(address) => {
                address.validate()
            }
        }
    }
}

/// Outbound email or SMS message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Email address or E.164 phone number
    pub to: String,
    /// Overrides the provider's configured sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Required for email, ignored for SMS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Caller correlation ID forwarded as vendor metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Date window for vendor delivery statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::NaiveDate>,
}

/// Email and SMS operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum MessageRequest {
    Send(Message),
    ValidateRecipient { recipient: String },
    GetDeliveryStatus { message_id: String },
    GetStats(StatsWindow),
}

impl MessageRequest {
    pub fn operation(&self) -> OperationKind {
        match self {
            MessageRequest::Send(_) => OperationKind::Send,
            MessageRequest::ValidateRecipient { .. } => OperationKind::ValidateRecipient,
            MessageRequest::GetDeliveryStatus { .. } => OperationKind::GetDeliveryStatus,
            MessageRequest::GetStats(_) => OperationKind::GetStats,
        }
    }

    /// Validate against the channel's addressing rules
    pub fn validate(&self, category: ProviderCategory) -> Result<(), String> {
        match self {
            MessageRequest::Send(message) => {
                require_non_empty("text", &message.text)?;
                match category {
                    ProviderCategory::Email => {
                        if !is_valid_email(&message.to) {
                            return Err(format!("'{}' is not a valid email address", message.to));
                        }
                        match &message.subject {
                            Some(subject) if !subject.trim().is_empty() => Ok(()),
                            _ => Err("subject is required for email".to_string()),
                        }
                    }
                    _ => {
                        if !is_valid_phone_number(&message.to) {
                            return Err(format!(
                                "'{}' is not an E.164 phone number",
                                message.to
                            ));
                        }
                        Ok(())
                    }
                }
            }
            MessageRequest::ValidateRecipient { recipient } => {
                require_non_empty("recipient", recipient)
            }
            MessageRequest::GetDeliveryStatus { message_id } => {
                require_non_empty("message_id", message_id)
            }
            MessageRequest::GetStats(window) => match (window.start_date, window.end_date) {
                (Some(start), Some(end)) if start > end => {
                    Err("start_date must not be after end_date".to_string())
                }
                _ => Ok(()),
            },
        }
    }
}

/// Card charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Amount in the currency's minor unit
    pub amount_cents: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Vendor payment method or token
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Forwarded to vendors that deduplicate writes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

/// Full or partial refund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRequest {
    pub charge_id: String,
    /// Refunds the whole charge when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Payment operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum PaymentRequest {
    CreateCharge(ChargeRequest),
    RefundCharge(RefundRequest),
    GetCharge { charge_id: String },
}

impl PaymentRequest {
    pub fn operation(&self) -> OperationKind {
        match self {
            PaymentRequest::CreateCharge(_) => OperationKind::CreateCharge,
            PaymentRequest::RefundCharge(_) => OperationKind::RefundCharge,
            PaymentRequest::GetCharge { .. } => OperationKind::GetCharge,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            PaymentRequest::CreateCharge(charge) => {
                if charge.amount_cents == 0 {
                    return Err("amount_cents must be greater than 0".to_string());
                }
                require_non_empty("payment_method", &charge.payment_method)
            }
            PaymentRequest::RefundCharge(refund) => {
                if refund.amount_cents == Some(0) {
                    return Err("amount_cents must be greater than 0".to_string());
                }
                require_non_empty("charge_id", &refund.charge_id)
            }
            PaymentRequest::GetCharge { charge_id } => require_non_empty("charge_id", charge_id),
        }
    }
}

/// A dispatchable request: category plus operation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "request", rename_all = "UPPERCASE")]
pub enum ProviderRequest {
    Tax(TaxRequest),
    Email(MessageRequest),
    Sms(MessageRequest),
    Payment(PaymentRequest),
}

impl ProviderRequest {
    pub fn category(&self) -> ProviderCategory {
        match self {
            ProviderRequest::Tax(_) => ProviderCategory::Tax,
            ProviderRequest::Email(_) => ProviderCategory::Email,
            ProviderRequest::Sms(_) => ProviderCategory::Sms,
            ProviderRequest::Payment(_) => ProviderCategory::Payment,
        }
    }

    pub fn operation(&self) -> OperationKind {
        match self {
            ProviderRequest::Tax(request) => request.operation(),
            ProviderRequest::Email(request) | ProviderRequest::Sms(request) => request.operation(),
            ProviderRequest::Payment(request) => request.operation(),
        }
    }

    pub fn is_write(&self) -> bool {
        self.operation().is_write()
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ProviderRequest::Tax(request) => request.validate(),
            ProviderRequest::Email(request) => request.validate(ProviderCategory::Email),
            ProviderRequest::Sms(request) => request.validate(ProviderCategory::Sms),
            ProviderRequest::Payment(request) => request.validate(),
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}
