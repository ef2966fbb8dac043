//! Normalized adapter results
//!
//! Every adapter maps its vendor's response body onto these shapes so
//! callers see the same data regardless of which provider served them.

use super::requests::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a tax calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub total_amount: f64,
    pub total_taxable: f64,
    pub total_tax: f64,
    pub currency: String,
    #[serde(default)]
    pub lines: Vec<TaxLineResult>,
}

/// Tax computed for one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLineResult {
    /// Zero-based index into the request lines
    pub line: usize,
    pub taxable_amount: f64,
    pub tax: f64,
    pub rate: f64,
}

/// Lifecycle state of a recorded tax document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Saved,
    Committed,
    Voided,
}

/// Result of a tax transaction write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub transaction_id: String,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<TaxCalculationResult>,
}

/// Address validation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<Address>,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Jurisdiction rates for an address, as fractions (0.101 = 10.1%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    pub postal_code: String,
    pub country: String,
    pub combined_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_rate: Option<f64>,
}

/// Vendor acknowledgement of an accepted message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: String,
    /// Vendor status string (`queued`, `accepted`, ...)
    pub status: String,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientValidation {
    pub recipient: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryStatus {
    pub message_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Vendor-side delivery counters
///
/// Vendors that only report sent volume leave `delivered` and `failed` empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryStats {
    pub requests: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeResult {
    pub charge_id: String,
    pub status: String,
    pub amount_cents: u64,
    pub currency: String,
    pub captured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundResult {
    pub refund_id: String,
    pub charge_id: String,
    pub status: String,
    pub amount_cents: u64,
}
