//! Avalara Provider Implementation

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};

use crate::core::providers::base::{VendorAuth, VendorClient, f64_at, required_str, str_at};
use crate::core::providers::capabilities::{HealthCheckResult, ProviderAdapter, TaxProvider};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{
    Address, AddressValidation, ProviderConfig, RequestContext, TaxCalculation,
    TaxCalculationResult, TaxLineResult, TaxRates, TaxTransaction, TransactionResult,
    TransactionStatus,
};

use super::AvalaraConfig;

/// AvaTax document types
const SALES_ORDER: &str = "SalesOrder";
const SALES_INVOICE: &str = "SalesInvoice";

pub struct AvalaraProvider {
    name: String,
    company_code: String,
    client: VendorClient,
}

impl AvalaraProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let avalara = AvalaraConfig::from_provider_config(config)?;
        let client = VendorClient::new(
            &config.provider_name,
            avalara.api_base,
            VendorAuth::Basic {
                username: avalara.account_id,
                password: avalara.license_key,
            },
        )?;

        Ok(Self {
            name: config.provider_name.clone(),
            company_code: avalara.company_code,
            client,
        })
    }

    fn document(
        &self,
        doc_type: &str,
        code: Option<&str>,
        calc: &TaxCalculation,
        commit: bool,
    ) -> Value {
        let mut addresses = json!({ "shipTo": address_body(&calc.ship_to) });
        if let Some(ship_from) = &calc.ship_from {
            addresses["shipFrom"] = address_body(ship_from);
        }

        let lines: Vec<Value> = calc
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                json!({
                    "number": index.to_string(),
                    "quantity": line.quantity,
                    "amount": line.amount,
                    "taxCode": line.tax_code,
                    "description": line.description,
                })
            })
            .collect();

        let mut body = json!({
            "type": doc_type,
            "companyCode": self.company_code,
            "date": Utc::now().format("%Y-%m-%d").to_string(),
            "customerCode": calc.customer_code.as_deref().unwrap_or("ANONYMOUS"),
            "currencyCode": calc.currency,
            "addresses": addresses,
            "lines": lines,
            "commit": commit,
        });
        if let Some(code) = code {
            body["code"] = json!(code);
        }
        body
    }

    fn transaction_path(&self, transaction_id: &str, action: &str) -> String {
        format!(
            "/companies/{}/transactions/{}/{}",
            self.company_code, transaction_id, action
        )
    }

    fn transaction_result(&self, body: &Value) -> Result<TransactionResult, ProviderError> {
        Ok(TransactionResult {
            transaction_id: required_str(&self.name, body, "/code")?,
            status: parse_status(str_at(body, "/status").unwrap_or_default()),
            calculation: body
                .get("totalTax")
                .map(|_| calculation_result(body, "USD")),
        })
    }
}

fn address_body(address: &Address) -> Value {
    json!({
        "line1": address.line1,
        "line2": address.line2,
        "city": address.city,
        "region": address.region,
        "postalCode": address.postal_code,
        "country": address.country,
    })
}

fn parse_status(status: &str) -> TransactionStatus {
    match status {
        "Committed" | "Posted" => TransactionStatus::Committed,
        "Cancelled" | "Voided" => TransactionStatus::Voided,
        _ => TransactionStatus::Saved,
    }
}

fn calculation_result(body: &Value, default_currency: &str) -> TaxCalculationResult {
    let lines = body
        .get("lines")
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .enumerate()
                .map(|(index, line)| {
                    let taxable = f64_at(line, "/taxableAmount").unwrap_or_default();
                    let tax = f64_at(line, "/tax").unwrap_or_default();
                    let rate = line
                        .get("details")
                        .and_then(Value::as_array)
                        .map(|details| {
                            details.iter().filter_map(|d| f64_at(d, "/rate")).sum::<f64>()
                        })
                        .unwrap_or_else(|| if taxable > 0.0 { tax / taxable } else { 0.0 });
                    TaxLineResult {
                        line: str_at(line, "/lineNumber")
                            .and_then(|n| n.parse().ok())
                            .unwrap_or(index),
                        taxable_amount: taxable,
                        tax,
                        rate,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    TaxCalculationResult {
        total_amount: f64_at(body, "/totalAmount").unwrap_or_default(),
        total_taxable: f64_at(body, "/totalTaxable").unwrap_or_default(),
        total_tax: f64_at(body, "/totalTax").unwrap_or_default(),
        currency: str_at(body, "/currencyCode")
            .unwrap_or(default_currency)
            .to_string(),
        lines,
    }
}

#[async_trait]
impl ProviderAdapter for AvalaraProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn vendor(&self) -> &'static str {
        super::PROVIDER_NAME
    }

    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.client.get("/utilities/ping").send_json().await;
        let elapsed = start.elapsed().as_millis() as u64;

        // Ping answers 200 for bad credentials too; authentication is in the body
        match result {
            Ok(body) if body.get("authenticated").and_then(Value::as_bool) == Some(true) => {
                HealthCheckResult::healthy(elapsed)
            }
            Ok(_) => HealthCheckResult::unhealthy(elapsed, "not authenticated"),
            Err(e) => HealthCheckResult::unhealthy(elapsed, e.to_string()),
        }
    }
}

#[async_trait]
impl TaxProvider for AvalaraProvider {
    async fn calculate_tax(
        &self,
        request: &TaxCalculation,
        context: &RequestContext,
    ) -> Result<TaxCalculationResult, ProviderError> {
        let body = self
            .client
            .post("/transactions/create")
            .header(
                "X-Avalara-Client",
                &format!("provider-failover;{}", context.request_id),
            )
            .json(&self.document(SALES_ORDER, None, request, false))
            .timeout(context.timeout)
            .send_json()
            .await?;

        Ok(calculation_result(&body, &request.currency))
    }

    async fn create_transaction(
        &self,
        request: &TaxTransaction,
        context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError> {
        let body = self
            .client
            .post("/transactions/create")
            .json(&self.document(
                SALES_INVOICE,
                request.code.as_deref(),
                &request.calculation,
                request.commit,
            ))
            .timeout(context.timeout)
            .send_json()
            .await?;

        let mut result = self.transaction_result(&body)?;
        if let Some(calculation) = result.calculation.as_mut() {
            calculation.currency = request.calculation.currency.clone();
        }
        Ok(result)
    }

    async fn commit_transaction(
        &self,
        transaction_id: &str,
        context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError> {
        let body = self
            .client
            .post(&self.transaction_path(transaction_id, "commit"))
            .json(&json!({ "commit": true }))
            .timeout(context.timeout)
            .send_json()
            .await?;

        self.transaction_result(&body)
    }

    async fn void_transaction(
        &self,
        transaction_id: &str,
        _reason: Option<&str>,
        context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError> {
        let body = self
            .client
            .post(&self.transaction_path(transaction_id, "void"))
            .json(&json!({ "code": "DocVoided" }))
            .timeout(context.timeout)
            .send_json()
            .await?;

        let mut result = self.transaction_result(&body)?;
        result.status = TransactionStatus::Voided;
        Ok(result)
    }

    async fn validate_address(
        &self,
        address: &Address,
        context: &RequestContext,
    ) -> Result<AddressValidation, ProviderError> {
        let body = self
            .client
            .post("/addresses/resolve")
            .json(&address_body(address))
            .timeout(context.timeout)
            .send_json()
            .await?;

        let messages: Vec<String> = body
            .get("messages")
            .and_then(Value::as_array)
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| str_at(m, "/summary").map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let normalized = body.pointer("/validatedAddresses/0").map(|v| Address {
            line1: str_at(v, "/line1").unwrap_or(&address.line1).to_string(),
            line2: str_at(v, "/line2")
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            city: str_at(v, "/city").unwrap_or(&address.city).to_string(),
            region: str_at(v, "/region").unwrap_or(&address.region).to_string(),
            postal_code: str_at(v, "/postalCode")
                .unwrap_or(&address.postal_code)
                .to_string(),
            country: str_at(v, "/country").unwrap_or(&address.country).to_string(),
        });

        Ok(AddressValidation {
            valid: normalized.is_some() && messages.is_empty(),
            normalized,
            messages,
        })
    }

    async fn get_tax_rates(
        &self,
        address: &Address,
        context: &RequestContext,
    ) -> Result<TaxRates, ProviderError> {
        let body = self
            .client
            .get("/taxrates/bypostalcode")
            .query(&[
                ("country", address.country.as_str()),
                ("postalCode", address.postal_code.as_str()),
            ])
            .timeout(context.timeout)
            .send_json()
            .await?;

        let rate_of = |kind: &str| {
            body.get("rates").and_then(Value::as_array).and_then(|rates| {
                let matching: Vec<f64> = rates
                    .iter()
                    .filter(|r| str_at(r, "/type") == Some(kind))
                    .filter_map(|r| f64_at(r, "/rate"))
                    .collect();
                (!matching.is_empty()).then(|| matching.iter().sum::<f64>())
            })
        };

        Ok(TaxRates {
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            combined_rate: f64_at(&body, "/totalRate").unwrap_or_default(),
            state_rate: rate_of("State"),
            county_rate: rate_of("County"),
            city_rate: rate_of("City"),
        })
    }
}
