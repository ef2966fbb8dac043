//! TaxJar Provider Implementation
//!
//! TaxJar records order transactions as final documents; there is no
//! uncommitted state. `create_transaction` therefore reports `committed`,
//! and `commit_transaction` only confirms that the order exists.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value, json};

use crate::core::providers::base::{VendorAuth, VendorClient, f64_at, str_at};
use crate::core::providers::capabilities::{HealthCheckResult, ProviderAdapter, TaxProvider};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{
    Address, AddressValidation, ProviderConfig, RequestContext, TaxCalculation,
    TaxCalculationResult, TaxLineResult, TaxRates, TaxTransaction, TransactionResult,
    TransactionStatus,
};

use super::TaxJarConfig;

pub struct TaxJarProvider {
    name: String,
    config: TaxJarConfig,
    client: VendorClient,
}

impl TaxJarProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let taxjar = TaxJarConfig::from_provider_config(config)?;
        let client = VendorClient::new(
            &config.provider_name,
            taxjar.api_base.clone(),
            VendorAuth::Bearer(taxjar.api_token.clone()),
        )?;

        Ok(Self {
            name: config.provider_name.clone(),
            config: taxjar,
            client,
        })
    }

    /// Order fields shared by `/taxes` and `/transactions/orders`
    fn order_body(&self, calc: &TaxCalculation) -> Map<String, Value> {
        let mut body = Map::new();

        match &calc.ship_from {
            Some(from) => {
                body.insert("from_country".into(), json!(from.country));
                body.insert("from_zip".into(), json!(from.postal_code));
                body.insert("from_state".into(), json!(from.region));
                body.insert("from_city".into(), json!(from.city));
                body.insert("from_street".into(), json!(from.line1));
            }
            None => {
                let origin = [
                    ("from_country", &self.config.from_country),
                    ("from_zip", &self.config.from_zip),
                    ("from_state", &self.config.from_state),
                ];
                for (key, value) in origin {
                    if let Some(value) = value {
                        body.insert(key.into(), json!(value));
                    }
                }
            }
        }

        body.insert("to_country".into(), json!(calc.ship_to.country));
        body.insert("to_zip".into(), json!(calc.ship_to.postal_code));
        body.insert("to_state".into(), json!(calc.ship_to.region));
        body.insert("to_city".into(), json!(calc.ship_to.city));
        body.insert("to_street".into(), json!(calc.ship_to.line1));
        body.insert("amount".into(), json!(calc.total_amount()));
        body.insert("shipping".into(), json!(0.0));

        let line_items: Vec<Value> = calc
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                json!({
                    "id": index.to_string(),
                    "quantity": line.quantity,
                    "unit_price": line.amount / line.quantity,
                    "product_tax_code": line.tax_code,
                    "description": line.description,
                })
            })
            .collect();
        body.insert("line_items".into(), Value::Array(line_items));
        if let Some(customer) = &calc.customer_code {
            body.insert("customer_id".into(), json!(customer));
        }

        body
    }

    fn order_path(transaction_id: &str) -> String {
        format!("/transactions/orders/{}", transaction_id)
    }
}

fn calculation_result(body: &Value, currency: &str) -> TaxCalculationResult {
    let lines = body
        .pointer("/tax/breakdown/line_items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| TaxLineResult {
                    line: str_at(item, "/id")
                        .and_then(|id| id.parse().ok())
                        .unwrap_or(index),
                    taxable_amount: f64_at(item, "/taxable_amount").unwrap_or_default(),
                    tax: f64_at(item, "/tax_collectable").unwrap_or_default(),
                    rate: f64_at(item, "/combined_tax_rate").unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    TaxCalculationResult {
        total_amount: f64_at(body, "/tax/order_total_amount").unwrap_or_default(),
        total_taxable: f64_at(body, "/tax/taxable_amount").unwrap_or_default(),
        total_tax: f64_at(body, "/tax/amount_to_collect").unwrap_or_default(),
        currency: currency.to_string(),
        lines,
    }
}

#[async_trait]
impl ProviderAdapter for TaxJarProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn vendor(&self) -> &'static str {
        super::PROVIDER_NAME
    }

    async fn health_check(&self) -> HealthCheckResult {
        self.client.get("/categories").probe().await
    }
}

#[async_trait]
impl TaxProvider for TaxJarProvider {
    async fn calculate_tax(
        &self,
        request: &TaxCalculation,
        context: &RequestContext,
    ) -> Result<TaxCalculationResult, ProviderError> {
        let body = self
            .client
            .post("/taxes")
            .json(&self.order_body(request))
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
        // Orders must carry the collected tax, so calculate first (a read)
        let calculation = self.calculate_tax(&request.calculation, context).await?;

        let transaction_id = request
            .code
            .clone()
            .unwrap_or_else(|| context.request_id.clone());
        let mut body = self.order_body(&request.calculation);
        body.insert("transaction_id".into(), json!(transaction_id));
        body.insert(
            "transaction_date".into(),
            json!(Utc::now().format("%Y-%m-%d").to_string()),
        );
        body.insert("sales_tax".into(), json!(calculation.total_tax));

        let response = self
            .client
            .post("/transactions/orders")
            .json(&body)
            .timeout(context.timeout)
            .send_json()
            .await?;

        Ok(TransactionResult {
            transaction_id: str_at(&response, "/order/transaction_id")
                .unwrap_or(&transaction_id)
                .to_string(),
            status: TransactionStatus::Committed,
            calculation: Some(calculation),
        })
    }

    async fn commit_transaction(
        &self,
        transaction_id: &str,
        context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError> {
        self.client
            .get(&Self::order_path(transaction_id))
            .timeout(context.timeout)
            .send_json()
            .await?;

        Ok(TransactionResult {
            transaction_id: transaction_id.to_string(),
            status: TransactionStatus::Committed,
            calculation: None,
        })
    }

    async fn void_transaction(
        &self,
        transaction_id: &str,
        _reason: Option<&str>,
        context: &RequestContext,
    ) -> Result<TransactionResult, ProviderError> {
        self.client
            .delete(&Self::order_path(transaction_id))
            .timeout(context.timeout)
            .send_json()
            .await?;

        Ok(TransactionResult {
            transaction_id: transaction_id.to_string(),
            status: TransactionStatus::Voided,
            calculation: None,
        })
    }

    async fn validate_address(
        &self,
        address: &Address,
        context: &RequestContext,
    ) -> Result<AddressValidation, ProviderError> {
        let result = self
            .client
            .post("/addresses/validate")
            .json(&json!({
                "country": address.country,
                "state": address.region,
                "zip": address.postal_code,
                "city": address.city,
                "street": address.line1,
            }))
            .timeout(context.timeout)
            .send_json()
            .await;

        let body = match result {
            Ok(body) => body,
            // No match is an answer, not a failure
            Err(ProviderError::Rejected {
                status: Some(404), ..
            }) => {
                return Ok(AddressValidation {
                    valid: false,
                    normalized: None,
                    messages: vec!["no matching address found".to_string()],
                });
            }
            Err(e) => return Err(e),
        };

        let normalized = body.pointer("/addresses/0").map(|v| Address {
            line1: str_at(v, "/street").unwrap_or(&address.line1).to_string(),
            line2: address.line2.clone(),
            city: str_at(v, "/city").unwrap_or(&address.city).to_string(),
            region: str_at(v, "/state").unwrap_or(&address.region).to_string(),
            postal_code: str_at(v, "/zip").unwrap_or(&address.postal_code).to_string(),
            country: str_at(v, "/country").unwrap_or(&address.country).to_string(),
        });

        Ok(AddressValidation {
            valid: normalized.is_some(),
            normalized,
            messages: Vec::new(),
        })
    }

    async fn get_tax_rates(
        &self,
        address: &Address,
        context: &RequestContext,
    ) -> Result<TaxRates, ProviderError> {
        let body = self
            .client
            .get(&format!("/rates/{}", address.postal_code))
            .query(&[
                ("country", address.country.as_str()),
                ("city", address.city.as_str()),
                ("street", address.line1.as_str()),
            ])
            .timeout(context.timeout)
            .send_json()
            .await?;

        Ok(TaxRates {
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            combined_rate: f64_at(&body, "/rate/combined_rate").unwrap_or_default(),
            state_rate: f64_at(&body, "/rate/state_rate"),
            county_rate: f64_at(&body, "/rate/county_rate"),
            city_rate: f64_at(&body, "/rate/city_rate"),
        })
    }
}
