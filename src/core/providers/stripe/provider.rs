//! Stripe Provider Implementation
//!
//! Writes carry an `Idempotency-Key` so a caller reconciling an ambiguous
//! charge can safely retry against the same provider.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::providers::base::{
    VendorAuth, VendorClient, VendorRequest, required_str, str_at, u64_at,
};
use crate::core::providers::capabilities::{HealthCheckResult, PaymentProvider, ProviderAdapter};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{
    ChargeRequest, ChargeResult, ProviderConfig, RefundRequest, RefundResult, RequestContext,
};

use super::StripeConfig;

pub struct StripeProvider {
    name: String,
    config: StripeConfig,
    client: VendorClient,
}

impl StripeProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let stripe = StripeConfig::from_provider_config(config)?;
        let client = VendorClient::new(
            &config.provider_name,
            stripe.api_base.clone(),
            VendorAuth::Bearer(stripe.secret_key.clone()),
        )?;

        Ok(Self {
            name: config.provider_name.clone(),
            config: stripe,
            client,
        })
    }

    fn versioned<'a>(&self, request: VendorRequest<'a>) -> VendorRequest<'a> {
        match &self.config.api_version {
            Some(version) => request.header("Stripe-Version", version),
            None => request,
        }
    }

    fn charge_result(&self, body: &Value) -> Result<ChargeResult, ProviderError> {
        let status = str_at(body, "/status").unwrap_or("unknown").to_string();
        Ok(ChargeResult {
            charge_id: required_str(&self.name, body, "/id")?,
            captured: status == "succeeded",
            status,
            amount_cents: u64_at(body, "/amount").unwrap_or_default(),
            currency: str_at(body, "/currency")
                .unwrap_or_default()
                .to_ascii_uppercase(),
        })
    }
}

#[async_trait]
impl ProviderAdapter for StripeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn vendor(&self) -> &'static str {
        super::PROVIDER_NAME
    }

    async fn health_check(&self) -> HealthCheckResult {
        self.versioned(self.client.get("/balance")).probe().await
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    async fn create_charge(
        &self,
        request: &ChargeRequest,
        context: &RequestContext,
    ) -> Result<ChargeResult, ProviderError> {
        let mut form = vec![
            ("amount", request.amount_cents.to_string()),
            ("currency", request.currency.to_ascii_lowercase()),
            ("payment_method", request.payment_method.clone()),
            ("confirm", "true".to_string()),
        ];
        if let Some(customer) = &request.customer {
            form.push(("customer", customer.clone()));
        }
        if let Some(description) = &request.description {
            form.push(("description", description.clone()));
        }

        let idempotency_key = request
            .idempotency_key
            .as_deref()
            .unwrap_or(&context.request_id);
        let body = self
            .versioned(self.client.post("/payment_intents"))
            .header("Idempotency-Key", idempotency_key)
            .form(&form)
            .timeout(context.timeout)
            .send_json()
            .await?;

        self.charge_result(&body)
    }

    async fn refund_charge(
        &self,
        request: &RefundRequest,
        context: &RequestContext,
    ) -> Result<RefundResult, ProviderError> {
        let mut form = vec![("payment_intent", request.charge_id.clone())];
        if let Some(amount) = request.amount_cents {
            form.push(("amount", amount.to_string()));
        }
        if let Some(reason) = &request.reason {
            form.push(("reason", reason.clone()));
        }

        let body = self
            .versioned(self.client.post("/refunds"))
            .header("Idempotency-Key", &context.request_id)
            .form(&form)
            .timeout(context.timeout)
            .send_json()
            .await?;

        Ok(RefundResult {
            refund_id: required_str(&self.name, &body, "/id")?,
            charge_id: str_at(&body, "/payment_intent")
                .unwrap_or(&request.charge_id)
                .to_string(),
            status: str_at(&body, "/status").unwrap_or("pending").to_string(),
            amount_cents: u64_at(&body, "/amount").unwrap_or_default(),
        })
    }

    async fn get_charge(
        &self,
        charge_id: &str,
        context: &RequestContext,
    ) -> Result<ChargeResult, ProviderError> {
        let body = self
            .versioned(self.client.get(&format!("/payment_intents/{}", charge_id)))
            .timeout(context.timeout)
            .send_json()
            .await?;

        self.charge_result(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::providers::base::API_BASE_SETTING;
    use crate::core::types::ProviderCategory;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> StripeProvider {
        let config = ProviderConfig::new(ProviderCategory::Payment, "stripe")
            .with_credential("secret_key", "sk_test_4eC39HqLyjWDarjtT1zdp7dc")
            .with_setting("api_version", "2024-06-20")
            .with_setting(API_BASE_SETTING, server.uri());
        StripeProvider::new(&config).unwrap()
    }

    fn charge() -> ChargeRequest {
        ChargeRequest {
            amount_cents: 2000,
            currency: "USD".to_string(),
            payment_method: "pm_card_visa".to_string(),
            customer: None,
            description: None,
            idempotency_key: Some("order-991".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_charge_sends_idempotency_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment_intents"))
            .and(header("Idempotency-Key", "order-991"))
            .and(header("Stripe-Version", "2024-06-20"))
            .and(body_string_contains("currency=usd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_3MtwBwLkdIwHu7ix28a3tqPa",
                "status": "succeeded",
                "amount": 2000,
                "currency": "usd"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let context = RequestContext::new("req-1", Duration::from_secs(2));
        let result = provider(&server).create_charge(&charge(), &context).await.unwrap();
        assert_eq!(result.charge_id, "pi_3MtwBwLkdIwHu7ix28a3tqPa");
        assert!(result.captured);
        assert_eq!(result.currency, "USD");
    }

    #[tokio::test]
    async fn test_card_declined_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment_intents"))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({
                "error": {"code": "card_declined", "message": "Your card was declined."}
            })))
            .mount(&server)
            .await;

        let context = RequestContext::new("req-2", Duration::from_secs(2));
        let err = provider(&server).create_charge(&charge(), &context).await.unwrap_err();
        assert!(err.is_clean_rejection());
        assert!(err.to_string().contains("Your card was declined."));
    }

    #[tokio::test]
    async fn test_refund_timeout_is_ambiguous() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/refunds"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let refund = RefundRequest {
            charge_id: "pi_123".to_string(),
            amount_cents: None,
            reason: None,
        };
        let context = RequestContext::new("req-3", Duration::from_millis(100));
        let err = provider(&server)
            .refund_charge(&refund, &context)
            .await
            .unwrap_err();
        assert!(err.is_ambiguous());
    }
}
