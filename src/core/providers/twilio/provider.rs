//! Twilio Provider Implementation

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::Value;

use crate::core::providers::base::{VendorAuth, VendorClient, required_str, str_at, u64_at};
use crate::core::providers::capabilities::{
    HealthCheckResult, MessagingProvider, ProviderAdapter,
};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{
    DeliveryStats, DeliveryStatus, Message, ProviderCategory, ProviderConfig, RecipientValidation,
    RequestContext, SendReceipt, StatsWindow,
};
use crate::utils::is_valid_phone_number;

use super::TwilioConfig;

/// Usage category counting outbound messages
const SMS_OUTBOUND_CATEGORY: &str = "sms-outbound";
const DEFAULT_STATS_DAYS: i64 = 30;

pub struct TwilioProvider {
    name: String,
    config: TwilioConfig,
    client: VendorClient,
}

impl TwilioProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let twilio = TwilioConfig::from_provider_config(config)?;
        let client = VendorClient::new(
            &config.provider_name,
            twilio.api_base.clone(),
            VendorAuth::Basic {
                username: twilio.account_sid.clone(),
                password: twilio.auth_token.clone(),
            },
        )?;

        Ok(Self {
            name: config.provider_name.clone(),
            config: twilio,
            client,
        })
    }

    fn account_path(&self, suffix: &str) -> String {
        format!("/Accounts/{}{}", self.config.account_sid, suffix)
    }
}

/// Twilio timestamps are RFC 2822
fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|t| DateTime::parse_from_rfc2822(t).ok())
        .map(|t| t.with_timezone(&Utc))
}

#[async_trait]
impl ProviderAdapter for TwilioProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn vendor(&self) -> &'static str {
        super::PROVIDER_NAME
    }

    async fn health_check(&self) -> HealthCheckResult {
        self.client.get(&self.account_path(".json")).probe().await
    }
}

#[async_trait]
impl MessagingProvider for TwilioProvider {
    fn channel(&self) -> ProviderCategory {
        ProviderCategory::Sms
    }

    async fn send(
        &self,
        message: &Message,
        context: &RequestContext,
    ) -> Result<SendReceipt, ProviderError> {
        let mut form = vec![
            ("To", message.to.clone()),
            (
                "From",
                message
                    .from
                    .clone()
                    .unwrap_or_else(|| self.config.from_number.clone()),
            ),
            ("Body", message.text.clone()),
        ];
        if let Some(callback) = &self.config.status_callback {
            form.push(("StatusCallback", callback.clone()));
        }

        let body = self
            .client
            .post(&self.account_path("/Messages.json"))
            .form(&form)
            .timeout(context.timeout)
            .send_json()
            .await?;

        Ok(SendReceipt {
            message_id: required_str(&self.name, &body, "/sid")?,
            status: str_at(&body, "/status").unwrap_or("queued").to_string(),
            accepted_at: parse_timestamp(str_at(&body, "/date_created")).unwrap_or_else(Utc::now),
        })
    }

    async fn validate_recipient(
        &self,
        recipient: &str,
        _context: &RequestContext,
    ) -> Result<RecipientValidation, ProviderError> {
        let valid = is_valid_phone_number(recipient);
        Ok(RecipientValidation {
            recipient: recipient.to_string(),
            valid,
            reason: (!valid).then(|| "not an E.164 phone number".to_string()),
        })
    }

    async fn get_delivery_status(
        &self,
        message_id: &str,
        context: &RequestContext,
    ) -> Result<DeliveryStatus, ProviderError> {
        let body = self
            .client
            .get(&self.account_path(&format!("/Messages/{}.json", message_id)))
            .timeout(context.timeout)
            .send_json()
            .await?;

        Ok(DeliveryStatus {
            message_id: message_id.to_string(),
            status: str_at(&body, "/status").unwrap_or("unknown").to_string(),
            updated_at: parse_timestamp(str_at(&body, "/date_updated")),
        })
    }

    async fn get_stats(
        &self,
        window: &StatsWindow,
        context: &RequestContext,
    ) -> Result<DeliveryStats, ProviderError> {
        let start = window.start_date.unwrap_or_else(|| {
            (Utc::now() - ChronoDuration::days(DEFAULT_STATS_DAYS)).date_naive()
        });
        let end = window.end_date.unwrap_or_else(|| Utc::now().date_naive());

        let body = self
            .client
            .get(&self.account_path("/Usage/Records.json"))
            .query(&[
                ("Category", SMS_OUTBOUND_CATEGORY.to_string()),
                ("StartDate", start.to_string()),
                ("EndDate", end.to_string()),
            ])
            .timeout(context.timeout)
            .send_json()
            .await?;

        // Usage records report volume only
        let requests = body
            .get("usage_records")
            .and_then(Value::as_array)
            .map(|records| {
                records
                    .iter()
                    .filter_map(|r| u64_at(r, "/count"))
                    .sum::<u64>()
            })
            .unwrap_or_default();

        Ok(DeliveryStats {
            requests,
            delivered: None,
            failed: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::providers::base::API_BASE_SETTING;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> TwilioProvider {
        let config = ProviderConfig::new(ProviderCategory::Sms, "twilio")
            .with_credential("account_sid", "AC0123456789")
            .with_credential("auth_token", "tw-secret-5678")
            .with_setting("from_number", "+15005550006")
            .with_setting(API_BASE_SETTING, server.uri());
        TwilioProvider::new(&config).unwrap()
    }

    fn sms() -> Message {
        Message {
            to: "+14155550123".to_string(),
            from: None,
            subject: None,
            text: "Your code is 4821".to_string(),
            html: None,
            reference: None,
        }
    }

    #[tokio::test]
    async fn test_send_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Accounts/AC0123456789/Messages.json"))
            .and(body_string_contains("From=%2B15005550006"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "sid": "SM87105da94bff44b999e4e6eb90d8eb6a",
                "status": "queued",
                "date_created": "Thu, 30 Jul 2015 20:12:31 +0000"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let context = RequestContext::new("req-1", Duration::from_secs(2));
        let receipt = provider(&server).send(&sms(), &context).await.unwrap();
        assert_eq!(receipt.message_id, "SM87105da94bff44b999e4e6eb90d8eb6a");
        assert_eq!(receipt.accepted_at.to_rfc3339(), "2015-07-30T20:12:31+00:00");
    }

    #[tokio::test]
    async fn test_send_without_sid_is_ambiguous() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "queued"})))
            .mount(&server)
            .await;

        let context = RequestContext::new("req-2", Duration::from_secs(2));
        let err = provider(&server).send(&sms(), &context).await.unwrap_err();
        assert!(err.is_ambiguous());
    }

    #[tokio::test]
    async fn test_invalid_number_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 21211,
                "message": "The 'To' number is not a valid phone number.",
                "status": 400
            })))
            .mount(&server)
            .await;

        let context = RequestContext::new("req-3", Duration::from_secs(2));
        let err = provider(&server).send(&sms(), &context).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rejected { status: Some(400), .. }));
    }

    #[tokio::test]
    async fn test_get_stats_counts_usage_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Accounts/AC0123456789/Usage/Records.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "usage_records": [{"category": "sms-outbound", "count": "42"}]
            })))
            .mount(&server)
            .await;

        let context = RequestContext::new("req-4", Duration::from_secs(2));
        let stats = provider(&server)
            .get_stats(&StatsWindow::default(), &context)
            .await
            .unwrap();
        assert_eq!(stats.requests, 42);
        assert_eq!(stats.delivered, None);
    }
}
