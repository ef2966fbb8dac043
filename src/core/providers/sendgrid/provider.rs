//! SendGrid Provider Implementation

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::{Value, json};

use crate::core::providers::base::{VendorAuth, VendorClient, str_at, u64_at};
use crate::core::providers::capabilities::{
    HealthCheckResult, MessagingProvider, ProviderAdapter,
};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{
    DeliveryStats, DeliveryStatus, Message, ProviderCategory, ProviderConfig, RecipientValidation,
    RequestContext, SendReceipt, StatsWindow,
};
use crate::utils::is_valid_email;

use super::SendGridConfig;

/// Window reported when the caller gives no start date
const DEFAULT_STATS_DAYS: i64 = 30;

pub struct SendGridProvider {
    name: String,
    config: SendGridConfig,
    client: VendorClient,
}

impl SendGridProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let sendgrid = SendGridConfig::from_provider_config(config)?;
        let client = VendorClient::new(
            &config.provider_name,
            sendgrid.api_base.clone(),
            VendorAuth::Bearer(sendgrid.api_key.clone()),
        )?;

        Ok(Self {
            name: config.provider_name.clone(),
            config: sendgrid,
            client,
        })
    }

    fn mail_body(&self, message: &Message) -> Value {
        let mut content = vec![json!({"type": "text/plain", "value": message.text})];
        if let Some(html) = &message.html {
            content.push(json!({"type": "text/html", "value": html}));
        }

        let mut personalization = json!({ "to": [{ "email": message.to }] });
        if let Some(reference) = &message.reference {
            personalization["custom_args"] = json!({ "reference": reference });
        }

        let mut from = json!({
            "email": message.from.as_deref().unwrap_or(&self.config.from_email),
        });
        if let Some(name) = &self.config.from_name {
            from["name"] = json!(name);
        }

        json!({
            "personalizations": [personalization],
            "from": from,
            "subject": message.subject,
            "content": content,
        })
    }
}

#[async_trait]
impl ProviderAdapter for SendGridProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn vendor(&self) -> &'static str {
        super::PROVIDER_NAME
    }

    async fn health_check(&self) -> HealthCheckResult {
        self.client.get("/scopes").probe().await
    }
}

#[async_trait]
impl MessagingProvider for SendGridProvider {
    fn channel(&self) -> ProviderCategory {
        ProviderCategory::Email
    }

    async fn send(
        &self,
        message: &Message,
        context: &RequestContext,
    ) -> Result<SendReceipt, ProviderError> {
        let response = self
            .client
            .post("/mail/send")
            .json(&self.mail_body(message))
            .timeout(context.timeout)
            .send()
            .await?;

        // Accepted mail is answered with 202 and the ID in a header
        let message_id = response
            .header("x-message-id")
            .map(str::to_string)
            .unwrap_or_else(|| context.request_id.clone());

        Ok(SendReceipt {
            message_id,
            status: "queued".to_string(),
            accepted_at: Utc::now(),
        })
    }

    async fn validate_recipient(
        &self,
        recipient: &str,
        _context: &RequestContext,
    ) -> Result<RecipientValidation, ProviderError> {
        let valid = is_valid_email(recipient);
        Ok(RecipientValidation {
            recipient: recipient.to_string(),
            valid,
            reason: (!valid).then(|| "malformed email address".to_string()),
        })
    }

    async fn get_delivery_status(
        &self,
        message_id: &str,
        context: &RequestContext,
    ) -> Result<DeliveryStatus, ProviderError> {
        let body = self
            .client
            .get(&format!("/messages/{}", message_id))
            .timeout(context.timeout)
            .send_json()
            .await?;

        Ok(DeliveryStatus {
            message_id: str_at(&body, "/msg_id").unwrap_or(message_id).to_string(),
            status: str_at(&body, "/status").unwrap_or("unknown").to_string(),
            updated_at: str_at(&body, "/last_event_time")
                .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                .map(|t| t.with_timezone(&Utc)),
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
        let mut query = vec![("start_date", start.to_string())];
        if let Some(end) = window.end_date {
            query.push(("end_date", end.to_string()));
        }

        let body = self
            .client
            .get("/stats")
            .query(&query)
            .timeout(context.timeout)
            .send_json()
            .await?;

        let mut stats = DeliveryStats {
            requests: 0,
            delivered: Some(0),
            failed: Some(0),
        };
        let metrics = body
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|day| day.get("stats").and_then(Value::as_array))
            .flatten()
            .filter_map(|entry| entry.get("metrics"));
        for metrics in metrics {
            let count = |key: &str| u64_at(metrics, &format!("/{}", key)).unwrap_or_default();
            stats.requests += count("requests");
            stats.delivered = stats.delivered.map(|d| d + count("delivered"));
            stats.failed = stats
                .failed
                .map(|f| f + count("bounces") + count("blocks") + count("invalid_emails"));
        }
        Ok(stats)
    }
}
