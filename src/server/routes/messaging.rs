//! Email and SMS endpoints

use super::{DispatchQuery, dispatch, result_body};
use crate::config::BatchConfig;
use crate::core::orchestrator::BatchOptions;
use crate::core::types::{Message, MessageRequest, ProviderCategory, ProviderRequest};
use crate::server::state::AppState;
use crate::utils::error::{Result, ServiceError};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/email")
            .route("/send", web::post().to(send_email))
            .route("/send-batch", web::post().to(send_email_batch))
            .route("/messages/{id}", web::get().to(email_status)),
    )
    .service(
        web::scope("/sms")
            .route("/send", web::post().to(send_sms))
            .route("/messages/{id}", web::get().to(sms_status)),
    );
}

/// Batch email payload
///
/// `batch_size` can only narrow the configured window and `delay_ms` can only
/// lengthen the configured pause.
#[derive(Debug, Deserialize)]
pub struct SendBatchBody {
    pub messages: Vec<Message>,
    pub batch_size: Option<usize>,
    pub delay_ms: Option<u64>,
}

impl SendBatchBody {
    fn batch_options(&self, config: &BatchConfig) -> BatchOptions {
        let mut batch = BatchOptions::from(config);
        if let Some(batch_size) = self.batch_size {
            batch.batch_size = batch_size.clamp(1, config.batch_size.max(1));
        }
        if let Some(delay_ms) = self.delay_ms {
            batch.delay = batch.delay.max(Duration::from_millis(delay_ms));
        }
        batch
    }
}

/// Result slot of a message that failed validation and was never dispatched
fn invalid_message(index: usize, error: &str) -> Value {
    json!({
        "success": false,
        "error": "validation_error",
        "details": {
            "message": format!("messages[{}]: {}", index, error),
            "index": index,
        },
    })
}

/// POST /api/v1/email/send
pub async fn send_email(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    body: web::Json<Message>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Email(MessageRequest::Send(body.into_inner()));
    dispatch(&state, request, &query).await
}

/// POST /api/v1/sms/send
pub async fn send_sms(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    body: web::Json<Message>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Sms(MessageRequest::Send(body.into_inner()));
    dispatch(&state, request, &query).await
}

/// GET /api/v1/email/messages/{id}
pub async fn email_status(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Email(MessageRequest::GetDeliveryStatus {
        message_id: path.into_inner(),
    });
    dispatch(&state, request, &query).await
}

/// GET /api/v1/sms/messages/{id}
pub async fn sms_status(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Sms(MessageRequest::GetDeliveryStatus {
        message_id: path.into_inner(),
    });
    dispatch(&state, request, &query).await
}

/// POST /api/v1/email/send-batch
///
/// 200 once the batch itself is acceptable; per-message outcomes are in
/// `results`, in input order. Invalid messages fail in their own slot and
/// the rest are still dispatched.
pub async fn send_email_batch(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    body: web::Json<SendBatchBody>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let config = &state.config.orchestrator.batch;
    if body.messages.is_empty() {
        return Err(ServiceError::validation("messages must not be empty"));
    }
    if body.messages.len() > config.max_messages {
        return Err(ServiceError::validation(format!(
            "a batch holds at most {} messages, got {}",
            config.max_messages,
            body.messages.len()
        )));
    }
    let batch = body.batch_options(config);

    // `None` marks a slot filled by the next dispatched result
    let mut slots: Vec<Option<Value>> = Vec::with_capacity(body.messages.len());
    let mut requests = Vec::with_capacity(body.messages.len());
    for (index, message) in body.messages.into_iter().enumerate() {
        let request = ProviderRequest::Email(MessageRequest::Send(message));
        match request.validate() {
            Ok(()) => {
                slots.push(None);
                requests.push(request);
            }
            Err(e) => slots.push(Some(invalid_message(index, &e))),
        }
    }

    let mut dispatched = state
        .orchestrator
        .dispatch_batch(&requests, &query.options(), batch)
        .await
        .into_iter();
    let results: Vec<Value> = slots
        .into_iter()
        .map(|slot| match slot {
            Some(invalid) => invalid,
            None => dispatched
                .next()
                .map(|result| result_body(&result))
                .unwrap_or_default(),
        })
        .collect();

    let succeeded = results.iter().filter(|r| r["success"] == true).count();
    info!(
        category = %ProviderCategory::Email,
        total = results.len(),
        invalid = results.len() - requests.len(),
        succeeded,
        "Email batch dispatched"
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": succeeded == results.len(),
        "total": results.len(),
        "succeeded": succeeded,
        "failed": results.len() - succeeded,
        "results": results,
    })))
}
