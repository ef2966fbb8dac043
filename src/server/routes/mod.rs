//! HTTP route modules
//!
//! Every dispatching endpoint answers with the same envelope:
//! `{success: true, request_id, provider, data}` on success and
//! `{success: false, error, details}` on failure, where `error` is the
//! failover code and `details.attempts` lists every provider call made.

pub mod health;
pub mod messaging;
pub mod payments;
pub mod providers;
pub mod tax;

use crate::core::orchestrator::{DispatchOptions, FailoverError, FailoverResult};
use crate::core::types::ProviderRequest;
use crate::server::state::AppState;
use crate::utils::error::{Result, ServiceError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Register every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes).service(
        web::scope("/api/v1")
            .configure(tax::configure_routes)
            .configure(messaging::configure_routes)
            .configure(payments::configure_routes)
            .configure(providers::configure_routes),
    );
}

/// JSON extractor config answering malformed bodies with the failure envelope
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ServiceError::validation(err.to_string()).into())
}

/// Query extractor config answering malformed query strings with the failure envelope
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ServiceError::validation(err.to_string()).into())
}

/// Dispatch knobs accepted as query parameters on every dispatching endpoint
#[derive(Debug, Default, Deserialize)]
pub struct DispatchQuery {
    /// Provider tried first when it is live
    pub provider: Option<String>,
    /// `false` tries only the first candidate
    pub failover: Option<bool>,
    /// Overall time budget across attempts
    pub timeout_ms: Option<u64>,
}

impl DispatchQuery {
    pub fn options(&self) -> DispatchOptions {
        let mut options = DispatchOptions::default();
        if let Some(provider) = self.provider.as_deref().filter(|p| !p.trim().is_empty()) {
            options = options.with_preferred(provider);
        }
        if let Some(failover) = self.failover {
            options = options.with_failover(failover);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            options = options.with_budget(Duration::from_millis(timeout_ms));
        }
        options
    }
}

/// HTTP status of a failed dispatch
pub fn failover_status(error: &FailoverError) -> StatusCode {
    match error {
        FailoverError::NoProviderConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
        FailoverError::ProviderRejection { .. } | FailoverError::AllProvidersExhausted { .. } => {
            StatusCode::BAD_GATEWAY
        }
        FailoverError::ProviderAmbiguous { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Envelope body of one dispatch result
pub fn result_body(result: &FailoverResult) -> Value {
    match &result.error {
        None => json!({
            "success": true,
            "request_id": result.request_id,
            "provider": result.provider_used,
            "data": result.data,
        }),
        Some(error) => json!({
            "success": false,
            "error": error.code(),
            "details": {
                "message": error.to_string(),
                "request_id": result.request_id,
                "category": result.category,
                "operation": result.operation,
                "requires_reconciliation": error.requires_reconciliation(),
                "attempts": result.attempts,
            },
        }),
    }
}

/// Envelope plus status code of one dispatch result
pub fn failover_response(result: &FailoverResult) -> HttpResponse {
    let status = result
        .error
        .as_ref()
        .map(failover_status)
        .unwrap_or(StatusCode::OK);
    HttpResponse::build(status).json(result_body(result))
}

/// Validate `request`, dispatch it and render the result
pub(crate) async fn dispatch(
    state: &AppState,
    request: ProviderRequest,
    query: &DispatchQuery,
) -> Result<HttpResponse> {
    request.validate().map_err(ServiceError::validation)?;
    let result = state.orchestrator.dispatch(&request, &query.options()).await;
    Ok(failover_response(&result))
}
