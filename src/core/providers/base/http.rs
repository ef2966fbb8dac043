//! Vendor HTTP client
//!
//! Thin wrapper over `reqwest` that turns every transport outcome into a
//! classified [`ProviderError`]:
//!
//! - connection failure before the request was sent: clean rejection
//! - explicit HTTP error (4xx, 5xx other than 408/504): clean rejection
//! - timeout, 408/504, failure after send, unreadable 2xx body: ambiguous

use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::core::providers::capabilities::HealthCheckResult;
use crate::core::providers::unified_provider::ProviderError;
use crate::utils::truncate_string;

/// Upper bound for any vendor call; per-call timeouts are normally shorter
const CLIENT_TIMEOUT_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;
const MAX_ERROR_MESSAGE_LEN: usize = 300;

/// How requests authenticate against the vendor
#[derive(Clone)]
pub enum VendorAuth {
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

/// HTTP client bound to one vendor API base
#[derive(Clone)]
pub struct VendorClient {
    provider: String,
    base_url: String,
    auth: VendorAuth,
    client: Client,
}

impl VendorClient {
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        auth: VendorAuth,
    ) -> Result<Self, ProviderError> {
        let provider = provider.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                ProviderError::invalid_configuration(
                    &provider,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            provider,
            base_url: base_url.into(),
            auth,
            client,
        })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get(&self, path: &str) -> VendorRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> VendorRequest<'_> {
        self.request(Method::POST, path)
    }

    pub fn delete(&self, path: &str) -> VendorRequest<'_> {
        self.request(Method::DELETE, path)
    }

    fn request(&self, method: Method, path: &str) -> VendorRequest<'_> {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method.clone(), &url);
        let builder = match &self.auth {
            VendorAuth::None => builder,
            VendorAuth::Bearer(token) => builder.bearer_auth(token),
            VendorAuth::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
        };

        VendorRequest {
            client: self,
            method,
            path: path.to_string(),
            builder,
        }
    }
}

/// Request under construction
pub struct VendorRequest<'a> {
    client: &'a VendorClient,
    method: Method,
    path: String,
    builder: reqwest::RequestBuilder,
}

impl<'a> VendorRequest<'a> {
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.builder = self.builder.json(body);
        self
    }

    pub fn form<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.builder = self.builder.form(body);
        self
    }

    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        self.builder = self.builder.query(query);
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Send and classify the outcome
    pub async fn send(self) -> Result<VendorResponse, ProviderError> {
        let provider = self.client.provider.as_str();
        debug!(
            provider = %provider,
            method = %self.method,
            path = %self.path,
            "Sending vendor request"
        );

        let response = self
            .builder
            .send()
            .await
            .map_err(|e| classify_transport_error(provider, &e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::timeout(provider, format!("reading response body: {}", e))
            } else {
                ProviderError::ambiguous(
                    provider,
                    Some(status.as_u16()),
                    format!("connection lost while reading response: {}", e),
                )
            }
        })?;

        if status.is_success() {
            let body = if bytes.iter().all(u8::is_ascii_whitespace) {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).map_err(|e| {
                    ProviderError::ambiguous(
                        provider,
                        Some(status.as_u16()),
                        format!("unreadable response body: {}", e),
                    )
                })?
            };
            return Ok(VendorResponse {
                status,
                headers,
                body,
            });
        }

        Err(classify_status(provider, status, &bytes))
    }

    /// Send, keeping only the JSON body
    pub async fn send_json(self) -> Result<Value, ProviderError> {
        Ok(self.send().await?.body)
    }

    /// Send as a health probe: healthy on any 2xx response
    pub async fn probe(self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.send().await;
        let elapsed = start.elapsed().as_millis() as u64;
        match result {
            Ok(_) => HealthCheckResult::healthy(elapsed),
            Err(e) => HealthCheckResult::unhealthy(elapsed, e.to_string()),
        }
    }
}

/// Successful vendor response
#[derive(Debug)]
pub struct VendorResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `Null` when the vendor sent no body
    pub body: Value,
}

impl VendorResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

fn classify_transport_error(provider: &str, error: &reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::timeout(provider, error.to_string())
    } else if error.is_connect() {
        ProviderError::network(provider, error.to_string())
    } else if error.is_builder() {
        ProviderError::invalid_request(provider, error.to_string())
    } else {
        // Failed after the request may have left the process
        ProviderError::ambiguous(provider, None, error.to_string())
    }
}

fn classify_status(provider: &str, status: StatusCode, body: &[u8]) -> ProviderError {
    let message = error_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::ambiguous(provider, Some(status.as_u16()), message)
        }
        _ => ProviderError::rejected(provider, Some(status.as_u16()), message),
    }
}

/// Best-effort human message from a vendor error body
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        [
            "/error/message",
            "/message",
            "/error",
            "/detail",
            "/errors/0/message",
            "/errors/0/detail",
        ]
        .iter()
        .find_map(|pointer| v.pointer(pointer).and_then(Value::as_str))
        .map(str::to_string)
    });

    let message = message.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(body);
        let text = text.trim();
        if text.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        } else {
            text.to_string()
        }
    });

    truncate_string(&message, MAX_ERROR_MESSAGE_LEN)
}
