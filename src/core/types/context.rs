//! Per-call context handed to adapters

use std::time::Duration;

/// Context for one adapter invocation
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID, forwarded to vendors that accept one
    pub request_id: String,
    /// Time the adapter may spend on the remote call
    pub timeout: Duration,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            request_id: request_id.into(),
            timeout,
        }
    }

    /// Fresh context with a generated request ID
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(crate::utils::generate_request_id(), timeout)
    }
}
