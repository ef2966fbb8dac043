//! Unified Provider Error Handling
//!
//! Single error type for all adapters. Every variant is classified as either
//! a *clean rejection* (the vendor did not act, so another provider may be
//! tried) or an *ambiguous* failure (the vendor may have acted, so a write
//! must not be replayed elsewhere).
//!
//! | Variant | Meaning | Classification |
//! |------|------|--------|
//! | Configuration | Required config fields missing | Clean (adapter never built) |
//! | InvalidConfiguration | Config present but unusable | Clean |
//! | Rejected | Explicit vendor error response | Clean |
//! | Network | Connection failed before the request was sent | Clean |
//! | NotSupported | Operation not offered by this adapter | Clean |
//! | InvalidRequest | Request could not be built | Clean |
//! | Timeout | No answer within the deadline | Ambiguous |
//! | Ambiguous | Outcome unknown (408/504, reset after send, unreadable body) | Ambiguous |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use provider_failover::core::providers::ProviderError;
//!
//! let err = ProviderError::rejected("taxjar", Some(422), "to_zip is invalid");
//! assert!(err.is_clean_rejection());
//!
//! let err = ProviderError::timeout("sendgrid", "no response within 10s");
//! assert!(err.is_ambiguous());
//! ```

/// Unified provider error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Configuration error for {provider}: missing required field(s): {}", .missing.join(", "))]
    Configuration {
        provider: String,
        missing: Vec<String>,
    },

    #[error("Invalid configuration for {provider}: {message}")]
    InvalidConfiguration { provider: String, message: String },

    #[error("{provider} rejected the request{}: {message}", status_suffix(.status))]
    Rejected {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network { provider: String, message: String },

    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported { provider: String, operation: String },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest { provider: String, message: String },

    #[error("Timeout for {provider}: {message}")]
    Timeout { provider: String, message: String },

    #[error("Outcome unknown for {provider}{}: {message}", status_suffix(.status))]
    Ambiguous {
        provider: String,
        status: Option<u16>,
        message: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|status| format!(" (status {})", status))
        .unwrap_or_default()
}

impl ProviderError {
    /// Create configuration error naming every missing field
    pub fn configuration(provider: impl Into<String>, missing: Vec<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            missing,
        }
    }

    /// Create invalid configuration error
    pub fn invalid_configuration(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create rejection error
    pub fn rejected(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Rejected {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create network error (request never reached the vendor)
    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create not supported error
    pub fn not_supported(provider: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::NotSupported {
            provider: provider.into(),
            operation: operation.into(),
        }
    }

    /// Create invalid request error
    pub fn invalid_request(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create timeout error
    pub fn timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create ambiguous error
    pub fn ambiguous(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Ambiguous {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Remote state unknown: the vendor may have applied the operation
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Ambiguous { .. })
    }

    /// The vendor confirmed nothing happened (or was never reached)
    pub fn is_clean_rejection(&self) -> bool {
        !self.is_ambiguous()
    }

    /// Adapter construction failure
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::InvalidConfiguration { .. }
        )
    }

    /// Get provider name
    pub fn provider(&self) -> &str {
        match self {
            Self::Configuration { provider, .. }
            | Self::InvalidConfiguration { provider, .. }
            | Self::Rejected { provider, .. }
            | Self::Network { provider, .. }
            | Self::NotSupported { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Ambiguous { provider, .. } => provider,
        }
    }

    /// HTTP status returned by the vendor, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } | Self::Ambiguous { status, .. } => *status,
            _ => None,
        }
    }
}
