//! Failover error taxonomy

use crate::core::types::ProviderCategory;
use thiserror::Error;

/// Why a dispatch did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailoverError {
    /// No live provider exists for the category; nothing was attempted
    #[error("No provider configured for {category}")]
    NoProviderConfigured { category: ProviderCategory },

    /// The only attempted provider refused the request (failover disabled)
    #[error("Provider {provider} rejected the request: {message}")]
    ProviderRejection { provider: String, message: String },

    /// A write may or may not have been applied remotely
    #[error("Provider {provider} failed with unknown outcome: {message}")]
    ProviderAmbiguous { provider: String, message: String },

    /// Every candidate tried failed cleanly, or the deadline ran out
    #[error("All providers failed for {category} after {attempted} attempt(s)")]
    AllProvidersExhausted {
        category: ProviderCategory,
        attempted: usize,
    },
}

impl FailoverError {
    /// Stable machine-readable code used in HTTP error envelopes
    pub fn code(&self) -> &'static str {
        match self {
            FailoverError::NoProviderConfigured { .. } => "no_provider_configured",
            FailoverError::ProviderRejection { .. } => "provider_rejected",
            FailoverError::ProviderAmbiguous { .. } => "ambiguous_failure",
            FailoverError::AllProvidersExhausted { .. } => "all_providers_failed",
        }
    }

    /// Whether the caller must verify remote state before retrying
    pub fn requires_reconciliation(&self) -> bool {
        matches!(self, FailoverError::ProviderAmbiguous { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let exhausted = FailoverError::AllProvidersExhausted {
            category: ProviderCategory::Tax,
            attempted: 2,
        };
        assert_eq!(exhausted.code(), "all_providers_failed");
        assert_eq!(
            exhausted.to_string(),
            "All providers failed for TAX after 2 attempt(s)"
        );

        let ambiguous = FailoverError::ProviderAmbiguous {
            provider: "stripe".to_string(),
            message: "timed out".to_string(),
        };
        assert_eq!(ambiguous.code(), "ambiguous_failure");
        assert!(ambiguous.requires_reconciliation());
        assert_eq!(
            FailoverError::NoProviderConfigured {
                category: ProviderCategory::Sms
            }
            .code(),
            "no_provider_configured"
        );
    }
}
