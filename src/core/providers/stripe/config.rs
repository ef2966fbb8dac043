//! Stripe Configuration

use crate::core::providers::base::{api_base, credential, require_fields};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::ProviderConfig;

use super::DEFAULT_API_BASE;

/// Typed view of a Stripe provider config
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
    /// Pinned API version sent as `Stripe-Version`
    pub api_version: Option<String>,
}

impl StripeConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        require_fields(config, &["secret_key"], &[])?;

        Ok(Self {
            secret_key: credential(config, "secret_key"),
            api_base: api_base(config, DEFAULT_API_BASE)?,
            api_version: config.setting("api_version").map(str::to_string),
        })
    }
}
