//! SendGrid Configuration

use crate::core::providers::base::{api_base, credential, require_fields};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::ProviderConfig;
use crate::utils::is_valid_email;

use super::DEFAULT_API_BASE;

/// Typed view of a SendGrid provider config
#[derive(Clone)]
pub struct SendGridConfig {
    pub api_key: String,
    pub api_base: String,
    /// Default sender address
    pub from_email: String,
    pub from_name: Option<String>,
}

impl SendGridConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        require_fields(config, &["api_key"], &["from_email"])?;

        let from_email = config.setting("from_email").unwrap_or_default().to_string();
        if !is_valid_email(&from_email) {
            return Err(ProviderError::invalid_configuration(
                &config.provider_name,
                format!("from_email '{}' is not a valid email address", from_email),
            ));
        }

        Ok(Self {
            api_key: credential(config, "api_key"),
            api_base: api_base(config, DEFAULT_API_BASE)?,
            from_email,
            from_name: config.setting("from_name").map(str::to_string),
        })
    }
}
