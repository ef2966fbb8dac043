//! Twilio Configuration

use crate::core::providers::base::{api_base, credential, require_fields};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::ProviderConfig;
use crate::utils::is_valid_phone_number;

use super::DEFAULT_API_BASE;

/// Typed view of a Twilio provider config
#[derive(Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub api_base: String,
    /// Sender number in E.164 form
    pub from_number: String,
    pub status_callback: Option<String>,
}

impl TwilioConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        require_fields(config, &["account_sid", "auth_token"], &["from_number"])?;

        let from_number = config.setting("from_number").unwrap_or_default().to_string();
        if !is_valid_phone_number(&from_number) {
            return Err(ProviderError::invalid_configuration(
                &config.provider_name,
                "from_number must be an E.164 phone number",
            ));
        }

        Ok(Self {
            account_sid: credential(config, "account_sid"),
            auth_token: credential(config, "auth_token"),
            api_base: api_base(config, DEFAULT_API_BASE)?,
            from_number,
            status_callback: config.setting("status_callback").map(str::to_string),
        })
    }
}
