//! TaxJar Configuration

use crate::core::providers::base::{api_base, credential, require_fields};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::ProviderConfig;

use super::DEFAULT_API_BASE;

/// Typed view of a TaxJar provider config
#[derive(Clone)]
pub struct TaxJarConfig {
    pub api_token: String,
    pub api_base: String,
    /// Nexus origin used when a request has no ship-from address
    pub from_country: Option<String>,
    pub from_zip: Option<String>,
    pub from_state: Option<String>,
}

impl TaxJarConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        require_fields(config, &["api_token"], &[])?;

        Ok(Self {
            api_token: credential(config, "api_token"),
            api_base: api_base(config, DEFAULT_API_BASE)?,
            from_country: config.setting("from_country").map(str::to_string),
            from_zip: config.setting("from_zip").map(str::to_string),
            from_state: config.setting("from_state").map(str::to_string),
        })
    }
}
