//! Avalara Configuration

use crate::core::providers::base::{api_base, credential, require_fields};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::ProviderConfig;

use super::DEFAULT_API_BASE;

const DEFAULT_COMPANY_CODE: &str = "DEFAULT";

/// Typed view of an Avalara provider config
#[derive(Clone)]
pub struct AvalaraConfig {
    pub account_id: String,
    pub license_key: String,
    pub company_code: String,
    pub api_base: String,
}

impl AvalaraConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        require_fields(config, &["account_id", "license_key"], &[])?;

        Ok(Self {
            account_id: credential(config, "account_id"),
            license_key: credential(config, "license_key"),
            company_code: config
                .setting("company_code")
                .unwrap_or(DEFAULT_COMPANY_CODE)
                .to_string(),
            api_base: api_base(config, DEFAULT_API_BASE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProviderCategory;

    #[test]
    fn test_avalara_config() {
        let config = ProviderConfig::new(ProviderCategory::Tax, "avalara")
            .with_credential("account_id", "1100012345")
            .with_credential("license_key", "ABCDEF0123456789");

        let avalara = AvalaraConfig::from_provider_config(&config).unwrap();
        assert_eq!(avalara.company_code, "DEFAULT");
        assert_eq!(avalara.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_avalara_config_missing_fields() {
        let config = ProviderConfig::new(ProviderCategory::Tax, "avalara");
        let err = AvalaraConfig::from_provider_config(&config).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Configuration error for avalara: missing required field(s): account_id, license_key"
        );
    }
}
