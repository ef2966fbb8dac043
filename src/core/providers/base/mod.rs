//! Base infrastructure shared by all vendor adapters
//!
//! - **http**: vendor HTTP client with outcome classification
//! - config helpers: required-field checks and `api_base` resolution
//! - JSON helpers for lenient response parsing

pub mod http;

pub use http::{VendorAuth, VendorClient, VendorRequest, VendorResponse};

use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::ProviderConfig;
use serde_json::Value;

/// Setting key overriding a vendor's API base URL
pub const API_BASE_SETTING: &str = "api_base";

/// Check that every required credential and setting is present.
///
/// All missing fields are collected so one error names them together.
pub fn require_fields(
    config: &ProviderConfig,
    credentials: &[&str],
    settings: &[&str],
) -> Result<(), ProviderError> {
    let missing: Vec<String> = credentials
        .iter()
        .filter(|key| config.credential(key).is_none())
        .chain(settings.iter().filter(|key| config.setting(key).is_none()))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::configuration(&config.provider_name, missing))
    }
}

/// Resolve the API base URL from settings, falling back to the vendor default
pub fn api_base(config: &ProviderConfig, default: &str) -> Result<String, ProviderError> {
    let base = config.setting(API_BASE_SETTING).unwrap_or(default);
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(ProviderError::invalid_configuration(
            &config.provider_name,
            format!("{} must be an http(s) URL", API_BASE_SETTING),
        ));
    }
    Ok(base.trim_end_matches('/').to_string())
}

/// Required credential after [`require_fields`] has run
pub(crate) fn credential(config: &ProviderConfig, key: &str) -> String {
    config.credential(key).unwrap_or_default().to_string()
}

/// Number at a JSON pointer; vendors that send decimals as strings are accepted
pub fn f64_at(value: &Value, pointer: &str) -> Option<f64> {
    match value.pointer(pointer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Unsigned integer at a JSON pointer, accepting numeric strings
pub fn u64_at(value: &Value, pointer: &str) -> Option<u64> {
    match value.pointer(pointer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// String at a JSON pointer
pub fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer)?.as_str()
}

/// Required string field of a successful response.
///
/// A 2xx body missing its identifier means the vendor acted but the outcome
/// cannot be read, so this is ambiguous.
pub fn required_str(provider: &str, value: &Value, pointer: &str) -> Result<String, ProviderError> {
    str_at(value, pointer).map(str::to_string).ok_or_else(|| {
        ProviderError::ambiguous(
            provider,
            None,
            format!("response is missing '{}'", pointer.trim_start_matches('/')),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProviderCategory;
    use serde_json::json;

    #[test]
    fn test_require_fields_reports_all_missing() {
        let config = ProviderConfig::new(ProviderCategory::Tax, "avalara")
            .with_credential("account_id", "1100012345");

        let err = require_fields(&config, &["account_id", "license_key"], &["company_code"])
            .unwrap_err();
        match err {
            ProviderError::Configuration { provider, missing } => {
                assert_eq!(provider, "avalara");
                assert_eq!(missing, vec!["license_key", "company_code"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_base() {
        let config = ProviderConfig::new(ProviderCategory::Sms, "twilio");
        assert_eq!(
            api_base(&config, "https://api.twilio.com/2010-04-01").unwrap(),
            "https://api.twilio.com/2010-04-01"
        );

        let config = config.with_setting(API_BASE_SETTING, "http://127.0.0.1:9999/");
        assert_eq!(api_base(&config, "unused").unwrap(), "http://127.0.0.1:9999");

        let config = ProviderConfig::new(ProviderCategory::Sms, "twilio")
            .with_setting(API_BASE_SETTING, "ftp://example.com");
        assert!(api_base(&config, "unused").unwrap_err().is_configuration());
    }

    #[test]
    fn test_lenient_numbers() {
        let body = json!({"rate": {"combined_rate": "0.1025", "state_rate": 0.065}, "count": "12"});
        assert_eq!(f64_at(&body, "/rate/combined_rate"), Some(0.1025));
        assert_eq!(f64_at(&body, "/rate/state_rate"), Some(0.065));
        assert_eq!(u64_at(&body, "/count"), Some(12));
        assert_eq!(f64_at(&body, "/rate/missing"), None);
    }

    #[test]
    fn test_required_str_is_ambiguous() {
        let err = required_str("stripe", &json!({"status": "succeeded"}), "/id").unwrap_err();
        assert!(err.is_ambiguous());
    }
}
