//! Credential masking
//!
//! Secrets leave the process only in masked form: the last four characters
//! stay visible, everything before them is replaced.

use std::collections::BTreeMap;

/// Number of trailing characters left visible by [`mask_secret`]
pub const VISIBLE_SUFFIX_LEN: usize = 4;

const MASK: &str = "****";

/// Mask a secret, keeping only its last four characters.
///
/// Values of four characters or fewer are masked entirely so the mask never
/// reveals a whole secret.
pub fn mask_secret(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_SUFFIX_LEN {
        return MASK.to_string();
    }

    let suffix: String = value.chars().skip(len - VISIBLE_SUFFIX_LEN).collect();
    format!("{}{}", MASK, suffix)
}

/// Mask every value of a credential map
pub fn mask_credentials(credentials: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    credentials
        .iter()
        .map(|(key, value)| (key.clone(), mask_secret(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask_secret("sk_live_1234567890abcd"), "****abcd");
    }

    #[test]
    fn test_mask_short_values_fully() {
        assert_eq!(mask_secret("abcd"), "****");
        assert_eq!(mask_secret("ab"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn test_mask_multibyte() {
        assert_eq!(mask_secret("clé-secrète"), "****rète");
    }

    #[test]
    fn test_mask_credentials_map() {
        let mut creds = BTreeMap::new();
        creds.insert("api_key".to_string(), "SG.abcdefghijkl".to_string());
        creds.insert("pin".to_string(), "1234".to_string());

        let masked = mask_credentials(&creds);
        assert_eq!(masked["api_key"], "****ijkl");
        assert_eq!(masked["pin"], "****");
    }
}
