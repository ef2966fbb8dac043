//! Provider categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability a set of interchangeable providers offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProviderCategory {
    Email,
    Sms,
    Tax,
    Payment,
}

impl ProviderCategory {
    /// Every category, in reporting order
    pub const ALL: [ProviderCategory; 4] = [
        ProviderCategory::Email,
        ProviderCategory::Sms,
        ProviderCategory::Tax,
        ProviderCategory::Payment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderCategory::Email => "EMAIL",
            ProviderCategory::Sms => "SMS",
            ProviderCategory::Tax => "TAX",
            ProviderCategory::Payment => "PAYMENT",
        }
    }
}

impl fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMAIL" => Ok(ProviderCategory::Email),
            "SMS" => Ok(ProviderCategory::Sms),
            "TAX" => Ok(ProviderCategory::Tax),
            "PAYMENT" => Ok(ProviderCategory::Payment),
            other => Err(format!("Unknown provider category: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("tax".parse::<ProviderCategory>(), Ok(ProviderCategory::Tax));
        assert_eq!(" Sms ".parse::<ProviderCategory>(), Ok(ProviderCategory::Sms));
        assert!("fax".parse::<ProviderCategory>().is_err());
    }

    #[test]
    fn test_serde_uses_upper_case() {
        let json = serde_json::to_string(&ProviderCategory::Payment).unwrap();
        assert_eq!(json, "\"PAYMENT\"");

        let parsed: ProviderCategory = serde_json::from_str("\"EMAIL\"").unwrap();
        assert_eq!(parsed, ProviderCategory::Email);
    }
}
