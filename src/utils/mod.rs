//! Utility modules for the orchestrator service
//!
//! - **error**: crate-wide error type and HTTP mapping
//! - **logging**: tracing subscriber setup
//! - **sanitization**: credential masking for logs and external reads

pub mod error;
pub mod logging;
pub mod sanitization;

pub use error::{Result, ServiceError};

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static E164_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").expect("valid E.164 regex"));

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Check if a string is a valid email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check if a string is an E.164 phone number (`+` followed by 7-15 digits)
pub fn is_valid_phone_number(number: &str) -> bool {
    E164_REGEX.is_match(number)
}

/// Truncate string to specified length with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test.email+tag@domain.co.uk"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("@domain.com"));
    }

    #[test]
    fn test_is_valid_phone_number() {
        assert!(is_valid_phone_number("+14155550123"));
        assert!(is_valid_phone_number("+447700900123"));
        assert!(!is_valid_phone_number("4155550123"));
        assert!(!is_valid_phone_number("+0123456789"));
        assert!(!is_valid_phone_number("+1 415 555 0123"));
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(generate_request_id(), generate_request_id());
    }
}
