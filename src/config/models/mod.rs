//! Configuration data models
//!
//! This module defines all configuration structures used by the service.

pub mod logging;
pub mod orchestrator;
pub mod server;
pub mod storage;

// Re-export all configuration types
pub use logging::*;
pub use orchestrator::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default maximum request body size in bytes
pub fn default_max_body_size() -> usize {
    2 * 1024 * 1024 // 2MB
}

/// Default database URL (in-process store)
pub fn default_database_url() -> String {
    storage::MEMORY_DATABASE_URL.to_string()
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_tax_timeout_ms() -> u64 {
    5_000
}

pub fn default_email_timeout_ms() -> u64 {
    10_000
}

pub fn default_sms_timeout_ms() -> u64 {
    10_000
}

pub fn default_payment_timeout_ms() -> u64 {
    15_000
}

pub fn default_health_check_timeout_ms() -> u64 {
    5_000
}

pub fn default_usage_flush_interval_secs() -> u64 {
    60
}

pub fn default_batch_size() -> usize {
    10
}

pub fn default_batch_delay_ms() -> u64 {
    1_000
}

pub fn default_batch_max_messages() -> usize {
    1_000
}
