//! SendGrid adapter (EMAIL)

mod config;
mod provider;

pub use config::SendGridConfig;
pub use provider::SendGridProvider;

/// Provider name the factory registers this adapter under
pub const PROVIDER_NAME: &str = "sendgrid";

pub const DEFAULT_API_BASE: &str = "https://api.sendgrid.com/v3";
