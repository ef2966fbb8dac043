//! Twilio adapter (SMS)

mod config;
mod provider;

pub use config::TwilioConfig;
pub use provider::TwilioProvider;

/// Provider name the factory registers this adapter under
pub const PROVIDER_NAME: &str = "twilio";

pub const DEFAULT_API_BASE: &str = "https://api.twilio.com/2010-04-01";
