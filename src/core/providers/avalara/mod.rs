//! Avalara AvaTax adapter (TAX)

mod config;
mod provider;

pub use config::AvalaraConfig;
pub use provider::AvalaraProvider;

/// Provider name the factory registers this adapter under
pub const PROVIDER_NAME: &str = "avalara";

/// AvaTax REST v2 production endpoint
pub const DEFAULT_API_BASE: &str = "https://rest.avatax.com/api/v2";
