//! TaxJar adapter (TAX)

mod config;
mod provider;

pub use config::TaxJarConfig;
pub use provider::TaxJarProvider;

/// Provider name the factory registers this adapter under
pub const PROVIDER_NAME: &str = "taxjar";

pub const DEFAULT_API_BASE: &str = "https://api.taxjar.com/v2";
