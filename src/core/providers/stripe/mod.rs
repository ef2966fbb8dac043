//! Stripe adapter (PAYMENT)

mod config;
mod provider;

pub use config::StripeConfig;
pub use provider::StripeProvider;

/// Provider name the factory registers this adapter under
pub const PROVIDER_NAME: &str = "stripe";

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";
