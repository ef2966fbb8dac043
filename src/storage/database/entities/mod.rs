/// Provider config entity module
pub mod provider_config;

pub use provider_config::Entity as ProviderConfigs;
