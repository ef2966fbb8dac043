//! Adapter factory
//!
//! Constructors are registered once at startup, keyed by category and
//! provider name. The registry builds adapters only through this table.

use std::collections::HashMap;
use std::sync::Arc;

use super::Adapter;
use super::unified_provider::ProviderError;
use super::{avalara, sendgrid, stripe, taxjar, twilio};
use crate::core::types::{ProviderCategory, ProviderConfig};

/// Builds an adapter from its stored configuration
pub type AdapterConstructor =
    Arc<dyn Fn(&ProviderConfig) -> Result<Adapter, ProviderError> + Send + Sync>;

/// Interface table of adapter constructors
#[derive(Clone, Default)]
pub struct AdapterFactory {
    constructors: HashMap<(ProviderCategory, String), AdapterConstructor>,
}

impl AdapterFactory {
    /// Empty factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with every bundled vendor adapter registered
    pub fn with_builtin() -> Self {
        let mut factory = Self::new();
        factory.register(ProviderCategory::Tax, avalara::PROVIDER_NAME, |config| {
            Ok(Adapter::Tax(Arc::new(avalara::AvalaraProvider::new(config)?)))
        });
        factory.register(ProviderCategory::Tax, taxjar::PROVIDER_NAME, |config| {
            Ok(Adapter::Tax(Arc::new(taxjar::TaxJarProvider::new(config)?)))
        });
        factory.register(ProviderCategory::Email, sendgrid::PROVIDER_NAME, |config| {
            Ok(Adapter::Messaging(Arc::new(
                sendgrid::SendGridProvider::new(config)?,
            )))
        });
        factory.register(ProviderCategory::Sms, twilio::PROVIDER_NAME, |config| {
            Ok(Adapter::Messaging(Arc::new(twilio::TwilioProvider::new(
                config,
            )?)))
        });
        factory.register(ProviderCategory::Payment, stripe::PROVIDER_NAME, |config| {
            Ok(Adapter::Payment(Arc::new(stripe::StripeProvider::new(
                config,
            )?)))
        });
        factory
    }

    /// Register (or replace) the constructor for a provider name
    pub fn register<F>(&mut self, category: ProviderCategory, provider_name: &str, constructor: F)
    where
        F: Fn(&ProviderConfig) -> Result<Adapter, ProviderError> + Send + Sync + 'static,
    {
        self.constructors.insert(
            (category, provider_name.to_ascii_lowercase()),
            Arc::new(constructor),
        );
    }

    pub fn is_registered(&self, category: ProviderCategory, provider_name: &str) -> bool {
        self.constructors
            .contains_key(&(category, provider_name.to_ascii_lowercase()))
    }

    /// Registered `(category, provider_name)` keys, sorted
    pub fn registered(&self) -> Vec<(ProviderCategory, String)> {
        let mut keys: Vec<_> = self.constructors.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Construct the adapter a config names
    pub fn build(&self, config: &ProviderConfig) -> Result<Adapter, ProviderError> {
        let key = (config.category, config.provider_name.to_ascii_lowercase());
        let constructor = self.constructors.get(&key).ok_or_else(|| {
            ProviderError::invalid_configuration(
                &config.provider_name,
                format!(
                    "no {} adapter registered under this name",
                    config.category
                ),
            )
        })?;

        let adapter = constructor(config)?;
        if !adapter.serves(config.category) {
            return Err(ProviderError::invalid_configuration(
                &config.provider_name,
                format!("adapter does not serve category {}", config.category),
            ));
        }
        Ok(adapter)
    }
}

impl std::fmt::Debug for AdapterFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterFactory")
            .field("registered", &self.registered())
            .finish()
    }
}
