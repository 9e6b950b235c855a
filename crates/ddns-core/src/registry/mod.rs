//! Plugin-based provider registry
//!
//! The host looks providers up by name instead of hardcoding them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddns_core::registry::ProviderRegistry;
//!
//! let registry = ProviderRegistry::new();
//!
//! // In ddns-provider-route53
//! ddns_provider_route53::register(&registry, provider);
//!
//! let route53 = registry.provider("route53")?;
//! route53.update(&record, &ip).await?;
//! ```

use crate::error::{Error, Result};
use crate::plugin::PluginDefinition;
use crate::traits::DnsProvider;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of DNS provider plugins keyed by provider name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<BTreeMap<String, Arc<dyn DnsProvider>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own [`DnsProvider::provider_name`]
    ///
    /// A provider registered under the same name is replaced.
    pub fn register_provider(&self, provider: Arc<dyn DnsProvider>) {
        let name = provider.provider_name().to_string();
        tracing::debug!("Registering DNS provider: {}", name);
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        providers.insert(name, provider);
    }

    /// Look up a provider by name
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn DnsProvider>)`: The registered provider
    /// - `Err(Error)`: If no provider is registered under `name`
    pub fn provider(&self, name: &str) -> Result<Arc<dyn DnsProvider>> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        providers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", name)))
    }

    /// Check if a provider is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }

    /// List all registered provider names
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        providers.keys().cloned().collect()
    }

    /// Definitions of every registered provider, keyed by provider name
    pub fn definitions(&self) -> BTreeMap<String, &'static PluginDefinition> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        providers
            .iter()
            .map(|(name, p)| (name.clone(), p.definition()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DnsRecordSpec, IpAddressSet};
    use async_trait::async_trait;

    static DEFINITION: PluginDefinition = PluginDefinition {
        name: "Mock",
        version: "1.0.0",
        description: "mock provider",
        configurator: &[],
        record: &[],
    };

    struct MockProvider;

    #[async_trait]
    impl DnsProvider for MockProvider {
        async fn update(&self, _record: &DnsRecordSpec, _ip: &IpAddressSet) -> Result<()> {
            Ok(())
        }

        fn program_name(&self) -> &str {
            "mock"
        }

        fn definition(&self) -> &'static PluginDefinition {
            &DEFINITION
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        // Initially empty
        assert!(!registry.has_provider("mock"));
        assert!(registry.provider("mock").is_err());

        registry.register_provider(Arc::new(MockProvider));

        assert!(registry.has_provider("mock"));
        assert_eq!(registry.list_providers(), vec!["mock".to_string()]);
        assert_eq!(registry.definitions()["mock"].name, "Mock");
        assert_eq!(registry.provider("mock").unwrap().program_name(), "mock");
    }
}
