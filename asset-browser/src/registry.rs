//! # Provider Registry
//!
//! Manages the collection of loaded asset store providers and routes searches
//! to them.
//!
//! Providers are stored as trait objects keyed by their ID. Every search goes
//! through [`search_with_timeout`], so providers never handle timeouts
//! themselves.

use asset_store_core::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Registry for managing loaded providers.
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn AssetStore>>,
    search_timeout: Duration,
}

impl ProviderRegistry {
    /// Create a new empty provider registry.
    pub fn new(search_timeout: Duration) -> Self {
        Self {
            providers: BTreeMap::new(),
            search_timeout,
        }
    }

    /// Register a provider with the registry.
    ///
    /// The provider's ID will be used as the key. If a provider with the same ID
    /// already exists, it will be replaced.
    pub fn register<P>(&mut self, provider: P)
    where
        P: AssetStore + 'static,
    {
        let id = provider.id().to_string();
        debug!("Registering provider {}", id);
        self.providers.insert(id, Arc::new(provider));
    }

    /// Get a provider by its ID.
    pub fn get(&self, id: &str) -> Option<Arc<dyn AssetStore>> {
        self.providers.get(id).cloned()
    }

    /// List all registered provider IDs, sorted.
    pub fn list(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }

    pub fn count(&self) -> usize {
        self.providers.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Arc<dyn AssetStore>> {
        self.providers.remove(id)
    }

    pub fn search_timeout(&self) -> Duration {
        self.search_timeout
    }

    /// Descriptions of every registered provider, for the settings page.
    pub fn describe(&self) -> Vec<(String, ProviderModel)> {
        self.providers
            .iter()
            .map(|(id, provider)| (id.clone(), provider.provider()))
            .collect()
    }

    /// Search one provider by ID.
    pub async fn search(&self, id: &str, criteria: &SearchCriteria) -> Result<Option<SearchPage>> {
        let provider = self
            .get(id)
            .ok_or_else(|| AssetStoreError::ProviderNotFound(id.to_string()))?;

        search_with_timeout(provider.as_ref(), criteria, self.search_timeout).await
    }

    /// Search every enabled provider, one after another.
    ///
    /// Each provider's outcome is reported separately so one failing store does
    /// not hide the others' results.
    pub async fn search_enabled(
        &self,
        criteria: &SearchCriteria,
    ) -> Vec<(String, Result<Option<SearchPage>>)> {
        let mut results = Vec::new();
        for (id, provider) in &self.providers {
            if !provider.provider().enabled {
                debug!("Skipping disabled provider {}", id);
                continue;
            }

            let result = search_with_timeout(provider.as_ref(), criteria, self.search_timeout).await;
            results.push((id.clone(), result));
        }

        info!("Searched {} enabled provider(s)", results.len());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct MockStore {
        id: String,
        enabled: bool,
    }

    impl MockStore {
        fn new(id: &str, enabled: bool) -> Self {
            Self {
                id: id.to_string(),
                enabled,
            }
        }
    }

    #[async_trait]
    impl AssetStore for MockStore {
        fn id(&self) -> &str {
            &self.id
        }

        async fn search(&self, _criteria: &SearchCriteria) -> Result<Option<SearchPage>> {
            Ok(Some(SearchPage {
                assets: vec![],
                more: false,
            }))
        }

        fn provider(&self) -> ProviderModel {
            ProviderModel {
                name: format!("Mock {}", self.id),
                icon: String::new(),
                enable_setting: None,
                enabled: self.enabled,
            }
        }
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new(Duration::from_secs(5))
    }

    #[test]
    fn test_new_registry() {
        let registry = registry();
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.search_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = registry();
        registry.register(MockStore::new("b", true));
        registry.register(MockStore::new("a", true));

        assert_eq!(registry.count(), 2);
        assert!(registry.contains("a"));
        assert_eq!(registry.list(), vec!["a", "b"]);
        assert_eq!(registry.get("b").unwrap().id(), "b");
        assert!(registry.get("c").is_none());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = registry();
        registry.register(MockStore::new("a", true));
        registry.register(MockStore::new("a", false));

        assert_eq!(registry.count(), 1);
        assert!(!registry.get("a").unwrap().provider().enabled);
    }

    #[test]
    fn test_remove() {
        let mut registry = registry();
        registry.register(MockStore::new("a", true));
        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_describe() {
        let mut registry = registry();
        registry.register(MockStore::new("a", true));
        registry.register(MockStore::new("b", false));

        let described = registry.describe();
        assert_eq!(described.len(), 2);
        assert_eq!(described[0].0, "a");
        assert_eq!(described[0].1.name, "Mock a");
        assert!(!described[1].1.enabled);
    }

    #[tokio::test]
    async fn test_search_unknown_provider() {
        let registry = registry();
        let result = registry.search("missing", &SearchCriteria::new()).await;
        assert!(matches!(result, Err(AssetStoreError::ProviderNotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_search_enabled_skips_disabled() {
        let mut registry = registry();
        registry.register(MockStore::new("a", true));
        registry.register(MockStore::new("b", false));
        registry.register(MockStore::new("c", true));

        let results = registry.search_enabled(&SearchCriteria::new()).await;
        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
    }
}
