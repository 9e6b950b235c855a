// # Memory Config Store
//
// In-memory implementation of ConfigStore.
//
// Nothing survives a restart; `save` is a no-op. Useful for tests and for
// hosts that keep their configuration elsewhere.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::ConfigStore;

/// In-memory config store
///
/// Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    inner: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl MemoryConfigStore {
    /// Create a new empty memory config store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of namespaces holding data
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn plugin(&self, namespace: &str) -> Result<Option<serde_json::Value>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(namespace).cloned())
    }

    async fn set_plugin(&self, namespace: &str, data: serde_json::Value) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(namespace.to_string(), data);
        Ok(())
    }

    async fn save(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryConfigStore::new();
        assert!(store.is_empty().await);

        store
            .set_plugin("route53", serde_json::json!({ "default": {} }))
            .await
            .unwrap();
        assert_eq!(store.len().await, 1);

        let data = store.plugin("route53").await.unwrap();
        assert_eq!(data, Some(serde_json::json!({ "default": {} })));
        assert_eq!(store.plugin("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_data() {
        let store = MemoryConfigStore::new();
        let view = store.clone();

        store.set_plugin("route53", serde_json::json!({})).await.unwrap();
        store.save().await.unwrap();

        assert!(view.plugin("route53").await.unwrap().is_some());
    }
}
