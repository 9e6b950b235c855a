// # Config Store Trait
//
// The slice of the host's configuration store a plugin may touch: one JSON
// value per plugin namespace.
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::ConfigStore;
//
// store.set_plugin("route53", serde_json::to_value(&data)?).await?;
// store.save().await?;
// ```

use async_trait::async_trait;

/// Trait for host configuration store implementations
///
/// `set_plugin` only changes the in-memory view; `save` persists it.
/// Implementations must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Get the data stored under a plugin namespace
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Value))`: Data previously stored
    /// - `Ok(None)`: Nothing stored for this namespace
    /// - `Err(Error)`: Storage error
    async fn plugin(&self, namespace: &str) -> Result<Option<serde_json::Value>, crate::Error>;

    /// Replace the data stored under a plugin namespace
    async fn set_plugin(
        &self,
        namespace: &str,
        data: serde_json::Value,
    ) -> Result<(), crate::Error>;

    /// Persist pending changes
    async fn save(&self) -> Result<(), crate::Error>;
}
