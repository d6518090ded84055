//! Tab-scoped product cache.
//!
//! Records live in a key-value [`StorageArea`] under `product_<tabId>`, one
//! per tab, last write wins. Nothing outlives the process.

use crate::error::StoreError;
use crate::extract::ProductRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Browser tab identifier.
pub type TabId = u32;

/// Key prefix shared by every product record.
pub const KEY_PREFIX: &str = "product_";

/// Storage key for a tab's record.
pub fn key_for(tab_id: TabId) -> String {
    format!("{KEY_PREFIX}{tab_id}")
}

/// A flat JSON key-value area.
#[async_trait]
pub trait StorageArea: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    async fn remove(&self, keys: &[String]) -> Result<(), StoreError>;

    /// Snapshot of every stored entry.
    async fn entries(&self) -> Result<Vec<(String, Value)>, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

/// In-process storage area.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageArea for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(String, Value)>, StoreError> {
        Ok(self.entries.read().await.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

/// Typed access to product records keyed by tab.
#[derive(Clone)]
pub struct TabStore {
    area: Arc<dyn StorageArea>,
}

impl TabStore {
    pub fn new(area: Arc<dyn StorageArea>) -> Self {
        Self { area }
    }

    /// Store backed by a fresh [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub async fn set(&self, tab_id: TabId, record: &ProductRecord) -> Result<(), StoreError> {
        let key = key_for(tab_id);
        let value = serde_json::to_value(record)
            .map_err(|source| StoreError::Encode { key: key.clone(), source })?;

        self.area.set(&key, value).await?;
        debug!("Stored product for tab {}", tab_id);
        Ok(())
    }

    pub async fn get(&self, tab_id: TabId) -> Result<Option<ProductRecord>, StoreError> {
        let key = key_for(tab_id);
        match self.area.get(&key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Decode { key, source }),
            None => Ok(None),
        }
    }

    pub async fn remove(&self, tab_id: TabId) -> Result<(), StoreError> {
        self.area.remove(&[key_for(tab_id)]).await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.area.clear().await
    }

    /// Removes records extracted more than `retention` ago.
    pub async fn remove_expired_older_than(
        &self,
        retention: Duration,
    ) -> Result<usize, StoreError> {
        let retention_ms = i64::try_from(retention.as_millis()).unwrap_or(i64::MAX);
        let cutoff = chrono::Utc::now().timestamp_millis().saturating_sub(retention_ms);
        self.remove_extracted_before(cutoff).await
    }

    /// Removes product records whose `extractedAt` predates `cutoff_ms`.
    ///
    /// Keys outside the product prefix and entries without a timestamp are
    /// left alone.
    pub async fn remove_extracted_before(&self, cutoff_ms: i64) -> Result<usize, StoreError> {
        let expired: Vec<String> = self
            .area
            .entries()
            .await?
            .into_iter()
            .filter(|(key, _)| key.starts_with(KEY_PREFIX))
            .filter(|(_, value)| {
                value.get("extractedAt").and_then(Value::as_i64).is_some_and(|at| at < cutoff_ms)
            })
            .map(|(key, _)| key)
            .collect();

        if !expired.is_empty() {
            self.area.remove(&expired).await?;
            info!("Cleaned up {} old storage entries", expired.len());
        }

        Ok(expired.len())
    }
}

/// Runs [`TabStore::remove_expired_older_than`] every `period`.
///
/// The first sweep happens one period after spawning. Failures are logged
/// and the loop keeps going.
pub fn spawn_expiry_sweep(
    store: TabStore,
    period: Duration,
    retention: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut ticker = tokio::time::interval_at(start, period);

        loop {
            ticker.tick().await;
            if let Err(e) = store.remove_expired_older_than(retention).await {
                warn!("Error cleaning up storage: {}", e);
            }
        }
    })
}
