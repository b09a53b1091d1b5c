use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use darchiva_application::{QueryCache, QueryKey};
use darchiva_core::AppResult;

#[derive(Debug, Clone)]
struct QueryCacheEntry {
    value: Value,
    expires_at: Option<Instant>,
}

impl QueryCacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Process-local query cache.
#[derive(Default)]
pub struct InMemoryQueryCache {
    entries: RwLock<HashMap<QueryKey, QueryCacheEntry>>,
}

impl InMemoryQueryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueryCache for InMemoryQueryCache {
    async fn get(&self, key: &QueryKey) -> AppResult<Option<Value>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(Instant::now()) => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| !entry.is_live(Instant::now()))
        {
            entries.remove(key);
            debug!(key = %key, "evicted expired query cache entry");
        }

        Ok(None)
    }

    async fn set(&self, key: &QueryKey, value: Value, ttl: Option<Duration>) -> AppResult<()> {
        if ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = ttl.map(|ttl| now.checked_add(ttl).unwrap_or(now));

        self.entries
            .write()
            .await
            .insert(key.clone(), QueryCacheEntry { value, expires_at });

        Ok(())
    }

    async fn invalidate_prefix(&self, prefix: &QueryKey) -> AppResult<usize> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }
}
