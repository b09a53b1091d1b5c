//! Keyed query cache with TTL reads, prefix invalidation and optimistic
//! updates that roll back on failure.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use darchiva_core::{AppError, AppResult};

mod invalidation;

pub use invalidation::InvalidationGraph;

/// Ordered key segments identifying one cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Creates a key from ordered segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns a key extended with one more segment.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Returns the key segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        self.0.as_slice()
    }

    /// Returns whether `prefix` matches the leading segments of this key.
    #[must_use]
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Root of every IAM key.
    #[must_use]
    pub fn iam() -> Self {
        Self::new(["iam"])
    }

    /// Role listings, any parameters.
    #[must_use]
    pub fn roles() -> Self {
        Self::new(["iam", "roles"])
    }

    /// One role.
    #[must_use]
    pub fn role(role_id: &str) -> Self {
        Self::new(["iam", "role", role_id])
    }

    /// Role templates.
    #[must_use]
    pub fn role_templates() -> Self {
        Self::new(["iam", "role-templates"])
    }

    /// Flat permission catalog.
    #[must_use]
    pub fn permissions() -> Self {
        Self::new(["iam", "permissions"])
    }

    /// Grouped permission catalog.
    #[must_use]
    pub fn permission_groups() -> Self {
        Self::new(["iam", "permission-groups"])
    }

    /// Group listings, any parameters.
    #[must_use]
    pub fn groups() -> Self {
        Self::new(["iam", "groups"])
    }

    /// Group hierarchy.
    #[must_use]
    pub fn group_tree() -> Self {
        Self::new(["iam", "group-tree"])
    }

    /// Permission matrix, any parameters.
    #[must_use]
    pub fn permission_matrix() -> Self {
        Self::new(["iam", "permission-matrix"])
    }

    /// Admin dashboard counters.
    #[must_use]
    pub fn iam_stats() -> Self {
        Self::new(["iam", "stats"])
    }

    /// Email imports, any parameters.
    #[must_use]
    pub fn emails() -> Self {
        Self::new(["emails"])
    }

    /// Current user preferences.
    #[must_use]
    pub fn preferences() -> Self {
        Self::new(["preferences"])
    }
}

impl Display for QueryKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0.join("/"))
    }
}

/// Cache port storing JSON query results.
#[async_trait]
pub trait QueryCache: Send + Sync {
    /// Returns the live value for a key.
    async fn get(&self, key: &QueryKey) -> AppResult<Option<Value>>;

    /// Stores a value, optionally expiring after `ttl`.
    async fn set(&self, key: &QueryKey, value: Value, ttl: Option<Duration>) -> AppResult<()>;

    /// Removes every entry whose key starts with `prefix`; returns the count.
    async fn invalidate_prefix(&self, prefix: &QueryKey) -> AppResult<usize>;
}

/// Typed access to a [`QueryCache`] with dependency-aware invalidation.
#[derive(Clone)]
pub struct QueryClient {
    cache: Arc<dyn QueryCache>,
    graph: Arc<InvalidationGraph>,
}

impl QueryClient {
    /// Creates a client over a cache and its invalidation edges.
    #[must_use]
    pub fn new(cache: Arc<dyn QueryCache>, graph: InvalidationGraph) -> Self {
        Self {
            cache,
            graph: Arc::new(graph),
        }
    }

    /// Returns the cached value or fetches and stores it.
    ///
    /// Entries that no longer decode into `T` are treated as misses.
    pub async fn fetch_cached<T, F, Fut>(
        &self,
        key: &QueryKey,
        ttl: Option<Duration>,
        fetch: F,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(cached) = self.cache.get(key).await? {
            match serde_json::from_value(cached) {
                Ok(value) => {
                    debug!(key = %key, "query cache hit");
                    return Ok(value);
                }
                Err(error) => warn!(key = %key, error = %error, "discarding undecodable cache entry"),
            }
        }

        let value = fetch().await?;
        self.cache.set(key, encode(key, &value)?, ttl).await?;
        Ok(value)
    }

    /// Reads and decodes a cached value without fetching.
    pub async fn get<T>(&self, key: &QueryKey) -> AppResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(cached) = self.cache.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_value(cached).map(Some).map_err(|error| {
            AppError::Internal(format!("failed to decode cache entry '{key}': {error}"))
        })
    }

    /// Stores a typed value without expiry.
    pub async fn set<T>(&self, key: &QueryKey, value: &T) -> AppResult<()>
    where
        T: Serialize,
    {
        self.cache.set(key, encode(key, value)?, None).await
    }

    /// Invalidates a key prefix and every prefix depending on it.
    pub async fn invalidate(&self, key: &QueryKey) -> AppResult<()> {
        for prefix in self.graph.closure(key) {
            let removed = self.cache.invalidate_prefix(&prefix).await?;
            debug!(prefix = %prefix, removed, "invalidated query cache prefix");
        }

        Ok(())
    }

    /// Applies `update` to the cached value, runs `mutation`, and settles.
    ///
    /// On failure the snapshot is written back (or the entry removed when
    /// there was none). On success `key` and its dependents are invalidated.
    pub async fn optimistic_update<T, R, U, Fut>(
        &self,
        key: &QueryKey,
        update: U,
        mutation: Fut,
    ) -> AppResult<R>
    where
        T: Serialize + DeserializeOwned,
        U: FnOnce(Option<T>) -> Option<T>,
        Fut: Future<Output = AppResult<R>>,
    {
        let snapshot = self.cache.get(key).await?;
        let previous = snapshot
            .clone()
            .and_then(|value| serde_json::from_value::<T>(value).ok());
        if let Some(next) = update(previous) {
            self.cache.set(key, encode(key, &next)?, None).await?;
        }

        match mutation.await {
            Ok(result) => {
                self.invalidate(key).await?;
                Ok(result)
            }
            Err(error) => {
                warn!(key = %key, error = %error, "rolling back optimistic cache update");
                match snapshot {
                    Some(value) => self.cache.set(key, value, None).await?,
                    None => {
                        self.cache.invalidate_prefix(key).await?;
                    }
                }
                Err(error)
            }
        }
    }
}

fn encode<T: Serialize>(key: &QueryKey, value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|error| {
        AppError::Internal(format!("failed to encode cache entry '{key}': {error}"))
    })
}

#[cfg(test)]
pub(crate) mod tests;
