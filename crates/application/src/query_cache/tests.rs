use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use darchiva_core::{AppError, AppResult};

use super::{InvalidationGraph, QueryCache, QueryClient, QueryKey};

/// Map-backed cache shared by service tests; ignores expiry.
#[derive(Default)]
pub(crate) struct MemoryQueryCache {
    pub(crate) entries: Mutex<BTreeMap<QueryKey, Value>>,
    pub(crate) invalidations: Mutex<Vec<QueryKey>>,
}

#[async_trait]
impl QueryCache for MemoryQueryCache {
    async fn get(&self, key: &QueryKey) -> AppResult<Option<Value>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &QueryKey, value: Value, _ttl: Option<Duration>) -> AppResult<()> {
        self.entries.lock().await.insert(key.clone(), value);
        Ok(())
    }

    async fn invalidate_prefix(&self, prefix: &QueryKey) -> AppResult<usize> {
        self.invalidations.lock().await.push(prefix.clone());
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }
}

pub(crate) fn client_with_cache() -> (QueryClient, Arc<MemoryQueryCache>) {
    let cache = Arc::new(MemoryQueryCache::default());
    let client = QueryClient::new(cache.clone(), InvalidationGraph::admin_defaults());
    (client, cache)
}

#[test]
fn prefix_matching_uses_whole_segments() {
    let key = QueryKey::roles().child("page=1");
    assert!(key.starts_with(&QueryKey::roles()));
    assert!(key.starts_with(&QueryKey::iam()));
    assert!(!QueryKey::role("r1").starts_with(&QueryKey::roles()));
    assert_eq!(key.to_string(), "iam/roles/page=1");
}

#[test]
fn role_invalidation_reaches_matrix_and_stats() {
    let closure = InvalidationGraph::admin_defaults().closure(&QueryKey::roles());
    assert_eq!(
        closure,
        vec![
            QueryKey::roles(),
            QueryKey::permission_matrix(),
            QueryKey::iam_stats(),
        ]
    );
}

#[test]
fn matrix_invalidation_has_no_dependents() {
    let closure = InvalidationGraph::admin_defaults().closure(&QueryKey::permission_matrix());
    assert_eq!(closure, vec![QueryKey::permission_matrix()]);
}

#[test]
fn closure_visits_each_prefix_once_even_with_cycles() {
    let a = QueryKey::new(["a"]);
    let b = QueryKey::new(["b"]);
    let c = QueryKey::new(["c"]);
    let graph = InvalidationGraph::new()
        .with_edge(a.clone(), b.clone())
        .with_edge(b.clone(), c.clone())
        .with_edge(c.clone(), a.clone())
        .with_edge(a.clone(), c.clone());

    assert_eq!(graph.closure(&a), vec![a, b, c]);
}

#[tokio::test]
async fn fetch_cached_fetches_once() {
    let (client, _) = client_with_cache();
    let key = QueryKey::permissions();
    let calls = Mutex::new(0_u32);

    for _ in 0..2 {
        let value: AppResult<Vec<String>> = client
            .fetch_cached(&key, None, || async {
                *calls.lock().await += 1;
                Ok(vec!["document.view".to_owned()])
            })
            .await;
        assert!(matches!(value, Ok(values) if values.len() == 1));
    }

    assert_eq!(*calls.lock().await, 1);
}

#[tokio::test]
async fn undecodable_entry_is_refetched() {
    let (client, cache) = client_with_cache();
    let key = QueryKey::permissions();
    cache
        .entries
        .lock()
        .await
        .insert(key.clone(), json!({"unexpected": true}));

    let value: AppResult<Vec<String>> = client
        .fetch_cached(&key, None, || async { Ok(vec!["tag.view".to_owned()]) })
        .await;

    assert!(matches!(value, Ok(values) if values == vec!["tag.view".to_owned()]));
}

#[tokio::test]
async fn invalidate_removes_dependent_entries() {
    let (client, cache) = client_with_cache();
    for key in [
        QueryKey::roles().child("page=1"),
        QueryKey::permission_matrix().child("entity_type=user"),
        QueryKey::iam_stats(),
        QueryKey::permissions(),
    ] {
        assert!(client.set(&key, &json!([])).await.is_ok());
    }

    assert!(client.invalidate(&QueryKey::roles()).await.is_ok());

    let remaining: Vec<QueryKey> = cache.entries.lock().await.keys().cloned().collect();
    assert_eq!(remaining, vec![QueryKey::permissions()]);
}

#[tokio::test]
async fn failed_mutation_restores_snapshot() {
    let (client, cache) = client_with_cache();
    let key = QueryKey::preferences();
    assert!(client.set(&key, &json!({"theme": "light"})).await.is_ok());

    let result: AppResult<()> = client
        .optimistic_update(
            &key,
            |_: Option<Value>| Some(json!({"theme": "dark"})),
            async { Err(AppError::Internal("API error: 500".to_owned())) },
        )
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert_eq!(
        cache.entries.lock().await.get(&key),
        Some(&json!({"theme": "light"}))
    );
    assert!(cache.invalidations.lock().await.is_empty());
}

#[tokio::test]
async fn failed_mutation_without_snapshot_removes_optimistic_entry() {
    let (client, cache) = client_with_cache();
    let key = QueryKey::preferences();

    let result: AppResult<()> = client
        .optimistic_update(
            &key,
            |_: Option<Value>| Some(json!({"theme": "dark"})),
            async { Err(AppError::Conflict("stale".to_owned())) },
        )
        .await;

    assert!(result.is_err());
    assert!(cache.entries.lock().await.is_empty());
}

#[tokio::test]
async fn successful_mutation_invalidates_key() {
    let (client, cache) = client_with_cache();
    let key = QueryKey::preferences();
    assert!(client.set(&key, &json!({"theme": "light"})).await.is_ok());

    let result = client
        .optimistic_update(
            &key,
            |_: Option<Value>| Some(json!({"theme": "dark"})),
            async { Ok(7_u8) },
        )
        .await;

    assert!(matches!(result, Ok(7)));
    assert!(cache.entries.lock().await.is_empty());
    assert_eq!(
        cache.invalidations.lock().await.as_slice(),
        &[QueryKey::preferences()]
    );
}
