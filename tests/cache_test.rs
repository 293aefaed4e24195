//! Tests for the [`MemoryStore`] cache backend and key layout.

use std::sync::Arc;
use std::time::Duration;

use imgcache::cache::{CacheStore, MemoryStore, cache_key};
use imgcache::{ImgcacheError, SearchQuery};

#[tokio::test]
async fn cache_miss_returns_none() {
    let store = MemoryStore::new();
    assert!(store.get("images:nothing-1").await.unwrap().is_none());
}

#[tokio::test]
async fn set_then_get() {
    let store = MemoryStore::new();
    store
        .set("images:cats-1", "[]".to_string(), Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(
        store.get("images:cats-1").await.unwrap().as_deref(),
        Some("[]")
    );
}

#[tokio::test]
async fn entry_expires_after_ttl() {
    let store = MemoryStore::new();
    store
        .set("k", "v".to_string(), Duration::from_millis(50))
        .await
        .unwrap();
    assert!(store.get("k").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(store.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn reads_do_not_extend_ttl() {
    let store = MemoryStore::new();
    store
        .set("k", "v".to_string(), Duration::from_millis(100))
        .await
        .unwrap();

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(30)).await;
        let _ = store.get("k").await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(store.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn overwrite_replaces_value_and_resets_ttl() {
    let store = MemoryStore::new();
    store
        .set("k", "old".to_string(), Duration::from_millis(80))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    store
        .set("k", "new".to_string(), Duration::from_millis(200))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
}

#[tokio::test]
async fn independent_keys() {
    let store = MemoryStore::new();
    let ttl = Duration::from_secs(60);
    store.set("alpha", "1".to_string(), ttl).await.unwrap();
    store.set("beta", "2".to_string(), ttl).await.unwrap();

    assert_eq!(store.get("alpha").await.unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("beta").await.unwrap().as_deref(), Some("2"));
    assert!(store.get("gamma").await.unwrap().is_none());
}

#[tokio::test]
async fn zero_ttl_is_rejected() {
    let store = MemoryStore::new();
    let result = store.set("k", "v".to_string(), Duration::ZERO).await;
    assert!(matches!(result, Err(ImgcacheError::InvalidInput(_))));
}

#[tokio::test]
async fn concurrent_writers() {
    let store = Arc::new(MemoryStore::new());
    let mut handles = Vec::new();

    for i in 0..10 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .set(&format!("key-{i}"), i.to_string(), Duration::from_secs(60))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for i in 0..10 {
        assert_eq!(
            store.get(&format!("key-{i}")).await.unwrap(),
            Some(i.to_string())
        );
    }
}

#[test]
fn key_layout() {
    let query = SearchQuery::new("red cars", 3, 12).unwrap();
    assert_eq!(cache_key(&query), "images:red cars-3");
}

#[test]
fn trait_object_name() {
    let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
    assert_eq!(store.name(), "memory");
}
