//! End-to-end behaviour of `CartStore` over real and instrumented byte stores.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use market_cache::{CacheError, FileStore, KvStore, MemoryStore};
use market_cart::prelude::*;
use tokio::sync::Notify;

const KEY: &str = "@GoMarketplace:products";

fn candidate(id: &str) -> NewLineItem {
    NewLineItem::new(id, "T", "u", 10.0)
}

fn quantities(items: &[LineItem]) -> Vec<(String, u32)> {
    items
        .iter()
        .map(|i| (i.id.to_string(), i.quantity))
        .collect()
}

fn expected(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
    pairs.iter().map(|(id, q)| (id.to_string(), *q)).collect()
}

async fn stored(store: &dyn KvStore) -> Vec<LineItem> {
    match store.get(KEY).await.unwrap() {
        Some(bytes) => serde_json::from_slice(&bytes).unwrap(),
        None => Vec::new(),
    }
}

/// Holds every `get` until released.
struct GatedStore {
    inner: MemoryStore,
    gate: Notify,
}

impl GatedStore {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            gate: Notify::new(),
        }
    }

    fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl KvStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.gate.notified().await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key).await
    }
}

/// Fails writes while `failing` is set and records every successful write.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
    writes: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Store("disk full".to_string()));
        }
        // Give later jobs a chance to overtake if ordering were broken.
        tokio::task::yield_now().await;
        self.writes.lock().unwrap().push(value.clone());
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key).await
    }
}

#[tokio::test]
async fn add_twice_then_decrement_to_empty() {
    let backing = Arc::new(MemoryStore::new());
    let cart = CartStore::open(backing.clone(), CartConfig::default()).await;
    let a = ProductId::new("a");

    cart.add_to_cart(NewLineItem::new("a", "T", "u", 10.0)).await;
    assert_eq!(quantities(&cart.items()), expected(&[("a", 1)]));

    cart.add_to_cart(NewLineItem::new("a", "T", "u", 10.0)).await;
    assert_eq!(quantities(&cart.items()), expected(&[("a", 2)]));

    cart.decrement(&a).await;
    assert_eq!(quantities(&cart.items()), expected(&[("a", 1)]));

    cart.decrement(&a).await;
    assert!(cart.items().is_empty());

    cart.flush().await.unwrap();
    assert!(stored(backing.as_ref()).await.is_empty());
    assert_eq!(backing.get(KEY).await.unwrap(), Some(b"[]".to_vec()));
}

#[tokio::test]
async fn increment_preserves_order() {
    let cart = CartStore::open(Arc::new(MemoryStore::new()), CartConfig::default()).await;

    cart.add_to_cart(candidate("a")).await;
    cart.add_to_cart(candidate("b")).await;
    cart.increment(&ProductId::new("a")).await;

    assert_eq!(quantities(&cart.items()), expected(&[("a", 2), ("b", 1)]));
}

#[tokio::test]
async fn store_matches_memory_after_every_mutation() {
    let backing = Arc::new(MemoryStore::new());
    let cart = CartStore::open(backing.clone(), CartConfig::default()).await;

    for id in ["a", "b", "a", "c"] {
        cart.add_to_cart(candidate(id)).await;
        cart.flush().await.unwrap();
        assert_eq!(stored(backing.as_ref()).await, cart.items());
    }
    for id in ["a", "b", "c", "a"] {
        cart.decrement(&ProductId::new(id)).await;
        cart.flush().await.unwrap();
        assert_eq!(stored(backing.as_ref()).await, cart.items());
    }
    assert!(cart.items().is_empty());
}

#[tokio::test]
async fn mutation_before_load_waits_and_survives_empty_snapshot() {
    let backing = Arc::new(GatedStore::new(MemoryStore::new()));
    let cart = CartStore::spawn(backing.clone(), CartConfig::default());

    let pending = tokio::spawn({
        let cart = cart.clone();
        async move { cart.add_to_cart(candidate("a")).await }
    });
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    assert!(!cart.is_ready());
    assert!(!pending.is_finished());
    assert!(cart.items().is_empty());

    backing.release();
    assert_eq!(pending.await.unwrap(), Adjustment::Added);

    assert!(cart.is_ready());
    assert_eq!(quantities(&cart.items()), expected(&[("a", 1)]));
}

#[tokio::test]
async fn mutation_before_load_applies_on_top_of_snapshot() {
    let saved = r#"[{"id":"b","title":"B","imageUrl":"u","price":3.5,"quantity":2}]"#;
    let backing = Arc::new(GatedStore::new(MemoryStore::with_entry(KEY, saved)));
    let cart = CartStore::spawn(backing.clone(), CartConfig::default());

    let pending = tokio::spawn({
        let cart = cart.clone();
        async move { cart.add_to_cart(candidate("a")).await }
    });
    tokio::task::yield_now().await;

    backing.release();
    pending.await.unwrap();
    cart.flush().await.unwrap();

    assert_eq!(quantities(&cart.items()), expected(&[("b", 2), ("a", 1)]));
    assert_eq!(stored(&backing.inner).await, cart.items());
}

#[tokio::test]
async fn failed_write_keeps_memory_authoritative() {
    let backing = Arc::new(FlakyStore::default());
    let cart = CartStore::open(backing.clone(), CartConfig::default()).await;

    backing.failing.store(true, Ordering::SeqCst);
    cart.add_to_cart(candidate("a")).await;

    let err = cart.flush().await.unwrap_err();
    assert!(matches!(err, CartError::Persist(_)));
    assert_eq!(quantities(&cart.items()), expected(&[("a", 1)]));
    assert_eq!(cart.persist_stats().failures, 1);

    backing.failing.store(false, Ordering::SeqCst);
    cart.increment(&ProductId::new("a")).await;
    cart.flush().await.unwrap();

    assert_eq!(stored(backing.as_ref()).await, cart.items());
    assert_eq!(cart.persist_stats().writes, 1);
}

#[tokio::test]
async fn writes_land_in_call_order() {
    let backing = Arc::new(FlakyStore::default());
    let cart = CartStore::open(backing.clone(), CartConfig::default()).await;

    for n in 0..20 {
        cart.add_to_cart(candidate(&format!("p{n}"))).await;
    }
    cart.flush().await.unwrap();

    let lengths: Vec<usize> = backing
        .writes
        .lock()
        .unwrap()
        .iter()
        .map(|bytes| serde_json::from_slice::<Vec<LineItem>>(bytes).unwrap().len())
        .collect();
    assert_eq!(lengths, (1..=20).collect::<Vec<_>>());
    assert_eq!(stored(backing.as_ref()).await, cart.items());
}

#[tokio::test]
async fn file_store_survives_sessions() {
    let dir = tempfile::tempdir().unwrap();

    {
        let cart = CartStore::open(Arc::new(FileStore::new(dir.path())), CartConfig::default()).await;
        cart.add_to_cart(candidate("a")).await;
        cart.add_to_cart(candidate("b")).await;
        cart.add_to_cart(candidate("a")).await;
        cart.flush().await.unwrap();
    }

    let cart = CartStore::open(Arc::new(FileStore::new(dir.path())), CartConfig::default()).await;
    assert_eq!(quantities(&cart.items()), expected(&[("a", 2), ("b", 1)]));
}

#[tokio::test]
async fn provider_hands_out_installed_store() {
    let mut provider = CartProvider::new();
    assert!(matches!(provider.cart(), Err(CartError::OutsideProvider)));

    let store = CartStore::open(Arc::new(MemoryStore::new()), CartConfig::default()).await;
    provider.install(store);

    let cart = provider.cart().unwrap();
    cart.add_to_cart(candidate("a")).await;
    assert_eq!(cart.items().len(), 1);
}
