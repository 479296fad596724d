//! The cart store: authoritative in-memory cart plus ordered persistence.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use market_cache::{Cache, KvStore};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::cart::{Adjustment, Cart};
use crate::config::CartConfig;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::item::{LineItem, NewLineItem};

/// Work queued for the writer task.
enum WriteJob {
    /// Overwrite the stored snapshot.
    Persist(Cart),
    /// Resolve once every earlier job has been handled.
    Flush(oneshot::Sender<()>),
}

/// Counters describing persistence so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    /// Snapshots written successfully.
    pub writes: u64,
    /// Snapshot writes that failed.
    pub failures: u64,
}

#[derive(Debug, Default)]
struct PersistStatus {
    writes: AtomicU64,
    failures: AtomicU64,
    first_error: Mutex<Option<String>>,
}

impl PersistStatus {
    fn record_success(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self, error: String) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        let mut first = self
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        first.get_or_insert(error);
    }

    fn take_error(&self) -> Option<String> {
        self.first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn stats(&self) -> PersistStats {
        PersistStats {
            writes: self.writes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

struct Shared {
    cart: RwLock<Cart>,
    cache: Cache,
    key: String,
    jobs: mpsc::UnboundedSender<WriteJob>,
    ready: watch::Sender<bool>,
    status: Arc<PersistStatus>,
}

/// Owns the cart for a session and keeps its stored snapshot in sync.
///
/// Every mutation updates the in-memory cart first, then queues the new
/// snapshot for a single writer task, so reads always see the latest state
/// and writes reach the store in call order. Mutations wait until the
/// initial [`load`](Self::load) has resolved.
///
/// Cloning is cheap; clones share the same cart.
///
/// # Example
///
/// ```rust,ignore
/// let store = CartStore::open(Arc::new(FileStore::new(".cart")), CartConfig::default()).await;
/// store.add_to_cart(NewLineItem::new("sku-1", "Mug", "https://img/mug.png", 12.0)).await;
/// store.flush().await?;
/// ```
#[derive(Clone)]
pub struct CartStore {
    shared: Arc<Shared>,
}

impl CartStore {
    /// Empty, not-yet-loaded store with its writer task running.
    ///
    /// Private so every store has a load in flight; see [`open`](Self::open)
    /// and [`spawn`](Self::spawn).
    fn new(store: Arc<dyn KvStore>, config: CartConfig) -> Self {
        let cache = Cache::new(store);
        let (jobs, rx) = mpsc::unbounded_channel();
        let (ready, _) = watch::channel(false);
        let status = Arc::new(PersistStatus::default());

        tokio::spawn(run_writer(
            cache.clone(),
            config.storage_key.clone(),
            rx,
            status.clone(),
        ));

        Self {
            shared: Arc::new(Shared {
                cart: RwLock::new(Cart::new()),
                cache,
                key: config.storage_key,
                jobs,
                ready,
                status,
            }),
        }
    }

    /// Create a store and load its snapshot before returning.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn open(store: Arc<dyn KvStore>, config: CartConfig) -> Self {
        let cart = Self::new(store, config);
        cart.load().await;
        cart
    }

    /// Create a store and load its snapshot in the background.
    ///
    /// Mutations issued before the load resolves are held until it does.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(store: Arc<dyn KvStore>, config: CartConfig) -> Self {
        let cart = Self::new(store, config);
        let loader = cart.clone();
        tokio::spawn(async move {
            loader.load().await;
        });
        cart
    }

    /// Read the stored snapshot and take it over if it is non-empty.
    ///
    /// A missing or unreadable snapshot counts as empty. Opens the ready gate.
    /// Returns whether the in-memory cart was replaced.
    pub async fn load(&self) -> bool {
        let key = &self.shared.key;
        let loaded = match self.shared.cache.get::<Vec<LineItem>>(key).await {
            Ok(Some(items)) => Cart::from_snapshot(items),
            Ok(None) => Cart::new(),
            Err(e) if e.is_corrupt() => {
                warn!(key = %key, error = %e, "Discarding corrupt cart snapshot");
                Cart::new()
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read cart snapshot");
                Cart::new()
            }
        };

        let loaded_len = loaded.len();
        let replaced = self.write_cart().absorb_loaded(loaded);
        info!(key = %key, items = loaded_len, replaced, "Cart loaded");

        self.shared.ready.send_replace(true);
        replaced
    }

    /// Wait until the initial load has resolved.
    pub async fn ready(&self) {
        let mut rx = self.shared.ready.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            // The sender lives in `shared`, so this only fails once `self` is gone.
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Whether the initial load has resolved.
    pub fn is_ready(&self) -> bool {
        *self.shared.ready.borrow()
    }

    /// Current line items in cart order.
    pub fn items(&self) -> Vec<LineItem> {
        self.read_cart().items().to_vec()
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.read_cart().clone()
    }

    /// Run `f` against the current cart without copying it.
    pub fn with_cart<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        f(&self.read_cart())
    }

    /// Key the snapshot is stored under.
    pub fn storage_key(&self) -> &str {
        &self.shared.key
    }

    /// Add one unit of `candidate`, appending it if it isn't in the cart yet.
    pub async fn add_to_cart(&self, candidate: NewLineItem) -> Adjustment {
        self.ready().await;
        let id = candidate.id.clone();
        let adjustment = self.apply_always(|cart| cart.add(candidate));
        debug!(id = %id, ?adjustment, "Added to cart");
        adjustment
    }

    /// Add one unit of the product with this ID. A missing ID is a no-op.
    pub async fn increment(&self, id: &ProductId) -> Option<Adjustment> {
        self.ready().await;
        let adjustment = self.apply(|cart| cart.increment(id));
        log_adjustment(id, adjustment, "increment");
        adjustment
    }

    /// Remove one unit of the product with this ID. A missing ID is a no-op.
    pub async fn decrement(&self, id: &ProductId) -> Option<Adjustment> {
        self.ready().await;
        let adjustment = self.apply(|cart| cart.decrement(id));
        log_adjustment(id, adjustment, "decrement");
        adjustment
    }

    /// Shift the quantity of the item at `position` by `delta`.
    ///
    /// An out-of-range position is a no-op.
    pub async fn change_quantity(&self, position: usize, delta: i64) -> Option<Adjustment> {
        self.ready().await;
        let adjustment = self.apply(|cart| cart.change_quantity(position, delta));
        if adjustment.is_none() {
            debug!(position, delta, "Quantity change ignored: position out of range");
        }
        adjustment
    }

    /// Wait until every snapshot queued so far has been written.
    ///
    /// Reports the first write failure since the previous flush.
    pub async fn flush(&self) -> Result<(), CartError> {
        let (done, wait) = oneshot::channel();
        self.shared
            .jobs
            .send(WriteJob::Flush(done))
            .map_err(|_| CartError::WriterClosed)?;
        wait.await.map_err(|_| CartError::WriterClosed)?;

        match self.shared.status.take_error() {
            Some(error) => Err(CartError::Persist(error)),
            None => Ok(()),
        }
    }

    /// Persistence counters.
    pub fn persist_stats(&self) -> PersistStats {
        self.shared.status.stats()
    }

    /// Mutate the cart and queue the resulting snapshot.
    ///
    /// The job is queued while the write lock is held, so queue order always
    /// matches mutation order.
    fn apply<F>(&self, f: F) -> Option<Adjustment>
    where
        F: FnOnce(&mut Cart) -> Option<Adjustment>,
    {
        let mut cart = self.write_cart();
        let adjustment = f(&mut cart)?;
        self.queue_snapshot(&cart);
        Some(adjustment)
    }

    /// [`apply`](Self::apply) for mutations that always change the cart.
    fn apply_always<F>(&self, f: F) -> Adjustment
    where
        F: FnOnce(&mut Cart) -> Adjustment,
    {
        let mut cart = self.write_cart();
        let adjustment = f(&mut cart);
        self.queue_snapshot(&cart);
        adjustment
    }

    /// Must be called with the cart write lock held.
    fn queue_snapshot(&self, cart: &Cart) {
        if self
            .shared
            .jobs
            .send(WriteJob::Persist(cart.clone()))
            .is_err()
        {
            warn!(key = %self.shared.key, "Cart writer has stopped; snapshot not persisted");
        }
    }

    fn read_cart(&self) -> RwLockReadGuard<'_, Cart> {
        self.shared
            .cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cart(&self) -> RwLockWriteGuard<'_, Cart> {
        self.shared
            .cart
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.shared.key)
            .field("ready", &self.is_ready())
            .field("items", &self.read_cart().len())
            .finish()
    }
}

fn log_adjustment(id: &ProductId, adjustment: Option<Adjustment>, op: &str) {
    match adjustment {
        Some(adjustment) => debug!(id = %id, ?adjustment, op, "Quantity changed"),
        None => debug!(id = %id, op, "Product not in cart; ignoring"),
    }
}

/// Apply write jobs one at a time, in the order they were queued.
async fn run_writer(
    cache: Cache,
    key: String,
    mut jobs: mpsc::UnboundedReceiver<WriteJob>,
    status: Arc<PersistStatus>,
) {
    while let Some(job) = jobs.recv().await {
        match job {
            WriteJob::Persist(snapshot) => match cache.set(&key, &snapshot).await {
                Ok(()) => {
                    status.record_success();
                    debug!(key = %key, items = snapshot.len(), "Persisted cart snapshot");
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to persist cart snapshot");
                    status.record_failure(e.to_string());
                }
            },
            WriteJob::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(key = %key, "Cart writer stopped");
}
