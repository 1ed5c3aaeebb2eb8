//! Request Coordinator Module
//!
//! `RequestCache` is the read-through front of the cache: it answers from the
//! store when it can, and otherwise makes sure at most one fetch per key is
//! outstanding, sharing its outcome with every concurrent caller.
//!
//! All bookkeeping (store, in-flight registrations, counters) sits behind one
//! mutex. Critical sections never await, so the check / register / store
//! sequence of a fetch cannot interleave with another caller's.

mod inflight;

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::cache::{CacheCounters, CacheStats, EntryStore, ErasedValue};
use crate::config::{validate_ttl, CacheConfig};
use crate::error::{CacheError, Result};

pub use inflight::SharedFetch;
use inflight::InFlight;

// == Shared State ==
/// Everything guarded by the cache mutex.
struct CacheState {
    store: EntryStore,
    in_flight: HashMap<String, InFlight>,
    counters: CacheCounters,
    next_flight_id: u64,
}

/// Outcome of looking a key up under the lock.
enum Lookup<V> {
    Hit(Arc<V>),
    Pending(SharedFetch<V>),
    Miss,
}

impl CacheState {
    fn lookup<V: Send + Sync + 'static>(&mut self, key: &str) -> Result<Lookup<V>> {
        if let Some(entry) = self.store.get(key) {
            return entry
                .downcast::<V>()
                .map(Lookup::Hit)
                .ok_or_else(|| CacheError::TypeMismatch {
                    key: key.to_string(),
                });
        }

        if let Some(flight) = self.in_flight.get(key) {
            return flight
                .join::<V>()
                .map(Lookup::Pending)
                .ok_or_else(|| CacheError::TypeMismatch {
                    key: key.to_string(),
                });
        }

        Ok(Lookup::Miss)
    }

    /// Detaches the in-flight fetch for `key`, if any. Its result will be
    /// handed to its waiters but not stored.
    fn detach(&mut self, key: &str) -> bool {
        self.in_flight.remove(key).is_some()
    }
}

struct Inner {
    state: Mutex<CacheState>,
    config: CacheConfig,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Critical sections never panic midway through a mutation, so the
        // state behind a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Finishes the fetch registered as `id` under `key`.
    ///
    /// Removes the in-flight marker and stores a successful value in the same
    /// critical section, before any waiter resumes. A fetch that was detached
    /// in the meantime neither removes the current marker nor stores.
    fn complete<V: Send + Sync + 'static>(
        &self,
        key: &str,
        id: u64,
        ttl: Duration,
        outcome: Result<V>,
    ) -> Result<Arc<V>> {
        let mut state = self.lock();
        let registered = state.in_flight.get(key).is_some_and(|flight| flight.id == id);
        if registered {
            state.in_flight.remove(key);
        }

        match outcome {
            Ok(value) => {
                let value = Arc::new(value);
                if registered {
                    let erased: ErasedValue = value.clone();
                    if state.store.set(key.to_string(), erased, ttl).is_some() {
                        state.counters.evictions += 1;
                    }
                    debug!(key, ttl_ms = ttl.as_millis() as u64, "Fetch completed, entry stored");
                } else {
                    debug!(key, "Fetch completed after being detached, result not stored");
                }
                Ok(value)
            }
            Err(err) => {
                warn!(key, error = %err, "Fetch failed, nothing cached");
                Err(err)
            }
        }
    }
}

// == Request Cache ==
/// Read-through request cache with in-flight deduplication.
///
/// Cloning is cheap and every clone shares the same cache.
#[derive(Clone)]
pub struct RequestCache {
    inner: Arc<Inner>,
}

impl RequestCache {
    // == Constructor ==
    /// Creates an empty cache. Fails on an invalid configuration.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        info!(
            max_entries = config.max_entries,
            default_ttl_ms = config.default_ttl.as_millis() as u64,
            "Request cache created"
        );

        let state = CacheState {
            store: EntryStore::new(config.max_entries),
            in_flight: HashMap::new(),
            counters: CacheCounters::default(),
            next_flight_id: 0,
        };

        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                config,
            }),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    // == Get Or Fetch ==
    /// Returns the cached value for `key`, fetching it on a miss.
    ///
    /// * A live entry is returned without suspending.
    /// * If a fetch for `key` is already in flight, this call waits for it and
    ///   receives the same value, or the same error.
    /// * Otherwise `fetcher` is invoked and its future runs on a spawned task.
    ///   On success the value is stored for `ttl` (the configured default when
    ///   None); on failure nothing is stored.
    ///
    /// The fetch runs to completion and populates the cache even if every
    /// caller stops waiting for it.
    ///
    /// # Errors
    /// * `CacheError::Fetch` when the fetcher fails
    /// * `CacheError::TypeMismatch` when `key` holds a value of another type
    /// * `CacheError::InvalidConfig` when `ttl` is zero
    pub async fn get_or_fetch<V, F, Fut>(
        &self,
        key: impl Into<String>,
        fetcher: F,
        ttl: Option<Duration>,
    ) -> Result<Arc<V>>
    where
        V: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let key = key.into();
        let ttl = self.resolve_ttl(ttl)?;

        let lookup = {
            let mut state = self.inner.lock();
            let lookup = state.lookup::<V>(&key)?;
            record_lookup(&mut state.counters, &key, &lookup);
            lookup
        };
        match lookup {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Pending(fetch) => return fetch.await,
            Lookup::Miss => {}
        }

        // The fetcher is user code, so it is called without holding the lock.
        // If another caller registered a fetch meanwhile, this future is
        // dropped without ever being polled.
        let pending = fetcher();

        let fetch = {
            let mut state = self.inner.lock();
            let lookup = state.lookup::<V>(&key)?;
            record_lookup(&mut state.counters, &key, &lookup);
            match lookup {
                Lookup::Hit(value) => return Ok(value),
                Lookup::Pending(fetch) => fetch,
                Lookup::Miss => {
                    state.counters.misses += 1;
                    self.register(&mut state, key, pending, ttl)
                }
            }
        };
        fetch.await
    }

    /// Registers `pending` as the in-flight fetch for `key`.
    fn register<V, Fut>(
        &self,
        state: &mut CacheState,
        key: String,
        pending: Fut,
        ttl: Duration,
    ) -> SharedFetch<V>
    where
        V: Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let id = state.next_flight_id;
        state.next_flight_id += 1;
        debug!(key = %key, id, "Cache miss, starting fetch");

        let inner = Arc::clone(&self.inner);
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(pending).catch_unwind().await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => Err(CacheError::fetch(&task_key, err)),
                Err(_) => Err(CacheError::Internal(format!(
                    "fetcher for key {task_key} panicked"
                ))),
            };
            inner.complete(&task_key, id, ttl, outcome)
        });

        let join_key = key.clone();
        let fetch: SharedFetch<V> = async move {
            match task.await {
                Ok(result) => result,
                Err(err) => Err(CacheError::Internal(format!(
                    "fetch task for key {join_key} did not complete: {err}"
                ))),
            }
        }
        .boxed()
        .shared();

        state.in_flight.insert(key, InFlight::new(id, fetch.clone()));
        fetch
    }

    fn resolve_ttl(&self, ttl: Option<Duration>) -> Result<Duration> {
        let ttl = ttl.unwrap_or(self.inner.config.default_ttl);
        validate_ttl(ttl)?;
        Ok(ttl)
    }

    // == Direct Access ==
    /// Returns the live cached value for `key` without fetching.
    ///
    /// A hit refreshes the entry's recency; an expired entry is removed.
    pub fn get<V: Send + Sync + 'static>(&self, key: &str) -> Result<Option<Arc<V>>> {
        let mut state = self.inner.lock();
        match state.store.get(key) {
            Some(entry) => entry
                .downcast::<V>()
                .map(Some)
                .ok_or_else(|| CacheError::TypeMismatch {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Stores `value` under `key` directly, e.g. a record a write just returned.
    ///
    /// Any fetch in flight for `key` is detached so its older result cannot
    /// overwrite this one.
    pub fn set<V: Send + Sync + 'static>(
        &self,
        key: impl Into<String>,
        value: V,
        ttl: Option<Duration>,
    ) -> Result<Arc<V>> {
        let key = key.into();
        let ttl = self.resolve_ttl(ttl)?;
        let value = Arc::new(value);
        let erased: ErasedValue = value.clone();

        let mut state = self.inner.lock();
        state.detach(&key);
        if state.store.set(key, erased, ttl).is_some() {
            state.counters.evictions += 1;
        }
        Ok(value)
    }

    /// Whether a live entry exists for `key`. Does not refresh recency.
    pub fn contains(&self, key: &str) -> bool {
        let state = self.inner.lock();
        state
            .store
            .peek(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Whether a fetch is currently registered for `key`.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.inner.lock().in_flight.contains_key(key)
    }

    // == Invalidation ==
    /// Removes the entry for `key`. Returns whether one was present.
    ///
    /// A fetch in flight for `key` is detached: its waiters still get its
    /// result, but it is not stored and the next caller fetches afresh.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut state = self.inner.lock();
        let detached = state.detach(key);
        let removed = state.store.delete(key);
        if removed {
            state.counters.invalidations += 1;
        }
        debug!(key, removed, detached, "Invalidated key");
        removed
    }

    /// Removes every entry whose key satisfies `pred`. Returns how many.
    ///
    /// Matching in-flight fetches are detached as in [`RequestCache::invalidate`].
    pub fn invalidate_pattern<P>(&self, pred: P) -> usize
    where
        P: Fn(&str) -> bool,
    {
        let mut state = self.inner.lock();
        state.in_flight.retain(|key, _| !pred(key));
        let removed = state.store.remove_matching(&pred).len();
        state.counters.invalidations += removed as u64;
        debug!(removed, "Invalidated keys by pattern");
        removed
    }

    // == Introspection ==
    /// Returns a read-only snapshot of the cache. Nothing is purged or refreshed.
    pub fn get_stats(&self) -> CacheStats {
        let state = self.inner.lock();
        let mut in_flight: Vec<String> = state.in_flight.keys().cloned().collect();
        in_flight.sort();
        CacheStats::new(
            state.store.keys(),
            state.store.max_entries(),
            in_flight,
            state.counters,
        )
    }

    /// Empties the store and detaches every in-flight fetch.
    ///
    /// In-flight fetches are not cancelled; their waiters still receive the
    /// outcome, but a successful value is discarded instead of stored.
    ///
    /// Returns the number of entries removed.
    pub fn clear_all(&self) -> usize {
        let mut state = self.inner.lock();
        let cleared = state.store.len();
        let detached = state.in_flight.len();
        state.store.clear();
        state.in_flight.clear();
        info!(cleared, detached, "Cache cleared");
        cleared
    }

    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        self.inner.lock().store.purge_expired()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }
}

fn record_lookup<V>(counters: &mut CacheCounters, key: &str, lookup: &Lookup<V>) {
    match lookup {
        Lookup::Hit(_) => {
            counters.hits += 1;
            debug!(key, "Cache hit");
        }
        Lookup::Pending(_) => {
            counters.coalesced += 1;
            debug!(key, "Joined in-flight fetch");
        }
        Lookup::Miss => {}
    }
}
