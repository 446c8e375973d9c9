//! Cache gateway: the single entry point between callers and the fetcher.

use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, instrument, warn};

use kick_core::error::{KickError, Result};
use kick_core::traits::Fetcher;

use crate::config::{CacheConfig, CachePolicy};
use crate::inflight::{InFlightRegistry, SharedFetch};
use crate::store::{CacheStats, CacheStore, Lookup};

/// Everything the state mutex guards.
///
/// The store and the in-flight registry live under one lock so that a fetch
/// can publish its result and clear its slot in a single step.
struct State<V> {
    policy: CachePolicy,
    /// `None` while caching is disabled.
    store: Option<CacheStore<V>>,
    in_flight: InFlightRegistry<V>,
}

struct Inner<V> {
    fetcher: Arc<dyn Fetcher<V>>,
    state: Mutex<State<V>>,
}

/// TTL cache in front of a [`Fetcher`], with per-key request coalescing.
///
/// # Lookup flow
///
/// 1. Fresh entry for the key: returned without touching the fetcher
/// 2. Stale entry: removed, then treated as a miss
/// 3. Miss with a fetch already running for the key: joins that fetch
/// 4. Otherwise: spawns one fetch, caches `Some` results, returns the outcome
///
/// `None` results and errors are never cached, so the next call retries.
///
/// # Concurrency
///
/// Every fetch runs in its own tokio task. Dropping a `get` future only
/// stops that caller from waiting; the fetch itself completes and populates
/// the cache for everyone else. Fetches for different keys run in parallel.
///
/// `get` must be called from within a tokio runtime.
pub struct Gateway<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for Gateway<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Gateway<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a gateway from a cache config.
    ///
    /// Fails with [`KickError::InvalidConfig`] if caching is enabled without
    /// a finite, positive TTL.
    pub fn new(config: CacheConfig, fetcher: impl Fetcher<V> + 'static) -> Result<Self> {
        Self::with_shared_fetcher(config, Arc::new(fetcher))
    }

    /// Creates a gateway that never caches.
    pub fn uncached(fetcher: impl Fetcher<V> + 'static) -> Self {
        Self::from_policy(CachePolicy::Disabled, Arc::new(fetcher))
    }

    /// Creates a gateway around an already shared fetcher.
    pub fn with_shared_fetcher(config: CacheConfig, fetcher: Arc<dyn Fetcher<V>>) -> Result<Self> {
        let policy = config.validate()?;
        Ok(Self::from_policy(policy, fetcher))
    }

    fn from_policy(policy: CachePolicy, fetcher: Arc<dyn Fetcher<V>>) -> Self {
        let store = policy.is_enabled().then(CacheStore::new);
        debug!(?policy, "Cache gateway created");

        Self {
            inner: Arc::new(Inner {
                fetcher,
                state: Mutex::new(State {
                    policy,
                    store,
                    in_flight: InFlightRegistry::new(),
                }),
            }),
        }
    }

    /// Returns the value for `key`, from memory if fresh, otherwise from the
    /// fetcher.
    ///
    /// Concurrent calls for the same key while no fresh entry exists share
    /// one fetch and receive the same outcome, errors included.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Option<V>> {
        let fetch = {
            let mut state = self.inner.state.lock();

            if let Some(store) = state.store.as_mut() {
                match store.lookup(key, Instant::now()) {
                    Lookup::Fresh(value) => {
                        debug!(key, "Cache hit");
                        return Ok(Some(value));
                    }
                    Lookup::Expired => debug!(key, "Cache entry expired"),
                    Lookup::Miss => debug!(key, "Cache miss"),
                }
            }

            let running = state.in_flight.get(key);
            match running {
                Some(running) => {
                    debug!(key, "Joining in-flight fetch");
                    running
                }
                None => self.spawn_fetch(&mut state, key),
            }
        };

        fetch.await
    }

    /// Starts a fetch for `key` and registers it. Caller holds the state lock.
    fn spawn_fetch(&self, state: &mut State<V>, key: &str) -> SharedFetch<V> {
        let id = state.in_flight.next_id();
        let inner = Arc::clone(&self.inner);
        let task_key = key.to_string();

        let handle = tokio::spawn(async move { inner.fetch_and_store(task_key, id).await });

        let url = key.to_string();
        let fetch: SharedFetch<V> = async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(key = %url, error = %e, "Fetch task terminated abnormally");
                    Err(KickError::CacheCorruption(format!(
                        "fetch task for '{}' terminated abnormally: {}",
                        url, e
                    )))
                }
            }
        }
        .boxed()
        .shared();

        state.in_flight.insert(key.to_string(), id, fetch.clone());
        debug!(key, flight = id, "Fetch started");
        fetch
    }

    /// Replaces the cache policy at runtime.
    ///
    /// Disabling drops every cached entry. Enabling starts from an empty
    /// store if none existed; entries already stored keep their original
    /// expiry. Fetches already running are unaffected and publish their
    /// result under whatever policy is current when they finish.
    pub fn reconfigure(&self, config: CacheConfig) -> Result<()> {
        let policy = config.validate()?;
        let mut state = self.inner.state.lock();

        state.policy = policy;
        match policy {
            CachePolicy::Disabled => state.store = None,
            CachePolicy::Ttl(_) => {
                if state.store.is_none() {
                    state.store = Some(CacheStore::new());
                }
            }
        }

        debug!(?policy, "Cache reconfigured");
        Ok(())
    }

    /// Removes the cached entry for `key`, if any.
    ///
    /// A fetch already running for the key is not cancelled and will
    /// repopulate the entry when it succeeds.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut state = self.inner.state.lock();
        state.store.as_mut().is_some_and(|store| store.remove(key))
    }

    /// Returns the current cache policy.
    pub fn policy(&self) -> CachePolicy {
        self.inner.state.lock().policy
    }

    /// Returns true if responses are currently cached.
    pub fn is_enabled(&self) -> bool {
        self.policy().is_enabled()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.inner.state.lock();
        let mut stats = state
            .store
            .as_ref()
            .map(|store| store.stats(Instant::now()))
            .unwrap_or_default();
        stats.in_flight = state.in_flight.len();
        stats
    }
}

impl<V> Inner<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Body of a spawned fetch task.
    async fn fetch_and_store(self: Arc<Self>, key: String, id: u64) -> Result<Option<V>> {
        let mut guard = FlightGuard {
            inner: Arc::clone(&self),
            key: key.as_str(),
            id,
            armed: true,
        };

        let outcome = self.fetcher.fetch(&key).await;

        let mut state = self.state.lock();
        match &outcome {
            Ok(Some(value)) => {
                if let CachePolicy::Ttl(ttl) = state.policy {
                    if let Some(store) = state.store.as_mut() {
                        store.insert(key.clone(), value.clone(), Instant::now(), ttl);
                        debug!(key = %key, ?ttl, "Cached fetch result");
                    }
                }
            }
            Ok(None) => debug!(key = %key, "Fetcher returned no data, not caching"),
            Err(e) => warn!(key = %key, error = %e, "Fetch failed"),
        }
        guard.complete(&mut state);

        outcome
    }
}

/// Clears a fetch's in-flight slot, even if the fetcher panics.
struct FlightGuard<'a, V> {
    inner: Arc<Inner<V>>,
    key: &'a str,
    id: u64,
    armed: bool,
}

impl<V> FlightGuard<'_, V> {
    /// Normal completion, with the state lock already held.
    fn complete(&mut self, state: &mut State<V>) {
        self.armed = false;
        if !state.in_flight.complete(self.key, self.id) {
            error!(key = self.key, flight = self.id, "In-flight slot missing on completion");
        }
    }
}

impl<V> Drop for FlightGuard<'_, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(key = self.key, flight = self.id, "Fetch aborted, clearing in-flight slot");
        self.inner.state.lock().in_flight.complete(self.key, self.id);
    }
}
