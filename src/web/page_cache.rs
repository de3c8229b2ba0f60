//! Revalidation cache for generated page data.
//!
//! An entry is served as-is until it is older than the TTL. The next request
//! after that regenerates it while concurrent requests keep getting the stale
//! entry. If regeneration fails, the stale entry is served instead and kept,
//! so an upstream outage does not take down pages that were already
//! generated.
//!
//! Only one generation runs per key at a time. Callers with nothing cached
//! wait for it rather than starting their own.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::constants::MAX_CACHED_PAGES;
use crate::content::PostPage;
use crate::generate::DetailState;

#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    generated_at: Instant,
}

impl<V> CachedEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            generated_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.generated_at.elapsed() < ttl
    }
}

#[derive(Debug)]
struct Slot<V> {
    entry: RwLock<Option<CachedEntry<V>>>,
    /// Held for the duration of a generation.
    generating: Mutex<()>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            entry: RwLock::new(None),
            generating: Mutex::new(()),
        }
    }
}

/// Keyed cache with time-based revalidation.
#[derive(Debug)]
pub struct RevalidationCache<V> {
    slots: RwLock<HashMap<String, Arc<Slot<V>>>>,
    ttl: Duration,
    capacity: usize,
    /// Whether a value generated for a key with nothing cached is stored.
    /// Keys that already hold a value always take the new one.
    admit: fn(&V) -> bool,
}

impl<V: Clone> RevalidationCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            ttl,
            capacity: MAX_CACHED_PAGES,
            admit: |_| true,
        }
    }

    /// Sweep expired entries once this many keys are held.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub const fn with_admission(mut self, admit: fn(&V) -> bool) -> Self {
        self.admit = admit;
        self
    }

    /// Return the cached value for `key`, or run `generate` if it is missing
    /// or stale.
    ///
    /// # Errors
    ///
    /// Returns the generator's error when there is no previous value to fall
    /// back on.
    pub async fn get_or_generate<F, Fut, E>(&self, key: &str, generate: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        let slot = self.slot(key).await;
        let result = self.generate_into(&slot, key, generate).await;
        if slot.entry.read().await.is_none() {
            self.release(key, &slot).await;
        }
        result
    }

    async fn generate_into<F, Fut, E>(&self, slot: &Slot<V>, key: &str, generate: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        let stale = match slot.entry.read().await.as_ref() {
            Some(entry) if entry.is_fresh(self.ttl) => return Ok(entry.value.clone()),
            Some(entry) => Some(entry.value.clone()),
            None => None,
        };

        let _generating = match (slot.generating.try_lock(), &stale) {
            (Ok(guard), _) => guard,
            (Err(_), Some(value)) => {
                debug!(key, "Regeneration in progress, serving stale page");
                return Ok(value.clone());
            }
            (Err(_), None) => slot.generating.lock().await,
        };

        // Another caller may have finished generating while this one waited.
        if let Some(entry) = slot.entry.read().await.as_ref() {
            if entry.is_fresh(self.ttl) {
                return Ok(entry.value.clone());
            }
        }

        debug!(key, stale = stale.is_some(), "Generating page data");

        match generate().await {
            Ok(value) => {
                if stale.is_some() || (self.admit)(&value) {
                    *slot.entry.write().await = Some(CachedEntry::new(value.clone()));
                }
                Ok(value)
            }
            Err(e) => match stale {
                Some(value) => {
                    warn!(key, "Regeneration failed, serving stale page: {e}");
                    Ok(value)
                }
                None => Err(e),
            },
        }
    }

    async fn slot(&self, key: &str) -> Arc<Slot<V>> {
        if let Some(slot) = self.slots.read().await.get(key) {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().await;
        if !slots.contains_key(key) && slots.len() >= self.capacity {
            let before = slots.len();
            let ttl = self.ttl;
            slots.retain(|_, slot| {
                Arc::strong_count(slot) > 1
                    || match slot.entry.try_read() {
                        Ok(entry) => entry.as_ref().is_some_and(|e| e.is_fresh(ttl)),
                        Err(_) => true,
                    }
            });
            debug!(before, after = slots.len(), "Swept expired pages");
        }
        Arc::clone(slots.entry(key.to_string()).or_default())
    }

    /// Drop an empty slot nobody else is using.
    async fn release(&self, key: &str, slot: &Arc<Slot<V>>) {
        let mut slots = self.slots.write().await;
        // One reference is the map's, the other is the caller's.
        if Arc::strong_count(slot) == 2
            && slots.get(key).is_some_and(|held| Arc::ptr_eq(held, slot))
            && slot.entry.read().await.is_none()
        {
            slots.remove(key);
        }
    }
}

/// Caches for every generated page kind.
#[derive(Debug)]
pub struct PageCache {
    pub listing: RevalidationCache<PostPage>,
    /// Slugs that were never found are not kept; a post that disappears
    /// replaces its cached page with the not-found state.
    pub posts: RevalidationCache<DetailState>,
}

impl PageCache {
    pub const LISTING_KEY: &'static str = "index";

    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            listing: RevalidationCache::new(ttl),
            posts: RevalidationCache::new(ttl)
                .with_admission(|state| matches!(state, DetailState::Found(_))),
        }
    }
}
