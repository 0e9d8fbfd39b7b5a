//! Keep loaded fonts around while they are in use
//!
//! An expire-after-access cache: every hit pushes the entry's deadline back,
//! and entries nobody touched for the idle window get dropped. There is no
//! count bound; memory is bounded by time.
//!
//! Each key owns a once-cell slot. The map lock is only held to find or
//! create the slot, so loads for different keys run in parallel while
//! concurrent loads for the same key coalesce into one loader call.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

/// One cached value plus when it was last asked for
struct Slot<V> {
    value: Arc<OnceCell<V>>,
    last_access: Instant,
}

impl<V> Slot<V> {
    fn new(now: Instant) -> Self {
        Self {
            value: Arc::new(OnceCell::new()),
            last_access: now,
        }
    }

    fn is_expired(&self, now: Instant, idle: Duration) -> bool {
        now.saturating_duration_since(self.last_access) >= idle
    }
}

struct Entries<K, V> {
    slots: HashMap<K, Slot<V>>,
    last_sweep: Instant,
}

/// Cache statistics for observability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently held (including ones still loading)
    pub entries: usize,
    /// Lookups answered without calling the loader
    pub hits: u64,
    /// Lookups that ran the loader
    pub misses: u64,
    /// Entries dropped after sitting idle
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Cache whose entries expire after a period without access
pub struct ExpireAfterAccessCache<K, V> {
    entries: Mutex<Entries<K, V>>,
    idle: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K: Hash + Eq + Clone, V: Clone> ExpireAfterAccessCache<K, V> {
    /// Cache on the wall clock
    pub fn new(idle: Duration) -> Self {
        Self::with_clock(idle, Arc::new(SystemClock))
    }

    /// Cache reading time from `clock`
    pub fn with_clock(idle: Duration, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            entries: Mutex::new(Entries {
                slots: HashMap::new(),
                last_sweep: now,
            }),
            idle,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle
    }

    /// Returns the cached value for `key`, running `init` on a miss
    ///
    /// `init` runs at most once per miss, even when several threads miss on
    /// the same key together; the others wait and share its result. A failed
    /// load leaves nothing behind, so the next call tries again.
    pub fn get_or_try_insert_with<E, F>(&self, key: &K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let cell = self.slot_for(key);

        if let Some(value) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value.clone());
        }

        let mut loaded = false;
        let result = cell.get_or_try_init(|| {
            loaded = true;
            init()
        });

        match result {
            Ok(value) => {
                if loaded {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    self.restore_if_discarded(key, &cell);
                } else {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                }
                Ok(value.clone())
            }
            Err(err) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.discard_empty(key, &cell);
                Err(err)
            }
        }
    }

    /// Peeks at a loaded value, refreshing its access time
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        self.sweep_if_due(&mut entries, now);

        let slot = entries.slots.get_mut(key)?;
        if slot.is_expired(now, self.idle) {
            entries.slots.remove(key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        slot.last_access = now;
        slot.value.get().cloned()
    }

    /// Drops every entry idle for longer than the window
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        self.sweep(&mut entries, now)
    }

    pub fn invalidate_all(&self) {
        self.entries.lock().slots.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let now = self.clock.now();
        self.entries
            .lock()
            .slots
            .get(key)
            .is_some_and(|slot| !slot.is_expired(now, self.idle) && slot.value.get().is_some())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Finds or creates the slot for `key` and stamps the access
    fn slot_for(&self, key: &K) -> Arc<OnceCell<V>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        self.sweep_if_due(&mut entries, now);

        if let Some(slot) = entries.slots.get_mut(key) {
            if !slot.is_expired(now, self.idle) {
                slot.last_access = now;
                return Arc::clone(&slot.value);
            }
            log::trace!("Cache entry expired after {:?} idle", self.idle);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        let slot = Slot::new(now);
        let cell = Arc::clone(&slot.value);
        entries.slots.insert(key.clone(), slot);
        cell
    }

    /// Removes the slot after a failed load, unless someone replaced it
    fn discard_empty(&self, key: &K, cell: &Arc<OnceCell<V>>) {
        let mut entries = self.entries.lock();
        let stale = entries
            .slots
            .get(key)
            .is_some_and(|slot| Arc::ptr_eq(&slot.value, cell) && slot.value.get().is_none());
        if stale {
            entries.slots.remove(key);
        }
    }

    /// Puts a freshly loaded slot back if a failed load discarded it while
    /// this caller was retrying on the same cell
    fn restore_if_discarded(&self, key: &K, cell: &Arc<OnceCell<V>>) {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        if !entries.slots.contains_key(key) {
            log::trace!("Restoring cache slot filled by a retried load");
            entries.slots.insert(
                key.clone(),
                Slot {
                    value: Arc::clone(cell),
                    last_access: now,
                },
            );
        }
    }

    // Full sweeps are O(n); run them at most a few times per idle window
    fn sweep_if_due(&self, entries: &mut Entries<K, V>, now: Instant) {
        if now.saturating_duration_since(entries.last_sweep) >= self.idle / 4 {
            self.sweep(entries, now);
        }
    }

    fn sweep(&self, entries: &mut Entries<K, V>, now: Instant) -> usize {
        let idle = self.idle;
        let before = entries.slots.len();
        // Slots still loading have no value yet and are never swept
        entries
            .slots
            .retain(|_, slot| slot.value.get().is_none() || !slot.is_expired(now, idle));
        entries.last_sweep = now;

        let evicted = before - entries.slots.len();
        if evicted > 0 {
            self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
            log::debug!("Evicted {} idle cache entries", evicted);
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::convert::Infallible;

    fn cache_with_clock(idle_secs: u64) -> (ExpireAfterAccessCache<String, u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ExpireAfterAccessCache::with_clock(Duration::from_secs(idle_secs), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_hit_does_not_reload() {
        let (cache, _) = cache_with_clock(60);
        let key = "a".to_string();
        let mut calls = 0;

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with(&key, || {
                    calls += 1;
                    Ok::<_, Infallible>(7)
                })
                .unwrap();
            assert_eq!(value, 7);
        }

        assert_eq!(calls, 1);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_failed_load_leaves_no_entry() {
        let (cache, _) = cache_with_clock(60);
        let key = "broken".to_string();

        let err = cache.get_or_try_insert_with(&key, || Err::<u32, _>("nope"));
        assert_eq!(err, Err("nope"));
        assert!(cache.is_empty());

        let value = cache.get_or_try_insert_with(&key, || Ok::<_, &str>(1));
        assert_eq!(value, Ok(1));
    }

    #[test]
    fn test_access_refreshes_deadline() {
        let (cache, clock) = cache_with_clock(60);
        let key = "a".to_string();
        cache.get_or_try_insert_with(&key, || Ok::<_, Infallible>(1)).unwrap();

        clock.advance(Duration::from_secs(45));
        assert_eq!(cache.get(&key), Some(1));

        clock.advance(Duration::from_secs(45));
        assert_eq!(cache.get(&key), Some(1));
    }

    #[test]
    fn test_sweep_drops_only_idle_entries() {
        let (cache, clock) = cache_with_clock(60);
        let old = "old".to_string();
        let fresh = "fresh".to_string();
        cache.get_or_try_insert_with(&old, || Ok::<_, Infallible>(1)).unwrap();

        clock.advance(Duration::from_secs(50));
        cache.get_or_try_insert_with(&fresh, || Ok::<_, Infallible>(2)).unwrap();

        clock.advance(Duration::from_secs(20));
        assert_eq!(cache.purge_expired(), 1);
        assert!(!cache.contains_key(&old));
        assert!(cache.contains_key(&fresh));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_invalidate_all() {
        let (cache, _) = cache_with_clock(60);
        cache
            .get_or_try_insert_with(&"a".to_string(), || Ok::<_, Infallible>(1))
            .unwrap();
        cache.invalidate_all();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a".to_string()), None);
    }
}
