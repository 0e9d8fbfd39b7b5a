// this_file: crates/fontbind-fontdb/src/typeface_cache.rs

//! Typefaces by cache key, dropped after sitting idle.

use std::sync::Arc;

use fontbind_core::{
    CacheStats, Clock, ExpireAfterAccessCache, Result, SystemClock, TypefaceCacheConfig,
};

use crate::typeface::Typeface;

/// At most one loaded typeface per cache key
pub struct TypefaceCache {
    cache: ExpireAfterAccessCache<String, Typeface>,
}

impl TypefaceCache {
    pub fn new(config: TypefaceCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TypefaceCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: ExpireAfterAccessCache::with_clock(config.idle_timeout, clock),
        }
    }

    /// Returns the typeface for `key`, calling `load` only on a miss
    pub fn get<F>(&self, key: &str, load: F) -> Result<Typeface>
    where
        F: FnOnce() -> Result<Typeface>,
    {
        self.cache.get_or_try_insert_with(&key.to_string(), || {
            log::debug!("Typeface cache miss for {}", key);
            load()
        })
    }

    /// Whether `key` currently holds a live typeface
    pub fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(&key.to_string())
    }

    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for TypefaceCache {
    fn default() -> Self {
        Self::new(TypefaceCacheConfig::default())
    }
}
