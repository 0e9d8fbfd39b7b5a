// this_file: crates/fontbind-fontdb/src/context.rs

//! The one object a host builds to resolve fonts.
//!
//! Build a [`FontContext`] once at the top of the host's font handling and
//! pass clones around; clones share the same registry and cache.

use std::sync::Arc;

use fontbind_core::{
    current_platform, Clock, FontDescriptor, FontStyle, FontWeight, Platform, Result,
    SystemClock, TypefaceCacheConfig,
};

use crate::backend::{FontBackend, SystemFontBackend};
use crate::family::FontFamily;
use crate::legacy::LegacyFontLoader;
use crate::loader::TypefaceLoader;
use crate::registry::{FontLoadResult, FontRegistry};
use crate::typeface_cache::TypefaceCache;

/// Shared font resolution state: backend, cache, and registry
#[derive(Clone)]
pub struct FontContext {
    registry: Arc<FontRegistry>,
}

impl FontContext {
    /// System fonts via fontdb, current platform, cache settings from the environment
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> FontContextBuilder {
        FontContextBuilder::default()
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    /// See [`FontRegistry::load`]
    pub fn load(&self, descriptor: &FontDescriptor) -> Result<FontLoadResult> {
        self.registry.load(descriptor)
    }

    /// See [`FontRegistry::load_family`]
    pub fn load_family(
        &self,
        family: &FontFamily,
        weight: FontWeight,
        style: FontStyle,
    ) -> Result<FontLoadResult> {
        self.registry.load_family(family, weight, style)
    }

    /// The synchronous single-font entry point older clients use
    pub fn legacy_loader(&self) -> LegacyFontLoader {
        LegacyFontLoader::new(Arc::clone(&self.registry))
    }
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Configures a [`FontContext`]
#[derive(Default)]
pub struct FontContextBuilder {
    backend: Option<Arc<dyn FontBackend>>,
    platform: Option<Platform>,
    config: Option<TypefaceCacheConfig>,
    clock: Option<Arc<dyn Clock>>,
}

impl FontContextBuilder {
    /// Native font manager; defaults to [`SystemFontBackend`]
    pub fn backend(mut self, backend: Arc<dyn FontBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Platform whose generic family table applies; defaults to the current one
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Cache settings; defaults to [`TypefaceCacheConfig::from_env`]
    pub fn cache_config(mut self, config: TypefaceCacheConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Time source for cache expiry
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> FontContext {
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(SystemFontBackend::new()));
        let platform = self.platform.unwrap_or_else(current_platform);
        let config = self.config.unwrap_or_else(TypefaceCacheConfig::from_env);
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        log::debug!(
            "Building font context: backend={}, platform={:?}, idle={:?}",
            backend.name(),
            platform,
            config.idle_timeout
        );

        let registry = FontRegistry::new(
            TypefaceLoader::new(backend),
            TypefaceCache::with_clock(config, clock),
            platform,
        );
        FontContext {
            registry: Arc::new(registry),
        }
    }
}
