// this_file: crates/fontbind-fontdb/src/registry.rs

//! Resolves descriptors and families to registered, cached typefaces.
//!
//! Every typeface the registry loads is registered once under its cache key
//! in a [`TypefaceFontProvider`], which sits first in the [`FontCollection`].
//! Family lookups then go through the collection, so registered fonts and
//! installed fonts share one fallback path.
//!
//! Registrations are never removed. The provider holds its own handle to each
//! registered typeface, so a cache entry expiring does not invalidate what the
//! collection can find. Reloading an expired key hands back the registered
//! handle instead of parsing the font again, so one cache key never maps to
//! two live typefaces.
//!
//! Cache keys are registered exactly as built. Aliases of loaded typeface
//! families are lowercased first, matching how the provider looks them up.

use std::collections::HashMap;
use std::sync::Arc;

use fontbind_core::{
    generic_family_aliases_for, CacheStats, FontDescriptor, FontError, FontStyle, FontWeight,
    GenericFontFamily, Platform, Result,
};
use parking_lot::Mutex;

use crate::family::FontFamily;
use crate::loader::TypefaceLoader;
use crate::provider::{normalize_alias, FontCollection, TypefaceFontProvider};
use crate::typeface::{Typeface, TypefaceStyle};
use crate::typeface_cache::TypefaceCache;

/// A resolved typeface and the aliases tried to find it
#[derive(Debug, Clone)]
pub struct FontLoadResult {
    /// `None` when no alias matched anything
    pub typeface: Option<Typeface>,
    /// Aliases in the order they were tried
    pub aliases: Vec<String>,
}

/// Fallback-aware typeface registry
pub struct FontRegistry {
    loader: TypefaceLoader,
    cache: TypefaceCache,
    provider: Arc<TypefaceFontProvider>,
    collection: FontCollection,
    // Registration key to the handle the provider was given
    registered: Mutex<HashMap<String, Typeface>>,
    platform: Platform,
}

impl FontRegistry {
    /// Builds a registry whose collection searches registered fonts first,
    /// then the loader's backend
    pub fn new(loader: TypefaceLoader, cache: TypefaceCache, platform: Platform) -> Self {
        let provider = Arc::new(TypefaceFontProvider::new());
        let collection = FontCollection::new()
            .with_provider(provider.clone())
            .with_default_backend(Arc::clone(loader.backend()));

        Self {
            loader,
            cache,
            provider,
            collection,
            registered: Mutex::new(HashMap::new()),
            platform,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Loads one descriptor's typeface and registers it under its cache key
    pub fn load(&self, descriptor: &FontDescriptor) -> Result<FontLoadResult> {
        let key = descriptor.cache_key();
        let typeface = self
            .cache
            .get(&key, || self.reload_or_load(descriptor, &key))?;
        self.ensure_registered(&typeface, &key);

        Ok(FontLoadResult {
            typeface: Some(typeface),
            aliases: vec![key],
        })
    }

    /// Resolves a family to aliases and asks the collection for the best match
    ///
    /// # Errors
    /// - [`FontError::UnsupportedMixedFamily`] for a font list that is not all
    ///   system fonts
    /// - [`FontError::UnknownGenericFamily`] for a generic name with no table
    pub fn load_family(
        &self,
        family: &FontFamily,
        weight: FontWeight,
        style: FontStyle,
    ) -> Result<FontLoadResult> {
        let aliases = self.family_aliases(family)?;
        let style = TypefaceStyle::from_request(weight, style);
        let typeface = self
            .collection
            .find_typefaces(aliases.as_slice(), style)
            .into_iter()
            .next();

        if typeface.is_none() {
            log::debug!("No typeface for aliases {:?} at {:?}", aliases, style);
        }
        Ok(FontLoadResult { typeface, aliases })
    }

    /// Whether `alias` has been registered with the fallback provider
    pub fn is_registered(&self, alias: &str) -> bool {
        let registered = self.registered.lock();
        registered.contains_key(alias) || registered.contains_key(&normalize_alias(alias))
    }

    pub fn registered_count(&self) -> usize {
        self.registered.lock().len()
    }

    pub fn collection(&self) -> &FontCollection {
        &self.collection
    }

    pub fn cache(&self) -> &TypefaceCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn family_aliases(&self, family: &FontFamily) -> Result<Vec<String>> {
        match family {
            FontFamily::FontList(fonts) => {
                if let Some(loaded) = fonts.iter().find(|font| !font.is_system()) {
                    return Err(FontError::UnsupportedMixedFamily(format!(
                        "font list with in-memory font '{}' must be loaded per font",
                        loaded.identity()
                    )));
                }
                Ok(fonts.iter().map(|font| font.identity().to_string()).collect())
            }
            FontFamily::Loaded(loaded) => {
                let alias = loaded.alias().to_string();
                self.ensure_registered(loaded.typeface(), &normalize_alias(&alias));
                Ok(vec![alias])
            }
            FontFamily::Generic(generic) => self.generic_aliases(generic),
            FontFamily::Default => self.generic_aliases(&GenericFontFamily::sans_serif()),
        }
    }

    fn generic_aliases(&self, family: &GenericFontFamily) -> Result<Vec<String>> {
        let aliases = generic_family_aliases_for(self.platform, family.name())?;
        Ok(aliases.iter().map(|alias| alias.to_string()).collect())
    }

    // A key registered earlier and since evicted from the cache is still
    // pinned by the provider; reuse that handle
    fn reload_or_load(&self, descriptor: &FontDescriptor, key: &str) -> Result<Typeface> {
        let registered = self.registered.lock().get(key).cloned();
        if let Some(typeface) = registered {
            log::debug!("Reusing registered typeface for '{}'", key);
            return Ok(typeface);
        }
        self.loader.load_typeface(descriptor)
    }

    // The set lock is held across registration so no caller sees the alias
    // marked before the provider can serve it
    fn ensure_registered(&self, typeface: &Typeface, alias: &str) {
        let mut registered = self.registered.lock();
        if registered.contains_key(alias) {
            return;
        }
        self.provider.register_typeface(typeface.clone(), alias);
        registered.insert(alias.to_string(), typeface.clone());
    }
}
