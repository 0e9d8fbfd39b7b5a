// this_file: crates/fontbind-fontdb/src/legacy.rs

//! Single-font synchronous loading for clients that predate font families.

use std::sync::Arc;

use fontbind_core::{FontDescriptor, FontError, Result};

use crate::registry::FontRegistry;
use crate::typeface::Typeface;

/// Loads one descriptor straight to a typeface
///
/// A thin view over the context's registry; it adds no state of its own.
#[derive(Clone)]
pub struct LegacyFontLoader {
    registry: Arc<FontRegistry>,
}

impl LegacyFontLoader {
    pub(crate) fn new(registry: Arc<FontRegistry>) -> Self {
        Self { registry }
    }

    /// Loads, caches, and registers `descriptor`, returning just the typeface
    #[deprecated(note = "resolve fonts through FontContext::load or FontContext::load_family")]
    pub fn load(&self, descriptor: &FontDescriptor) -> Result<Typeface> {
        let result = self.registry.load(descriptor)?;
        // A single-font load either fails or yields a typeface
        result
            .typeface
            .ok_or_else(|| FontError::MissingTypeface(descriptor.cache_key()))
    }
}
