// this_file: crates/fontbind-fontdb/src/loader.rs

//! Turns one font descriptor into one typeface.
//!
//! No fallback happens here: a system font that is not installed is an error
//! for this request. Falling back across family members is the registry's job.

use std::sync::Arc;

use fontbind_core::{FontDescriptor, FontError, Result, VariationSettings};

use crate::backend::FontBackend;
use crate::typeface::{Typeface, TypefaceStyle};

/// Loads typefaces through a native backend
#[derive(Clone)]
pub struct TypefaceLoader {
    backend: Arc<dyn FontBackend>,
}

impl TypefaceLoader {
    pub fn new(backend: Arc<dyn FontBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn FontBackend> {
        &self.backend
    }

    /// Resolves or parses the descriptor's font, then applies its variations
    ///
    /// # Errors
    /// - [`FontError::TypefaceNotFound`] if no installed font has the name
    /// - [`FontError::DataProvider`] if the byte provider fails
    /// - [`FontError::InvalidFontData`] if the bytes are not a font
    pub fn load_typeface(&self, descriptor: &FontDescriptor) -> Result<Typeface> {
        let base = match descriptor {
            FontDescriptor::System(font) => {
                let style = TypefaceStyle::from_request(font.weight(), font.style());
                self.backend
                    .match_family_style(font.identity(), style)
                    .ok_or_else(|| FontError::TypefaceNotFound(font.identity().to_string()))?
            }
            FontDescriptor::Loaded(font) => {
                let data = font.read_data().map_err(|source| FontError::DataProvider {
                    identity: font.identity().to_string(),
                    source,
                })?;
                self.backend.typeface_from_data(font.identity(), data)?
            }
        };

        log::debug!(
            "Loaded '{}' through {} as {:?}",
            descriptor.identity(),
            self.backend.name(),
            base
        );
        Ok(apply_variations(base, descriptor.variations()))
    }
}

/// Applies variation settings, or hands back the same handle when there are none
pub fn apply_variations(typeface: Typeface, variations: &VariationSettings) -> Typeface {
    if variations.is_empty() {
        typeface
    } else {
        typeface.make_clone(variations)
    }
}
