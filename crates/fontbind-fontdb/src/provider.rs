// this_file: crates/fontbind-fontdb/src/provider.rs

//! Fallback-capable typeface lookup.
//!
//! A [`FontCollection`] asks its providers, in order, for the best face of
//! each alias. The registered provider comes first so fonts the application
//! brought along win over installed ones with the same name.

use std::sync::Arc;

use dashmap::DashMap;

use crate::backend::FontBackend;
use crate::typeface::{Typeface, TypefaceStyle};

/// Anything that can pick a typeface for a family name and style
pub trait FontProvider: Send + Sync {
    /// Closest face of `family` to `style`, or `None` if the family is unknown
    fn match_family_style(&self, family: &str, style: TypefaceStyle) -> Option<Typeface>;
}

/// Typefaces registered by the application under aliases
///
/// Aliases compare case-insensitively. Several faces can share an alias; a
/// lookup picks the one whose style is closest to the request.
#[derive(Default)]
pub struct TypefaceFontProvider {
    families: DashMap<String, Vec<Typeface>>,
}

impl TypefaceFontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_typeface(&self, typeface: Typeface, alias: &str) {
        log::debug!("Registering {:?} as '{}'", typeface, alias);
        self.families
            .entry(normalize_alias(alias))
            .or_default()
            .push(typeface);
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn contains_family(&self, alias: &str) -> bool {
        self.families.contains_key(&normalize_alias(alias))
    }
}

impl FontProvider for TypefaceFontProvider {
    fn match_family_style(&self, family: &str, style: TypefaceStyle) -> Option<Typeface> {
        let faces = self.families.get(&normalize_alias(family))?;
        let best = faces
            .iter()
            .min_by_key(|face| style.match_score(&face.style()))
            .cloned();
        best
    }
}

pub(crate) fn normalize_alias(alias: &str) -> String {
    alias.to_lowercase()
}

/// Exposes a native backend's installed fonts as a provider
struct BackendProvider(Arc<dyn FontBackend>);

impl FontProvider for BackendProvider {
    fn match_family_style(&self, family: &str, style: TypefaceStyle) -> Option<Typeface> {
        self.0.match_family_style(family, style)
    }
}

/// Ordered providers searched alias by alias
#[derive(Clone, Default)]
pub struct FontCollection {
    providers: Vec<Arc<dyn FontProvider>>,
}

impl FontCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider; earlier providers win
    pub fn with_provider(mut self, provider: Arc<dyn FontProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Appends the backend's installed fonts as the last resort
    pub fn with_default_backend(self, backend: Arc<dyn FontBackend>) -> Self {
        self.with_provider(Arc::new(BackendProvider(backend)))
    }

    /// One typeface per alias that any provider knows, in alias order
    ///
    /// For each alias the first provider with a match wins; the match is the
    /// provider's closest face to `style`, not necessarily an exact one.
    pub fn find_typefaces<S: AsRef<str>>(&self, aliases: &[S], style: TypefaceStyle) -> Vec<Typeface> {
        aliases
            .iter()
            .filter_map(|alias| {
                let alias = alias.as_ref();
                let found = self
                    .providers
                    .iter()
                    .find_map(|provider| provider.match_family_style(alias, style));
                if found.is_none() {
                    log::trace!("No provider knows '{}'", alias);
                }
                found
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeface::{FontWidth, Slant};

    fn style(weight: u16, slant: Slant) -> TypefaceStyle {
        TypefaceStyle::new(weight, FontWidth::NORMAL, slant)
    }

    #[test]
    fn test_closest_style_wins() {
        let provider = TypefaceFontProvider::new();
        provider.register_typeface(Typeface::builder("Inter").weight(400).build(), "Inter");
        provider.register_typeface(Typeface::builder("Inter").weight(700).build(), "Inter");
        provider.register_typeface(
            Typeface::builder("Inter").weight(400).slant(Slant::Italic).build(),
            "Inter",
        );

        let bold = provider.match_family_style("inter", style(650, Slant::Upright)).unwrap();
        assert_eq!(bold.style().weight, 700);

        let italic = provider.match_family_style("INTER", style(700, Slant::Italic)).unwrap();
        assert_eq!(italic.style().slant, Slant::Italic);

        assert!(provider.match_family_style("Roboto", style(400, Slant::Upright)).is_none());
        assert_eq!(provider.family_count(), 1);
        assert!(provider.contains_family("iNTER"));
        assert!(!provider.contains_family("Roboto"));
    }

    #[test]
    fn test_collection_tries_aliases_in_order() {
        let first = Arc::new(TypefaceFontProvider::new());
        let second = Arc::new(TypefaceFontProvider::new());
        first.register_typeface(Typeface::builder("B-first").build(), "B");
        second.register_typeface(Typeface::builder("B-second").build(), "B");
        second.register_typeface(Typeface::builder("C").build(), "C");

        let collection = FontCollection::new()
            .with_provider(first)
            .with_provider(second);

        let found = collection.find_typefaces(&["A", "B", "C"], TypefaceStyle::default());
        let names: Vec<&str> = found.iter().map(|t| t.family_name()).collect();
        assert_eq!(names, ["B-first", "C"]);
    }
}
