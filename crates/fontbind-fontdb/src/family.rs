// this_file: crates/fontbind-fontdb/src/family.rs

//! Font families as the UI framework hands them over.

use fontbind_core::{FontDescriptor, GenericFontFamily};

use crate::typeface::Typeface;

/// A typeface the framework already loaded, offered as a whole family
#[derive(Debug, Clone)]
pub struct LoadedTypefaceFamily {
    typeface: Typeface,
    alias: Option<String>,
}

impl LoadedTypefaceFamily {
    pub fn new(typeface: Typeface) -> Self {
        Self {
            typeface,
            alias: None,
        }
    }

    /// Registers the typeface under `alias` instead of its native family name
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }

    /// The declared alias, falling back to the typeface's own family name
    pub fn alias(&self) -> &str {
        self.alias
            .as_deref()
            .unwrap_or_else(|| self.typeface.family_name())
    }
}

/// The family shapes the registry can resolve
#[derive(Debug, Clone)]
pub enum FontFamily {
    /// Concrete fonts tried in order
    FontList(Vec<FontDescriptor>),
    /// One typeface loaded ahead of time
    Loaded(LoadedTypefaceFamily),
    /// sans-serif, serif, monospace, or cursive
    Generic(GenericFontFamily),
    /// No family given; resolves like sans-serif
    Default,
}

impl FontFamily {
    pub fn sans_serif() -> Self {
        FontFamily::Generic(GenericFontFamily::sans_serif())
    }

    pub fn serif() -> Self {
        FontFamily::Generic(GenericFontFamily::serif())
    }

    pub fn monospace() -> Self {
        FontFamily::Generic(GenericFontFamily::monospace())
    }

    pub fn cursive() -> Self {
        FontFamily::Generic(GenericFontFamily::cursive())
    }
}

impl From<Vec<FontDescriptor>> for FontFamily {
    fn from(fonts: Vec<FontDescriptor>) -> Self {
        FontFamily::FontList(fonts)
    }
}

impl From<GenericFontFamily> for FontFamily {
    fn from(family: GenericFontFamily) -> Self {
        FontFamily::Generic(family)
    }
}

impl From<LoadedTypefaceFamily> for FontFamily {
    fn from(family: LoadedTypefaceFamily) -> Self {
        FontFamily::Loaded(family)
    }
}
