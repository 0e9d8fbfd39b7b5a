//! Font descriptors: what the UI framework asks for
//!
//! A descriptor names a font (by OS name or by bytes it can hand over on
//! demand) together with the style it wants. It never owns a native resource,
//! so descriptors are cheap to build for every style request.
//!
//! Equality and hashing only look at the requested attributes. Two loaded
//! descriptors with the same identity and style are the same font, even when
//! their byte providers are different closures.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::variation::VariationSettings;

/// Font weight on the usual 1..=1000 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(u16);

impl FontWeight {
    pub const THIN: FontWeight = FontWeight(100);
    pub const EXTRA_LIGHT: FontWeight = FontWeight(200);
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const SEMI_BOLD: FontWeight = FontWeight(600);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const EXTRA_BOLD: FontWeight = FontWeight(800);
    pub const BLACK: FontWeight = FontWeight(900);

    /// Clamps into 1..=1000
    pub fn new(weight: u16) -> Self {
        FontWeight(weight.clamp(1, 1000))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::NORMAL
    }
}

/// Upright or italic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontStyle::Normal => f.write_str("normal"),
            FontStyle::Italic => f.write_str("italic"),
        }
    }
}

/// Hands over font bytes when a cache miss needs them
///
/// Called at most once per cache miss. It does not have to be idempotent,
/// but whatever it returns first stays cached for the cache's idle window.
pub type FontDataProvider = Arc<dyn Fn() -> io::Result<Arc<[u8]>> + Send + Sync>;

/// A font already installed in the OS font store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemFontDescriptor {
    identity: String,
    weight: FontWeight,
    style: FontStyle,
    variations: VariationSettings,
}

impl SystemFontDescriptor {
    /// `identity` is the OS-level font family name
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            weight: FontWeight::NORMAL,
            style: FontStyle::Normal,
            variations: VariationSettings::new(),
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_variations(mut self, variations: VariationSettings) -> Self {
        self.variations = variations;
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn variations(&self) -> &VariationSettings {
        &self.variations
    }
}

/// A font whose bytes live in memory or in a bundled file
#[derive(Clone)]
pub struct LoadedFontDescriptor {
    identity: String,
    weight: FontWeight,
    style: FontStyle,
    variations: VariationSettings,
    data: FontDataProvider,
}

impl LoadedFontDescriptor {
    /// Wraps bytes that are already in memory
    pub fn from_bytes(identity: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        let data: Arc<[u8]> = data.into();
        Self::with_provider(identity, Arc::new(move || Ok(Arc::clone(&data))))
    }

    /// Reads the file only when a cache miss needs its bytes
    ///
    /// The path doubles as the identity unless one is given.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path: PathBuf = path.as_ref().to_path_buf();
        let identity = path.display().to_string();
        Self::with_provider(
            identity,
            Arc::new(move || std::fs::read(&path).map(Arc::from)),
        )
    }

    /// Any lazy source of font bytes
    pub fn with_provider(identity: impl Into<String>, data: FontDataProvider) -> Self {
        Self {
            identity: identity.into(),
            weight: FontWeight::NORMAL,
            style: FontStyle::Normal,
            variations: VariationSettings::new(),
            data,
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_variations(mut self, variations: VariationSettings) -> Self {
        self.variations = variations;
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn variations(&self) -> &VariationSettings {
        &self.variations
    }

    /// Invokes the byte provider
    pub fn read_data(&self) -> io::Result<Arc<[u8]>> {
        (self.data)()
    }
}

impl fmt::Debug for LoadedFontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFontDescriptor")
            .field("identity", &self.identity)
            .field("weight", &self.weight)
            .field("style", &self.style)
            .field("variations", &self.variations)
            .finish_non_exhaustive()
    }
}

impl PartialEq for LoadedFontDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.weight == other.weight
            && self.style == other.style
            && self.variations == other.variations
    }
}

impl Eq for LoadedFontDescriptor {}

impl Hash for LoadedFontDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
        self.weight.hash(state);
        self.style.hash(state);
        self.variations.hash(state);
    }
}

/// The two kinds of font a request can name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontDescriptor {
    System(SystemFontDescriptor),
    Loaded(LoadedFontDescriptor),
}

impl FontDescriptor {
    pub fn identity(&self) -> &str {
        match self {
            FontDescriptor::System(font) => font.identity(),
            FontDescriptor::Loaded(font) => font.identity(),
        }
    }

    pub fn weight(&self) -> FontWeight {
        match self {
            FontDescriptor::System(font) => font.weight(),
            FontDescriptor::Loaded(font) => font.weight(),
        }
    }

    pub fn style(&self) -> FontStyle {
        match self {
            FontDescriptor::System(font) => font.style(),
            FontDescriptor::Loaded(font) => font.style(),
        }
    }

    pub fn variations(&self) -> &VariationSettings {
        match self {
            FontDescriptor::System(font) => font.variations(),
            FontDescriptor::Loaded(font) => font.variations(),
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, FontDescriptor::System(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            FontDescriptor::System(_) => "system",
            FontDescriptor::Loaded(_) => "loaded",
        }
    }

    /// Stable string naming exactly this font instance
    ///
    /// The identity is length-prefixed, so no identity text can make two
    /// different attribute sets produce the same key.
    pub fn cache_key(&self) -> String {
        let identity = self.identity();
        format!(
            "{}|{}:{}|weight={}|style={}|variations={}",
            self.kind(),
            identity.len(),
            identity,
            self.weight().value(),
            self.style(),
            self.variations(),
        )
    }
}

impl From<SystemFontDescriptor> for FontDescriptor {
    fn from(font: SystemFontDescriptor) -> Self {
        FontDescriptor::System(font)
    }
}

impl From<LoadedFontDescriptor> for FontDescriptor {
    fn from(font: LoadedFontDescriptor) -> Self {
        FontDescriptor::Loaded(font)
    }
}
