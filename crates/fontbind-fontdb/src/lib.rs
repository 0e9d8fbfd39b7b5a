//! Where descriptors become typefaces: loading, caching, and fallback for fontbind
//!
//! A [`FontContext`] owns everything: a native [`FontBackend`] (installed
//! fonts through `fontdb`, font bytes through `read-fonts` and `skrifa`), a
//! [`TypefaceCache`] that keeps each loaded font for as long as it is in use,
//! and a [`FontRegistry`] that registers loaded fonts into a fallback
//! [`FontCollection`].
//!
//! ```rust,no_run
//! use fontbind_core::{FontStyle, FontWeight, SystemFontDescriptor};
//! use fontbind_fontdb::{FontContext, FontFamily};
//!
//! let fonts = FontContext::new();
//!
//! let family = FontFamily::FontList(vec![
//!     SystemFontDescriptor::new("Roboto").into(),
//!     SystemFontDescriptor::new("Arial").into(),
//! ]);
//! let result = fonts.load_family(&family, FontWeight::BOLD, FontStyle::Normal)?;
//! if let Some(typeface) = result.typeface {
//!     println!("{} from {:?}", typeface.family_name(), result.aliases);
//! }
//! # Ok::<(), fontbind_core::FontError>(())
//! ```
//!
//! ## Memory Management
//!
//! Typefaces share their font bytes through `Arc`. Applying variation axes
//! derives a new handle over the same bytes, and the cache drops handles
//! nobody asked for during its idle window.

pub mod backend;
pub mod context;
pub mod family;
pub mod legacy;
pub mod loader;
pub mod provider;
pub mod registry;
pub mod typeface;
pub mod typeface_cache;

pub use backend::{FontBackend, SystemFontBackend};
pub use context::{FontContext, FontContextBuilder};
pub use family::{FontFamily, LoadedTypefaceFamily};
pub use legacy::LegacyFontLoader;
pub use loader::{apply_variations, TypefaceLoader};
pub use provider::{FontCollection, FontProvider, TypefaceFontProvider};
pub use registry::{FontLoadResult, FontRegistry};
pub use typeface::{AxisRange, FontWidth, Slant, Typeface, TypefaceBuilder, TypefaceStyle};
pub use typeface_cache::TypefaceCache;
