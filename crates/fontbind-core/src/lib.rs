//! fontbind core: font descriptors, platform tables, and the typeface cache
//!
//! Everything here is independent of the native font library. The
//! `fontbind-fontdb` crate turns these descriptors into real typefaces.
//!
//! ## What lives here
//!
//! - [`descriptor`] - What the UI framework asks for: a system font by name or
//!   a font from bytes, plus weight, style, and variation axes
//! - [`variation`] - Variable font axis settings
//! - [`platform`] - Platform detection and generic family tables
//! - [`cache`] - Expire-after-access cache with at-most-one load per key
//! - [`cache_config`] - Idle window configuration
//! - [`clock`] - Time sources, including a manual clock for simulation
//!
//! ```rust
//! use fontbind_core::{FontDescriptor, FontStyle, FontWeight, SystemFontDescriptor};
//!
//! let font = FontDescriptor::from(
//!     SystemFontDescriptor::new("Roboto")
//!         .with_weight(FontWeight::BOLD)
//!         .with_style(FontStyle::Italic),
//! );
//! assert_eq!(font.cache_key(), "system|6:Roboto|weight=700|style=italic|variations=");
//! ```

pub mod cache;
pub mod cache_config;
pub mod clock;
pub mod descriptor;
pub mod error;
pub mod platform;
pub mod variation;

pub use cache::{CacheStats, ExpireAfterAccessCache};
pub use cache_config::TypefaceCacheConfig;
pub use clock::{Clock, ManualClock, SystemClock};
pub use descriptor::{
    FontDataProvider, FontDescriptor, FontStyle, FontWeight, LoadedFontDescriptor,
    SystemFontDescriptor,
};
pub use error::{FontError, Result};
pub use platform::{
    current_platform, generic_family_aliases, generic_family_aliases_for, GenericFamily,
    GenericFontFamily, Platform,
};
pub use variation::{AxisTag, VariationAxis, VariationSettings};
