//! Error types for fontbind

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FontError>;

/// Everything that can go wrong while turning a descriptor into a typeface
///
/// The first group are programming errors: the caller asked for a shape this
/// layer does not handle. The second group are resource errors scoped to a
/// single request; the framework decides whether to try another family member.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Unknown generic font family: {0}")]
    UnknownGenericFamily(String),

    #[error("Unsupported font family: {0}")]
    UnsupportedMixedFamily(String),

    #[error("Invalid variation axis tag: {0:?}")]
    InvalidAxisTag(String),

    #[error("Typeface not found: {0}")]
    TypefaceNotFound(String),

    #[error("Invalid font data for {identity}: {reason}")]
    InvalidFontData { identity: String, reason: String },

    #[error("Failed to read font data for {identity}: {source}")]
    DataProvider {
        identity: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Font load produced no typeface: {0}")]
    MissingTypeface(String),
}
