//! Which OS are we on, and what does "sans-serif" mean there?
//!
//! Generic family names never reach the native font manager directly. Each
//! platform gets a fixed, ordered list of concrete font names to try, and the
//! first one the fallback collection can match wins.

use std::fmt;
use std::sync::OnceLock;

use crate::error::{FontError, Result};

/// The platforms that get their own generic-family table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Unknown,
    Linux,
    Windows,
    MacOS,
    IOS,
    TvOS,
    WatchOS,
    Android,
}

impl Platform {
    /// Maps the compile target to a platform identity
    fn detect() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "ios") {
            Platform::IOS
        } else if cfg!(target_os = "tvos") {
            Platform::TvOS
        } else if cfg!(target_os = "watchos") {
            Platform::WatchOS
        } else {
            Platform::Unknown
        }
    }

    /// Apple platforms share one set of system font aliases
    pub fn is_apple(self) -> bool {
        matches!(
            self,
            Platform::MacOS | Platform::IOS | Platform::TvOS | Platform::WatchOS
        )
    }
}

static CURRENT_PLATFORM: OnceLock<Platform> = OnceLock::new();

/// The platform this process runs on, detected once
pub fn current_platform() -> Platform {
    *CURRENT_PLATFORM.get_or_init(|| {
        let platform = Platform::detect();
        log::debug!("Detected platform {:?}", platform);
        platform
    })
}

/// The four style-class families every platform table covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericFamily {
    SansSerif,
    Serif,
    Monospace,
    Cursive,
}

impl GenericFamily {
    pub const ALL: [GenericFamily; 4] = [
        GenericFamily::SansSerif,
        GenericFamily::Serif,
        GenericFamily::Monospace,
        GenericFamily::Cursive,
    ];

    /// The CSS-style name this family is requested by
    pub fn name(self) -> &'static str {
        match self {
            GenericFamily::SansSerif => "sans-serif",
            GenericFamily::Serif => "serif",
            GenericFamily::Monospace => "monospace",
            GenericFamily::Cursive => "cursive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|family| family.name() == name)
    }
}

impl fmt::Display for GenericFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named generic family as the UI framework hands it over
///
/// The name is not validated on construction; resolution fails with
/// [`FontError::UnknownGenericFamily`] if it is not one of the four known ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericFontFamily {
    name: String,
}

impl GenericFontFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn sans_serif() -> Self {
        GenericFamily::SansSerif.into()
    }

    pub fn serif() -> Self {
        GenericFamily::Serif.into()
    }

    pub fn monospace() -> Self {
        GenericFamily::Monospace.into()
    }

    pub fn cursive() -> Self {
        GenericFamily::Cursive.into()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<GenericFamily> for GenericFontFamily {
    fn from(family: GenericFamily) -> Self {
        Self::new(family.name())
    }
}

/// Concrete font names for each generic family on one platform
#[derive(Debug, Clone, Copy)]
struct GenericFamilyTable {
    sans_serif: &'static [&'static str],
    serif: &'static [&'static str],
    monospace: &'static [&'static str],
    cursive: &'static [&'static str],
}

impl GenericFamilyTable {
    fn aliases(&self, family: GenericFamily) -> &'static [&'static str] {
        match family {
            GenericFamily::SansSerif => self.sans_serif,
            GenericFamily::Serif => self.serif,
            GenericFamily::Monospace => self.monospace,
            GenericFamily::Cursive => self.cursive,
        }
    }
}

const LINUX_FAMILIES: GenericFamilyTable = GenericFamilyTable {
    sans_serif: &["Noto Sans", "DejaVu Sans", "Arial"],
    serif: &["Noto Serif", "DejaVu Serif", "Times New Roman"],
    monospace: &["Noto Sans Mono", "DejaVu Sans Mono", "Consolas"],
    cursive: &["Comic Sans MS"],
};

// Segoe UI is the Windows system font, so it goes first
const WINDOWS_FAMILIES: GenericFamilyTable = GenericFamilyTable {
    sans_serif: &["Segoe UI", "Arial"],
    serif: &["Times New Roman"],
    monospace: &["Consolas"],
    cursive: &["Comic Sans MS"],
};

// The .AppleSystem* aliases are the only way to reach SF and New York
const APPLE_FAMILIES: GenericFamilyTable = GenericFamilyTable {
    sans_serif: &[".AppleSystemUIFont", "Helvetica Neue", "Helvetica"],
    serif: &[".AppleSystemUIFontSerif", "Times", "Times New Roman"],
    monospace: &[".AppleSystemUIFontMonospaced", "Menlo", "Courier"],
    cursive: &["Apple Chancery", "Snell Roundhand"],
};

const ANDROID_FAMILIES: GenericFamilyTable = GenericFamilyTable {
    sans_serif: &["Roboto", "Noto Sans"],
    serif: &["Roboto Serif", "Noto Serif"],
    monospace: &["Roboto Mono", "Noto Sans Mono"],
    cursive: &["Comic Sans MS"],
};

const UNKNOWN_FAMILIES: GenericFamilyTable = GenericFamilyTable {
    sans_serif: &["Arial"],
    serif: &["Times New Roman"],
    monospace: &["Consolas"],
    cursive: &["Comic Sans MS"],
};

fn family_table(platform: Platform) -> &'static GenericFamilyTable {
    match platform {
        Platform::Linux => &LINUX_FAMILIES,
        Platform::Windows => &WINDOWS_FAMILIES,
        Platform::MacOS | Platform::IOS | Platform::TvOS | Platform::WatchOS => &APPLE_FAMILIES,
        Platform::Android => &ANDROID_FAMILIES,
        Platform::Unknown => &UNKNOWN_FAMILIES,
    }
}

/// Ordered candidate fonts for a generic family on the given platform
pub fn generic_family_aliases_for(
    platform: Platform,
    family_name: &str,
) -> Result<&'static [&'static str]> {
    let family = GenericFamily::from_name(family_name)
        .ok_or_else(|| FontError::UnknownGenericFamily(family_name.to_string()))?;
    Ok(family_table(platform).aliases(family))
}

/// Ordered candidate fonts for a generic family on this platform
pub fn generic_family_aliases(family_name: &str) -> Result<&'static [&'static str]> {
    generic_family_aliases_for(current_platform(), family_name)
}
