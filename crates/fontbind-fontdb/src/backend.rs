// this_file: crates/fontbind-fontdb/src/backend.rs

//! The native font manager behind the loader.
//!
//! [`FontBackend`] is the narrow seam to whatever finds installed fonts and
//! parses font bytes. [`SystemFontBackend`] implements it with `fontdb`,
//! which scans the platform font directories.

use std::sync::Arc;

use dashmap::DashMap;
use fontbind_core::{FontError, Result};
use once_cell::sync::OnceCell;

use crate::typeface::{FontWidth, Slant, Typeface, TypefaceStyle};

/// What the loader needs from a native font manager
pub trait FontBackend: Send + Sync {
    /// Used in logs
    fn name(&self) -> &'static str;

    /// Builds a typeface from in-memory font bytes
    fn typeface_from_data(&self, identity: &str, data: Arc<[u8]>) -> Result<Typeface> {
        Typeface::from_data(data).map_err(|err| FontError::InvalidFontData {
            identity: identity.to_string(),
            reason: err.to_string(),
        })
    }

    /// Finds the installed face of `family` closest to `style`
    ///
    /// Returns `None` when no face of that family is installed.
    fn match_family_style(&self, family: &str, style: TypefaceStyle) -> Option<Typeface>;
}

/// Installed fonts, found through `fontdb`
///
/// The system scan runs on first use. Each installed face is parsed at most
/// once and shared afterwards.
pub struct SystemFontBackend {
    database: OnceCell<fontdb::Database>,
    faces: DashMap<fontdb::ID, Typeface>,
}

impl SystemFontBackend {
    /// Scans system fonts lazily, on the first lookup
    pub fn new() -> Self {
        Self {
            database: OnceCell::new(),
            faces: DashMap::new(),
        }
    }

    /// Uses a database the caller already filled
    pub fn with_database(database: fontdb::Database) -> Self {
        Self {
            database: OnceCell::with_value(database),
            faces: DashMap::new(),
        }
    }

    pub fn database(&self) -> &fontdb::Database {
        self.database.get_or_init(|| {
            let mut database = fontdb::Database::new();
            database.load_system_fonts();
            log::info!("Loaded {} system font faces", database.len());
            database
        })
    }

    /// Number of faces parsed so far
    pub fn loaded_face_count(&self) -> usize {
        self.faces.len()
    }

    fn load_face(&self, id: fontdb::ID) -> Option<Typeface> {
        if let Some(typeface) = self.faces.get(&id) {
            return Some(typeface.clone());
        }

        let parsed = self
            .database()
            .with_face_data(id, |data, index| Typeface::from_data_index(data.to_vec(), index))?;

        match parsed {
            Ok(typeface) => {
                // Another thread may have parsed the same face meanwhile; keep the first
                let typeface = self.faces.entry(id).or_insert(typeface).clone();
                Some(typeface)
            }
            Err(err) => {
                log::warn!("Failed to parse system font face {:?}: {}", id, err);
                None
            }
        }
    }
}

impl Default for SystemFontBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBackend for SystemFontBackend {
    fn name(&self) -> &'static str {
        "fontdb"
    }

    fn match_family_style(&self, family: &str, style: TypefaceStyle) -> Option<Typeface> {
        let families = [fontdb::Family::Name(family)];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(style.weight),
            stretch: to_fontdb_stretch(style.width),
            style: match style.slant {
                Slant::Upright => fontdb::Style::Normal,
                Slant::Italic => fontdb::Style::Italic,
                Slant::Oblique => fontdb::Style::Oblique,
            },
        };

        let id = self.database().query(&query)?;
        log::trace!("fontdb matched '{}' {:?} to face {:?}", family, style, id);
        self.load_face(id)
    }
}

fn to_fontdb_stretch(width: FontWidth) -> fontdb::Stretch {
    match width.value() {
        1 => fontdb::Stretch::UltraCondensed,
        2 => fontdb::Stretch::ExtraCondensed,
        3 => fontdb::Stretch::Condensed,
        4 => fontdb::Stretch::SemiCondensed,
        6 => fontdb::Stretch::SemiExpanded,
        7 => fontdb::Stretch::Expanded,
        8 => fontdb::Stretch::ExtraExpanded,
        9 => fontdb::Stretch::UltraExpanded,
        _ => fontdb::Stretch::Normal,
    }
}
