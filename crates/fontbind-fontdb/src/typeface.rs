// this_file: crates/fontbind-fontdb/src/typeface.rs

//! Native typeface handles.
//!
//! A [`Typeface`] is a cheap, clonable handle over shared font bytes plus the
//! metadata needed for matching. Applying variation coordinates derives a new
//! handle that shares the same bytes and the already-parsed axis ranges, so
//! nothing is re-read or re-parsed.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fontbind_core::{AxisTag, FontStyle, FontWeight, VariationSettings};
use read_fonts::{types::Tag, FontRef, ReadError};
use skrifa::attribute::Style;
use skrifa::string::StringId;
use skrifa::MetadataProvider;

static NEXT_TYPEFACE_ID: AtomicU64 = AtomicU64::new(1);

fn next_typeface_id() -> u64 {
    NEXT_TYPEFACE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Upright, italic, or oblique
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Slant {
    #[default]
    Upright,
    Italic,
    Oblique,
}

/// Width class on the 1 (ultra-condensed) to 9 (ultra-expanded) scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWidth(u16);

impl FontWidth {
    pub const ULTRA_CONDENSED: FontWidth = FontWidth(1);
    pub const CONDENSED: FontWidth = FontWidth(3);
    pub const NORMAL: FontWidth = FontWidth(5);
    pub const EXPANDED: FontWidth = FontWidth(7);
    pub const ULTRA_EXPANDED: FontWidth = FontWidth(9);

    pub fn new(class: u16) -> Self {
        FontWidth(class.clamp(1, 9))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Nearest width class for an OS/2-style stretch ratio (1.0 is normal)
    pub fn from_ratio(ratio: f32) -> Self {
        const RATIOS: [f32; 9] = [0.5, 0.625, 0.75, 0.875, 1.0, 1.125, 1.25, 1.5, 2.0];
        let class = RATIOS
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (ratio - **a)
                    .abs()
                    .total_cmp(&(ratio - **b).abs())
            })
            .map(|(index, _)| index as u16 + 1)
            .unwrap_or(5);
        FontWidth(class)
    }
}

impl Default for FontWidth {
    fn default() -> Self {
        FontWidth::NORMAL
    }
}

/// The style a native typeface reports, or a request is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypefaceStyle {
    pub weight: u16,
    pub width: FontWidth,
    pub slant: Slant,
}

impl TypefaceStyle {
    pub fn new(weight: u16, width: FontWidth, slant: Slant) -> Self {
        Self {
            weight,
            width,
            slant,
        }
    }

    /// The style a framework request asks for: normal width, italic or upright
    pub fn from_request(weight: FontWeight, style: FontStyle) -> Self {
        let slant = match style {
            FontStyle::Normal => Slant::Upright,
            FontStyle::Italic => Slant::Italic,
        };
        Self::new(weight.value(), FontWidth::NORMAL, slant)
    }

    /// Lower is closer: slant first, then width, then CSS weight rules
    pub fn match_score(&self, candidate: &TypefaceStyle) -> (u8, u16, u32) {
        (
            slant_penalty(self.slant, candidate.slant),
            self.width.0.abs_diff(candidate.width.0),
            weight_penalty(self.weight, candidate.weight),
        )
    }
}

impl Default for TypefaceStyle {
    fn default() -> Self {
        Self::new(FontWeight::NORMAL.value(), FontWidth::NORMAL, Slant::Upright)
    }
}

fn slant_penalty(desired: Slant, actual: Slant) -> u8 {
    match (desired, actual) {
        (a, b) if a == b => 0,
        (Slant::Italic, Slant::Oblique) | (Slant::Oblique, Slant::Italic) => 1,
        (Slant::Upright, Slant::Oblique) => 1,
        _ => 2,
    }
}

// CSS Fonts 4 weight matching, expressed as a penalty
fn weight_penalty(desired: u16, actual: u16) -> u32 {
    let (d, a) = (u32::from(desired), u32::from(actual));
    if a == d {
        return 0;
    }
    if (400..=500).contains(&d) {
        if a > d && a <= 500 {
            a - d
        } else if a < d {
            1000 + (d - a)
        } else {
            2000 + (a - d)
        }
    } else if d < 400 {
        if a < d {
            d - a
        } else {
            1000 + (a - d)
        }
    } else if a > d {
        a - d
    } else {
        1000 + (d - a)
    }
}

/// One variation axis a font supports
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub tag: AxisTag,
    pub min: f32,
    pub default: f32,
    pub max: f32,
}

struct TypefaceInner {
    id: u64,
    data: Arc<[u8]>,
    face_index: u32,
    family_name: String,
    style: TypefaceStyle,
    axes: Arc<[AxisRange]>,
    variations: VariationSettings,
}

/// A loaded, ready-to-render typeface
///
/// Clones share the same underlying handle; [`Typeface::same_handle`] tells
/// whether two values are the same native object.
#[derive(Clone)]
pub struct Typeface {
    inner: Arc<TypefaceInner>,
}

impl Typeface {
    /// Parses font bytes into a typeface
    pub fn from_data(data: impl Into<Arc<[u8]>>) -> Result<Self, ReadError> {
        Self::from_data_index(data, 0)
    }

    /// Parses a specific face; collections beyond face 0 are not supported
    pub fn from_data_index(data: impl Into<Arc<[u8]>>, face_index: u32) -> Result<Self, ReadError> {
        let data: Arc<[u8]> = data.into();
        let font = FontRef::from_index(&data, face_index)?;

        let family_name = read_family_name(&font).unwrap_or_default();
        let attributes = font.attributes();
        let slant = match attributes.style {
            Style::Normal => Slant::Upright,
            Style::Italic => Slant::Italic,
            Style::Oblique(_) => Slant::Oblique,
        };
        let style = TypefaceStyle::new(
            attributes.weight.value().round().clamp(1.0, 1000.0) as u16,
            FontWidth::from_ratio(attributes.stretch.ratio()),
            slant,
        );

        let axes: Vec<AxisRange> = font
            .axes()
            .iter()
            .filter_map(|axis| {
                let tag = AxisTag::new(axis.tag().to_be_bytes()).ok()?;
                Some(AxisRange {
                    tag,
                    min: axis.min_value(),
                    default: axis.default_value(),
                    max: axis.max_value(),
                })
            })
            .collect();

        log::debug!(
            "Parsed typeface '{}' ({:?}, {} axes, {} bytes)",
            family_name,
            style,
            axes.len(),
            data.len()
        );

        Ok(Self::from_inner(TypefaceInner {
            id: next_typeface_id(),
            data,
            face_index,
            family_name,
            style,
            axes: axes.into(),
            variations: VariationSettings::new(),
        }))
    }

    /// Describes a face whose metadata the backend already knows
    pub fn builder(family_name: impl Into<String>) -> TypefaceBuilder {
        TypefaceBuilder::new(family_name)
    }

    fn from_inner(inner: TypefaceInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Derives a handle with `settings` applied on top of the current coordinates
    ///
    /// Values are clamped to the font's axis ranges and axes the font does not
    /// have are dropped. The new handle shares this one's bytes.
    pub fn make_clone(&self, settings: &VariationSettings) -> Typeface {
        let mut requested = self.inner.variations.clone();
        for axis in settings.iter() {
            requested.set(axis.tag, axis.value);
        }
        let variations = clamp_to_axes(&self.inner.axes, &requested, &self.inner.family_name);

        let mut style = self.inner.style;
        if let Some(weight) = variations.get(AxisTag::WEIGHT) {
            style.weight = weight.round().clamp(1.0, 1000.0) as u16;
        }

        Self::from_inner(TypefaceInner {
            id: next_typeface_id(),
            data: Arc::clone(&self.inner.data),
            face_index: self.inner.face_index,
            family_name: self.inner.family_name.clone(),
            style,
            axes: Arc::clone(&self.inner.axes),
            variations,
        })
    }

    /// Whether both values are the same native handle
    pub fn same_handle(a: &Typeface, b: &Typeface) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Process-unique id of this handle
    pub fn unique_id(&self) -> u64 {
        self.inner.id
    }

    pub fn family_name(&self) -> &str {
        &self.inner.family_name
    }

    pub fn style(&self) -> TypefaceStyle {
        self.inner.style
    }

    pub fn face_index(&self) -> u32 {
        self.inner.face_index
    }

    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Whether two handles read the same byte buffer
    pub fn shares_data_with(&self, other: &Typeface) -> bool {
        Arc::ptr_eq(&self.inner.data, &other.inner.data)
    }

    /// Variation axes the font supports
    pub fn axes(&self) -> &[AxisRange] {
        &self.inner.axes
    }

    /// Coordinates applied to this handle, after clamping
    pub fn variations(&self) -> &VariationSettings {
        &self.inner.variations
    }

    /// Coordinates in the form skrifa expects for outline and metrics lookups
    pub fn location(&self) -> Vec<(Tag, f32)> {
        self.inner
            .variations
            .iter()
            .map(|axis| (Tag::new(&axis.tag.to_bytes()), axis.value))
            .collect()
    }
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("id", &self.inner.id)
            .field("family_name", &self.inner.family_name)
            .field("style", &self.inner.style)
            .field("variations", &self.inner.variations)
            .finish_non_exhaustive()
    }
}

fn read_family_name(font: &FontRef<'_>) -> Option<String> {
    [StringId::TYPOGRAPHIC_FAMILY_NAME, StringId::FAMILY_NAME]
        .into_iter()
        .find_map(|id| font.localized_strings(id).english_or_first())
        .map(|name| name.chars().collect())
}

fn clamp_to_axes(axes: &[AxisRange], requested: &VariationSettings, family: &str) -> VariationSettings {
    if axes.is_empty() {
        if !requested.is_empty() {
            log::warn!(
                "Typeface '{}' is static but coordinates provided - ignoring",
                family
            );
        }
        return VariationSettings::new();
    }

    let mut clamped = VariationSettings::new();
    for axis in requested.iter() {
        let Some(range) = axes.iter().find(|range| range.tag == axis.tag) else {
            log::warn!(
                "Unknown variation axis '{}' for typeface '{}' - dropping coordinate",
                axis.tag,
                family
            );
            continue;
        };

        let value = axis.value.clamp(range.min, range.max);
        if (value - axis.value).abs() > 0.001 {
            log::warn!(
                "Coordinate for axis '{}' clamped from {} to {} (font bounds: [{}, {}])",
                axis.tag,
                axis.value,
                value,
                range.min,
                range.max
            );
        }
        clamped.set(axis.tag, value);
    }
    clamped
}

/// Builds a [`Typeface`] from known metadata instead of parsing bytes
pub struct TypefaceBuilder {
    family_name: String,
    style: TypefaceStyle,
    data: Arc<[u8]>,
    face_index: u32,
    axes: Vec<AxisRange>,
}

impl TypefaceBuilder {
    fn new(family_name: impl Into<String>) -> Self {
        Self {
            family_name: family_name.into(),
            style: TypefaceStyle::default(),
            data: Arc::from(Vec::new()),
            face_index: 0,
            axes: Vec::new(),
        }
    }

    pub fn style(mut self, style: TypefaceStyle) -> Self {
        self.style = style;
        self
    }

    pub fn weight(mut self, weight: u16) -> Self {
        self.style.weight = weight;
        self
    }

    pub fn slant(mut self, slant: Slant) -> Self {
        self.style.slant = slant;
        self
    }

    pub fn data(mut self, data: impl Into<Arc<[u8]>>) -> Self {
        self.data = data.into();
        self
    }

    pub fn face_index(mut self, face_index: u32) -> Self {
        self.face_index = face_index;
        self
    }

    pub fn axis(mut self, tag: AxisTag, min: f32, default: f32, max: f32) -> Self {
        self.axes.push(AxisRange {
            tag,
            min,
            default,
            max,
        });
        self
    }

    pub fn build(self) -> Typeface {
        Typeface::from_inner(TypefaceInner {
            id: next_typeface_id(),
            data: self.data,
            face_index: self.face_index,
            family_name: self.family_name,
            style: self.style,
            axes: self.axes.into(),
            variations: VariationSettings::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable_face() -> Typeface {
        Typeface::builder("Inter")
            .data(vec![1u8, 2, 3])
            .axis(AxisTag::WEIGHT, 100.0, 400.0, 900.0)
            .axis(AxisTag::WIDTH, 75.0, 100.0, 125.0)
            .build()
    }

    #[test]
    fn test_from_data_rejects_garbage() {
        assert!(Typeface::from_data(vec![0u8; 100]).is_err());
    }

    #[test]
    fn test_clone_shares_bytes_but_not_handle() {
        let base = variable_face();
        let bold = base.make_clone(&VariationSettings::new().weight(700.0));

        assert!(!Typeface::same_handle(&base, &bold));
        assert_ne!(base.unique_id(), bold.unique_id());
        assert_eq!(base.unique_id(), base.clone().unique_id());
        assert!(base.shares_data_with(&bold));
        assert_eq!(bold.variations().get(AxisTag::WEIGHT), Some(700.0));
        assert_eq!(bold.style().weight, 700);
        assert!(base.variations().is_empty());
    }

    #[test]
    fn test_clone_clamps_and_drops_unknown_axes() {
        let base = variable_face();
        let settings = VariationSettings::new()
            .width(300.0)
            .with(AxisTag::OPTICAL_SIZE, 12.0);
        let clone = base.make_clone(&settings);

        assert_eq!(clone.variations().get(AxisTag::WIDTH), Some(125.0));
        assert_eq!(clone.variations().get(AxisTag::OPTICAL_SIZE), None);
        assert_eq!(clone.location().len(), 1);
    }

    #[test]
    fn test_static_face_ignores_coordinates() {
        let base = Typeface::builder("Static").build();
        let clone = base.make_clone(&VariationSettings::new().weight(700.0));
        assert!(clone.variations().is_empty());
        assert!(!Typeface::same_handle(&base, &clone));
    }

    #[test]
    fn test_weight_penalty_follows_css_rules() {
        // Desired 400 prefers 500 over 300, and 300 over 600
        assert!(weight_penalty(400, 500) < weight_penalty(400, 300));
        assert!(weight_penalty(400, 300) < weight_penalty(400, 600));
        // Desired 700 prefers heavier
        assert!(weight_penalty(700, 800) < weight_penalty(700, 600));
        // Desired 300 prefers lighter
        assert!(weight_penalty(300, 200) < weight_penalty(300, 400));
    }

    #[test]
    fn test_slant_dominates_weight() {
        let desired = TypefaceStyle::new(700, FontWidth::NORMAL, Slant::Italic);
        let upright_bold = TypefaceStyle::new(700, FontWidth::NORMAL, Slant::Upright);
        let italic_light = TypefaceStyle::new(300, FontWidth::NORMAL, Slant::Italic);
        assert!(desired.match_score(&italic_light) < desired.match_score(&upright_bold));
    }

    #[test]
    fn test_width_from_ratio() {
        assert_eq!(FontWidth::from_ratio(1.0), FontWidth::NORMAL);
        assert_eq!(FontWidth::from_ratio(0.74), FontWidth::CONDENSED);
        assert_eq!(FontWidth::from_ratio(3.0), FontWidth::ULTRA_EXPANDED);
    }
}
