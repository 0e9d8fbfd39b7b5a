//! Variable font axis settings
//!
//! A variation axis is a continuous font parameter such as weight or width.
//! Settings are kept sorted by tag so two requests naming the same axes in a
//! different order describe the same font instance.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{FontError, Result};

/// A four-byte OpenType axis tag like `wght`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxisTag([u8; 4]);

impl AxisTag {
    pub const WEIGHT: AxisTag = AxisTag(*b"wght");
    pub const WIDTH: AxisTag = AxisTag(*b"wdth");
    pub const SLANT: AxisTag = AxisTag(*b"slnt");
    pub const ITALIC: AxisTag = AxisTag(*b"ital");
    pub const OPTICAL_SIZE: AxisTag = AxisTag(*b"opsz");

    /// Builds a tag from raw bytes, which must be printable ASCII
    pub fn new(bytes: [u8; 4]) -> Result<Self> {
        if bytes.iter().all(|b| (0x20..=0x7e).contains(b)) {
            Ok(AxisTag(bytes))
        } else {
            Err(FontError::InvalidAxisTag(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl FromStr for AxisTag {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| FontError::InvalidAxisTag(s.to_string()))?;
        AxisTag::new(bytes)
    }
}

impl fmt::Display for AxisTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Construction guarantees printable ASCII
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for AxisTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AxisTag({})", self)
    }
}

/// One axis set to one value
#[derive(Debug, Clone, Copy)]
pub struct VariationAxis {
    pub tag: AxisTag,
    pub value: f32,
}

impl VariationAxis {
    pub fn new(tag: AxisTag, value: f32) -> Self {
        Self { tag, value }
    }
}

// Compare by bit pattern so the type can sit inside hashed cache keys
impl PartialEq for VariationAxis {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.value.to_bits() == other.value.to_bits()
    }
}

impl Eq for VariationAxis {}

impl Hash for VariationAxis {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        self.value.to_bits().hash(state);
    }
}

/// The full set of axis values requested for one font
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VariationSettings {
    axes: Vec<VariationAxis>,
}

impl VariationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an axis, replacing any earlier value for the same tag
    ///
    /// Every NaN is stored as the one canonical NaN, so settings that print
    /// alike also compare alike.
    pub fn set(&mut self, tag: AxisTag, value: f32) {
        let value = if value.is_nan() { f32::NAN } else { value };
        match self.axes.binary_search_by(|axis| axis.tag.cmp(&tag)) {
            Ok(index) => self.axes[index].value = value,
            Err(index) => self.axes.insert(index, VariationAxis::new(tag, value)),
        }
    }

    pub fn with(mut self, tag: AxisTag, value: f32) -> Self {
        self.set(tag, value);
        self
    }

    /// Shorthand for the `wght` axis
    pub fn weight(self, value: f32) -> Self {
        self.with(AxisTag::WEIGHT, value)
    }

    /// Shorthand for the `wdth` axis
    pub fn width(self, value: f32) -> Self {
        self.with(AxisTag::WIDTH, value)
    }

    pub fn get(&self, tag: AxisTag) -> Option<f32> {
        self.axes
            .binary_search_by(|axis| axis.tag.cmp(&tag))
            .ok()
            .map(|index| self.axes[index].value)
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    /// Axes in tag order
    pub fn iter(&self) -> impl Iterator<Item = &VariationAxis> {
        self.axes.iter()
    }
}

impl FromIterator<VariationAxis> for VariationSettings {
    fn from_iter<I: IntoIterator<Item = VariationAxis>>(iter: I) -> Self {
        let mut settings = VariationSettings::new();
        for axis in iter {
            settings.set(axis.tag, axis.value);
        }
        settings
    }
}

impl fmt::Display for VariationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, axis) in self.axes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", axis.tag, axis.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_parsing() {
        let tag: AxisTag = "wght".parse().unwrap();
        assert_eq!(tag, AxisTag::WEIGHT);
        assert_eq!(tag.to_string(), "wght");
        assert!("wgt".parse::<AxisTag>().is_err());
        assert!(AxisTag::new([b'w', b'g', b'h', 0]).is_err());
    }

    #[test]
    fn test_nan_payloads_collapse_to_one_value() {
        let quiet = VariationSettings::new().weight(f32::NAN);
        let payload = VariationSettings::new().weight(f32::from_bits(0x7fc0_0001));
        let negative = VariationSettings::new().weight(-f32::NAN);

        assert_eq!(quiet, payload);
        assert_eq!(quiet, negative);
        assert_eq!(quiet.to_string(), payload.to_string());
    }

    #[test]
    fn test_settings_are_sorted_and_deduplicated() {
        let settings = VariationSettings::new()
            .with(AxisTag::WIDTH, 75.0)
            .weight(300.0)
            .weight(650.0);

        let tags: Vec<String> = settings.iter().map(|a| a.tag.to_string()).collect();
        assert_eq!(tags, ["wdth", "wght"]);
        assert_eq!(settings.get(AxisTag::WEIGHT), Some(650.0));
        assert_eq!(settings.to_string(), "wdth=75,wght=650");
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = VariationSettings::new().weight(500.0).width(90.0);
        let b = VariationSettings::new().width(90.0).weight(500.0);
        assert_eq!(a, b);
    }
}
