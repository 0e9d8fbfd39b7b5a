use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use fontbind_core::{
    AxisTag, FontDescriptor, FontStyle, FontWeight, LoadedFontDescriptor, SystemFontDescriptor,
    VariationSettings,
};
use proptest::prelude::*;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn style_from(italic: bool) -> FontStyle {
    if italic {
        FontStyle::Italic
    } else {
        FontStyle::Normal
    }
}

proptest! {
    #[test]
    fn loaded_descriptors_with_same_attributes_are_equal(
        identity in "[a-zA-Z0-9 ]{1,16}",
        weight in 1u16..=1000,
        italic in any::<bool>(),
        wght in 100.0f32..900.0,
        bytes_a in proptest::collection::vec(any::<u8>(), 0..32),
        bytes_b in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let variations = VariationSettings::new().weight(wght);
        let build = |bytes: Vec<u8>| {
            LoadedFontDescriptor::from_bytes(identity.clone(), bytes)
                .with_weight(FontWeight::new(weight))
                .with_style(style_from(italic))
                .with_variations(variations.clone())
        };

        let a = FontDescriptor::from(build(bytes_a));
        let b = FontDescriptor::from(build(bytes_b));

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
        prop_assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn different_weights_never_share_a_key(
        identity in "[a-zA-Z|=:]{1,12}",
        w1 in 1u16..=1000,
        w2 in 1u16..=1000,
    ) {
        prop_assume!(w1 != w2);
        let a = FontDescriptor::from(SystemFontDescriptor::new(identity.clone()).with_weight(FontWeight::new(w1)));
        let b = FontDescriptor::from(SystemFontDescriptor::new(identity).with_weight(FontWeight::new(w2)));
        prop_assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn different_axis_values_never_share_a_key(
        v1 in 25.0f32..200.0,
        v2 in 25.0f32..200.0,
    ) {
        prop_assume!(v1.to_bits() != v2.to_bits());
        let a = FontDescriptor::from(
            SystemFontDescriptor::new("Inter").with_variations(VariationSettings::new().with(AxisTag::WIDTH, v1)),
        );
        let b = FontDescriptor::from(
            SystemFontDescriptor::new("Inter").with_variations(VariationSettings::new().with(AxisTag::WIDTH, v2)),
        );
        prop_assert_ne!(&a, &b);
        prop_assert_ne!(a.cache_key(), b.cache_key());
    }
}

#[test]
fn identity_text_cannot_collide_with_other_attributes() {
    let a = FontDescriptor::from(SystemFontDescriptor::new("X").with_weight(FontWeight::BOLD));
    let b = FontDescriptor::from(SystemFontDescriptor::new("X|weight=700"));
    assert_ne!(a.cache_key(), b.cache_key());
}
