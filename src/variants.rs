//! Variants
//!
//! A cart line is identified by its product and the *set* of variant options
//! chosen for it. The order a shopper lists options in is preserved for display
//! but ignored for identity.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single variant option, e.g. `size = M`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Variant {
    /// Option name.
    pub name: String,

    /// Chosen value.
    pub value: String,
}

impl Variant {
    /// Create a new variant option.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Canonical, order-insensitive form of a variant list.
///
/// Options are sorted by `(name, value)` and exact duplicates removed, so two
/// lists naming the same options in a different order produce equal keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VariantKey(SmallVec<[Variant; 2]>);

impl VariantKey {
    /// Build the canonical key for a list of variants.
    pub fn new(variants: &[Variant]) -> Self {
        let mut options: SmallVec<[Variant; 2]> = variants.iter().cloned().collect();

        options.sort();
        options.dedup();

        Self(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_option_order() {
        let a = [Variant::new("size", "M"), Variant::new("colour", "red")];
        let b = [Variant::new("colour", "red"), Variant::new("size", "M")];

        assert_eq!(VariantKey::new(&a), VariantKey::new(&b));
    }

    #[test]
    fn key_removes_duplicate_options() {
        let a = [
            Variant::new("size", "M"),
            Variant::new("size", "M"),
            Variant::new("colour", "red"),
        ];
        let b = [Variant::new("colour", "red"), Variant::new("size", "M")];

        assert_eq!(VariantKey::new(&a), VariantKey::new(&b));
        assert_eq!(VariantKey::new(&a).0.len(), 2);
    }

    #[test]
    fn different_values_produce_different_keys() {
        let a = [Variant::new("size", "M")];
        let b = [Variant::new("size", "L")];

        assert_ne!(VariantKey::new(&a), VariantKey::new(&b));
    }

    #[test]
    fn empty_list_is_empty_key() {
        assert!(VariantKey::new(&[]).0.is_empty());
        assert_eq!(VariantKey::new(&[]), VariantKey::default());
    }

    #[test]
    fn options_are_sorted_by_name_then_value() {
        let key = VariantKey::new(&[
            Variant::new("size", "S"),
            Variant::new("colour", "red"),
            Variant::new("colour", "blue"),
        ]);

        let names: Vec<(&str, &str)> = key
            .0
            .iter()
            .map(|v| (v.name.as_str(), v.value.as_str()))
            .collect();

        assert_eq!(
            names,
            vec![("colour", "blue"), ("colour", "red"), ("size", "S")]
        );
    }
}
