//! Identifier classifier.
//!
//! The single source of truth for "is this value a lookup reference". The
//! verdict depends only on lexical shape, never on whether a lookup succeeds.

use std::sync::LazyLock;

use regex::Regex;

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("reference pattern is a valid regex")
});

/// True when `value` is a canonical 8-4-4-4-12 hex UUID (any case).
pub fn is_reference(value: &str) -> bool {
    REFERENCE_PATTERN.is_match(value)
}

/// Case-folded form used to key lookups and name maps.
pub fn canonical_id(value: &str) -> String {
    value.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_canonical_uuids() {
        assert!(is_reference("11111111-1111-1111-1111-111111111111"));
        assert!(is_reference("3f2504e0-4f89-11d3-9a0c-0305e82c3301"));
        assert!(is_reference("3F2504E0-4F89-11D3-9A0C-0305E82C3301"));
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(!is_reference(""));
        assert!(!is_reference("J45"));
        assert!(!is_reference("Atropine"));
        assert!(!is_reference("6/6"));
        // Simple, braced and urn forms are valid UUIDs but not the store's key shape
        assert!(!is_reference("3f2504e04f8911d39a0c0305e82c3301"));
        assert!(!is_reference("{3f2504e0-4f89-11d3-9a0c-0305e82c3301}"));
        assert!(!is_reference("urn:uuid:3f2504e0-4f89-11d3-9a0c-0305e82c3301"));
        assert!(!is_reference(" 3f2504e0-4f89-11d3-9a0c-0305e82c3301"));
        assert!(!is_reference("3f2504e0-4f89-11d3-9a0c-0305e82c3301\n"));
        assert!(!is_reference("3g2504e0-4f89-11d3-9a0c-0305e82c3301"));
    }

    #[test]
    fn test_canonical_id() {
        assert_eq!(
            canonical_id("3F2504E0-4F89-11D3-9A0C-0305E82C3301"),
            "3f2504e0-4f89-11d3-9a0c-0305e82c3301"
        );
    }

    proptest! {
        #[test]
        fn prop_generated_uuids_are_references(bytes in any::<[u8; 16]>(), upper in any::<bool>()) {
            let id = uuid::Uuid::from_bytes(bytes).hyphenated().to_string();
            let id = if upper { id.to_uppercase() } else { id };
            prop_assert!(is_reference(&id));
        }

        #[test]
        fn prop_names_are_not_references(name in "[A-Za-z][A-Za-z0-9 /.%()-]{0,40}") {
            prop_assume!(name.len() != 36);
            prop_assert!(!is_reference(&name));
        }
    }
}
