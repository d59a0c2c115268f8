//! Property-based tests for the name-to-path mapping.
//!
//! These tests use proptest to generate random object names and verify that
//! the invariants every stage relies on hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{native_prefix, place, relative_id};
    use proptest::prelude::*;
    use std::path::Path;

    // ============================================================================
    // place / relative_id property tests
    // ============================================================================

    proptest! {
        /// Property: the id of the place of a valid name is the name itself
        #[test]
        fn place_then_relative_id_round_trips(
            name in "[a-z0-9-]{1,8}(\\.[a-z0-9-]{1,8}){0,5}",
        ) {
            let path = place(&name, Path::new(""), "eo");
            prop_assert_eq!(relative_id(&path, "eo"), name);
        }

        /// Property: place is deterministic (same name = same path)
        #[test]
        fn place_is_deterministic(name in "[a-z.|0-9-]{1,30}") {
            let dir = Path::new("target/eo/04-pull");
            prop_assert_eq!(place(&name, dir, "eo"), place(&name, dir, "eo"));
        }

        /// Property: place never escapes the directory it was given
        #[test]
        fn place_stays_inside_dir(name in "[a-z0-9-]{1,8}(\\.[a-z0-9-]{1,8}){0,5}") {
            let dir = Path::new("/tmp/eo");
            prop_assert!(place(&name, dir, "xmir").starts_with(dir));
        }

        /// Property: versioned names land under a directory named after the version
        #[test]
        fn versioned_place_starts_with_version(
            name in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}",
            version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        ) {
            let versioned = format!("{}|{}", name, version);
            let path = place(&versioned, Path::new("pull"), "eo");
            prop_assert!(path.starts_with(Path::new("pull").join(&version)));
        }
    }

    // ============================================================================
    // native_prefix property tests
    // ============================================================================

    proptest! {
        /// Property: native_prefix only ever yields [a-z0-9]
        #[test]
        fn native_prefix_is_identifier_safe(input in ".*") {
            let prefix = native_prefix(Path::new(&input));
            prop_assert!(prefix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }

        /// Property: native_prefix keeps lowercase alphanumerics as they are
        #[test]
        fn native_prefix_preserves_alphanumeric(input in "[a-z0-9]+") {
            prop_assert_eq!(native_prefix(Path::new(&input)), input);
        }
    }
}
