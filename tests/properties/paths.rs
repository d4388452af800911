//! Property tests for project path normalization.

use proptest::prelude::*;

use siteforge::domain::value_objects::{PathError, SitePath};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-][A-Za-z0-9._-]{0,12}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..")
}

fn noisy_path() -> impl Strategy<Value = String> {
    let sep = prop_oneof![Just("/"), Just("\\"), Just("//"), Just("/./")];
    (
        prop_oneof![Just(""), Just("./"), Just("/")],
        proptest::collection::vec((segment(), sep), 1..=5),
    )
        .prop_map(|(lead, parts)| {
            let mut raw = lead.to_string();
            for (segment, sep) in parts {
                raw.push_str(&segment);
                raw.push_str(sep);
            }
            raw
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `SitePath::new` never panics on arbitrary input.
    #[test]
    fn property_site_path_new_never_panics(s in "(?s).{0,128}") {
        let _ = SitePath::new(&s);
    }

    /// PROPERTY: normalizing a normalized path changes nothing.
    #[test]
    fn property_normalization_is_idempotent(raw in noisy_path()) {
        let once = SitePath::new(&raw).unwrap();
        let twice = SitePath::new(once.as_str()).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: normalized paths are relative, forward-slash and free of empty segments.
    #[test]
    fn property_normalized_form(raw in noisy_path()) {
        let path = SitePath::new(&raw).unwrap();
        let s = path.as_str();
        prop_assert!(!s.starts_with('/'));
        prop_assert!(!s.ends_with('/'));
        prop_assert!(!s.contains('\\'));
        prop_assert!(!s.contains("//"));
        prop_assert!(path.segments().all(|seg| seg != "." && seg != ".."));
    }

    /// PROPERTY: any `..` segment is rejected, wherever it appears.
    #[test]
    fn property_traversal_is_rejected(
        before in proptest::collection::vec(segment(), 0..3),
        after in proptest::collection::vec(segment(), 0..3),
    ) {
        let mut segments = before;
        segments.push("..".to_string());
        segments.extend(after);
        let raw = segments.join("/");
        prop_assert_eq!(SitePath::new(&raw), Err(PathError::ContainsTraversal));
    }
}
