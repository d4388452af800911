//! Property tests for the production filter.

use proptest::prelude::*;

use siteforge::domain::policies::{FileInput, FilterRule};
use siteforge::ProductionFilter;

fn project_path() -> impl Strategy<Value = String> {
    let root = prop_oneof![
        Just("src/app"),
        Just("src/app/api"),
        Just("src/app/editor"),
        Just("src/lib"),
        Just("src/components"),
        Just("app"),
        Just("public"),
        Just(""),
    ];
    let tail = proptest::collection::vec("[a-z][a-z0-9-]{0,8}", 0..3);
    let ext = prop_oneof![Just("ts"), Just("tsx"), Just("md"), Just("json"), Just("css")];
    (root, tail, "[a-z][a-z0-9_-]{0,8}", ext).prop_map(|(root, tail, name, ext)| {
        let mut parts: Vec<String> = Vec::new();
        if !root.is_empty() {
            parts.push(root.to_string());
        }
        parts.extend(tail);
        parts.push(format!("{}.{}", name, ext));
        parts.join("/")
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: classification never panics on arbitrary paths and content.
    #[test]
    fn property_classify_never_panics(
        path in "(?s).{0,128}",
        content in proptest::option::of("(?s).{0,256}"),
    ) {
        let _ = ProductionFilter::new().classify(&path, content.as_deref());
    }

    /// PROPERTY: the same file always gets the same decision.
    #[test]
    fn property_classify_is_deterministic(
        path in project_path(),
        content in proptest::option::of(".{0,64}"),
    ) {
        let filter = ProductionFilter::new();
        let first = filter.classify(&path, content.as_deref());
        let second = filter.classify(&path, content.as_deref());
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: the decision only depends on the normalized path.
    #[test]
    fn property_spelling_of_path_does_not_matter(path in project_path()) {
        let filter = ProductionFilter::new();
        let plain = filter.classify(&path, None);
        let dotted = filter.classify(&format!("./{}", path), None);
        let windows = filter.classify(&path.replace('/', "\\"), None);
        prop_assert_eq!(&plain, &dotted);
        prop_assert_eq!(&plain, &windows);
    }

    /// PROPERTY: the editor marker excludes any file that would otherwise ship.
    #[test]
    fn property_marker_always_excludes(path in project_path()) {
        let filter = ProductionFilter::new();
        let decision = filter.classify(&path, Some("// @editor-only\nexport {}\n"));
        prop_assert!(!decision.include);
    }

    /// PROPERTY: batch stats add up and every file lands in exactly one bucket.
    #[test]
    fn property_batch_stats_add_up(paths in proptest::collection::vec(project_path(), 0..32)) {
        let files: Vec<FileInput> = paths.iter().map(FileInput::new).collect();
        let batch = ProductionFilter::new().classify_batch(files);

        prop_assert_eq!(batch.stats.total, paths.len());
        prop_assert_eq!(batch.stats.included, batch.included.len());
        prop_assert_eq!(batch.stats.excluded, batch.excluded.len());
        prop_assert_eq!(batch.stats.included + batch.stats.excluded, batch.stats.total);
        prop_assert_eq!(batch.stats.by_rule.values().sum::<usize>(), batch.stats.total);
        prop_assert!(batch.included.iter().all(|c| c.decision.include));
        prop_assert!(batch.excluded.iter().all(|c| !c.decision.include));
        // Without user patterns, only site content ships.
        prop_assert!(batch
            .included
            .iter()
            .all(|c| c.decision.rule == FilterRule::SiteContent));
    }
}
