//! Property tests for page generation.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use serde_json::json;

use siteforge::domain::services::SeoOverrides;
use siteforge::{ComponentInstance, Page, PageGenerator, SeoMetadata, WebsiteDocument};

fn page_keys() -> impl Strategy<Value = BTreeSet<String>> {
    // "home" and "index" share the root route.
    proptest::collection::btree_set("[a-z][a-z0-9]{0,7}", 0..6)
        .prop_map(|keys| keys.into_iter().filter(|k| k != "home").collect())
}

fn document() -> impl Strategy<Value = WebsiteDocument> {
    (page_keys(), ".{0,24}", proptest::option::of(".{0,24}")).prop_map(|(keys, title, seo)| {
        keys.into_iter().fold(WebsiteDocument::new(), |doc, key| {
            let mut page = Page::new(vec![
                ComponentInstance::new("Hero").with_prop("title", json!(title.clone()))
            ]);
            if let Some(seo_title) = &seo {
                page = page.with_seo(SeoMetadata {
                    title: Some(seo_title.clone()),
                    ..SeoMetadata::default()
                });
            }
            doc.with_page(key, page)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: generating twice yields identical paths and bytes.
    #[test]
    fn property_generation_is_deterministic(doc in document()) {
        let generator = PageGenerator::default();
        let first = generator.generate(&doc, &SeoOverrides::new()).unwrap();
        let second = generator.generate(&doc, &SeoOverrides::new()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: one data file and one route module per page, plus the index.
    #[test]
    fn property_file_count_and_unique_paths(doc in document()) {
        let files = PageGenerator::default()
            .generate(&doc, &SeoOverrides::new())
            .unwrap();
        prop_assert_eq!(files.len(), doc.pages.len() * 2 + 1);

        let unique: HashSet<&str> = files.iter().map(|f| f.path().as_str()).collect();
        prop_assert_eq!(unique.len(), files.len());
    }

    /// PROPERTY: overrides for pages the document lacks change nothing.
    #[test]
    fn property_unknown_overrides_are_ignored(doc in document(), title in ".{0,24}") {
        let mut overrides = SeoOverrides::new();
        overrides.insert(
            "not a page".to_string(),
            SeoMetadata {
                title: Some(title),
                ..SeoMetadata::default()
            },
        );
        let generator = PageGenerator::default();
        let plain = generator.generate(&doc, &SeoOverrides::new()).unwrap();
        let overridden = generator.generate(&doc, &overrides).unwrap();
        prop_assert_eq!(plain, overridden);
    }
}
