//! Page generator contracts
//!
//! Output is a pure function of the document: stable paths, stable bytes.

use siteforge::domain::entities::{ComponentInstance, GeneratedFile, Page, WebsiteDocument};
use siteforge::domain::services::{GenerationError, PageGenerator, SeoOverrides, GENERATED_HEADER};
use siteforge::SeoMetadata;

use crate::common::{bakery_document, BAKERY_SITE};

fn generate(document: &WebsiteDocument) -> Vec<GeneratedFile> {
    PageGenerator::default()
        .generate(document, &SeoOverrides::new())
        .unwrap()
}

fn file<'a>(files: &'a [GeneratedFile], path: &str) -> &'a GeneratedFile {
    files
        .iter()
        .find(|f| f.path().as_str() == path)
        .unwrap_or_else(|| panic!("{path} not generated"))
}

/// CONTRACT: paths follow document order, with the index last.
#[test]
fn contract_output_paths() {
    let files = generate(&bakery_document());
    let paths: Vec<&str> = files.iter().map(|f| f.path().as_str()).collect();
    assert_eq!(
        paths,
        [
            "src/data/pages/index.ts",
            "src/app/page.tsx",
            "src/data/pages/about.ts",
            "src/app/about/page.tsx",
            "src/data/pages/_index.ts",
        ]
    );
}

/// CONTRACT: every generated file starts with the generated header.
#[test]
fn contract_generated_header() {
    for file in generate(&bakery_document()) {
        assert!(
            file.content().starts_with(GENERATED_HEADER),
            "{} lacks the header",
            file.path()
        );
    }
}

/// CONTRACT: the JSON export and the API-built document compile the same.
#[test]
fn contract_wire_document_compiles_like_api_document() {
    let wire: WebsiteDocument = serde_json::from_str(BAKERY_SITE).unwrap();
    assert_eq!(wire.current_version_number, 2);

    let files = generate(&wire);
    let about = file(&files, "src/data/pages/about.ts");
    assert!(about.content().contains("\"Wood fired\""));
    assert!(about.content().contains("\"route\": \"/about\""));
}

#[test]
fn contract_page_index_snapshot() {
    let files = generate(&bakery_document());
    insta::assert_snapshot!(file(&files, "src/data/pages/_index.ts").content(), @r#"
    // Generated by siteforge from the website document. Do not edit.

    import page0 from "./index";
    import page1 from "./about";

    export const pages = {
      "/": page0,
      "/about": page1,
    } as const;

    export default pages;
    "#);
}

#[test]
fn contract_route_module_imports_its_data() {
    let files = generate(&bakery_document());
    let module = file(&files, "src/app/about/page.tsx").content();

    assert!(module.contains("import PageRenderer from \"@/components/PageRenderer\";\n"));
    assert!(module.contains("import pageData from \"../../data/pages/about\";\n"));
    assert!(module.contains("\"title\": \"About\""));
    assert!(module.ends_with(
        "export default function Page() {\n  return <PageRenderer components={pageData.components} />;\n}\n"
    ));
}

/// CONTRACT: defaults fill missing props; explicit values win.
#[test]
fn contract_defaults_fill_missing_props() {
    let files = generate(&bakery_document());
    let home = file(&files, "src/data/pages/index.ts").content();

    assert!(home.contains("\"title\": \"Fresh bread daily\""));
    assert!(home.contains("\"ctaText\": \"Get started\""));
    assert!(home.contains("\"id\": \"index-1\""));
}

/// CONTRACT: overrides replace document SEO field by field.
#[test]
fn contract_seo_overrides_apply_per_field() {
    let mut overrides = SeoOverrides::new();
    overrides.insert(
        "home".to_string(),
        SeoMetadata {
            description: Some("Sourdough since 1952".to_string()),
            ..SeoMetadata::default()
        },
    );
    overrides.insert("missing".to_string(), SeoMetadata::default());

    let files = PageGenerator::default()
        .generate(&bakery_document(), &overrides)
        .unwrap();
    let module = file(&files, "src/app/page.tsx").content();
    assert!(module.contains("\"title\": \"Acme Bakery\""));
    assert!(module.contains("\"description\": \"Sourdough since 1952\""));
}

/// CONTRACT: an unknown component fails the whole pass, naming the page.
#[test]
fn contract_unknown_component_fails_generation() {
    let document = bakery_document().with_page(
        "gallery",
        Page::new(vec![ComponentInstance::new("Carousel")]),
    );
    let err = PageGenerator::default()
        .generate(&document, &SeoOverrides::new())
        .unwrap_err();

    assert!(matches!(err, GenerationError::UnknownComponent { .. }));
    assert_eq!(err.page(), Some("gallery"));
    assert_eq!(err.component_index(), Some(0));
}

/// CONTRACT: two keys normalizing to one route are rejected.
#[test]
fn contract_route_collision_is_rejected() {
    let document = WebsiteDocument::new()
        .with_page("About Us", Page::default())
        .with_page("about-us", Page::default());
    let err = PageGenerator::default()
        .generate(&document, &SeoOverrides::new())
        .unwrap_err();
    assert!(matches!(err, GenerationError::RouteCollision { .. }));
}

/// CONTRACT: an empty site still produces an index.
#[test]
fn contract_empty_document_yields_only_the_index() {
    let files = generate(&WebsiteDocument::new());
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path().as_str(), "src/data/pages/_index.ts");
}
