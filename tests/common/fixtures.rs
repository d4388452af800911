//! Reusable test content.

use siteforge::{ComponentInstance, Page, SeoMetadata, WebsiteDocument};
use serde_json::json;

/// A small bakery site as the editor exports it.
pub const BAKERY_SITE: &str = r##"{
  "pages": {
    "home": {
      "components": [
        { "type": "Navbar", "props": { "brandName": "Acme Bakery" } },
        {
          "type": "Hero",
          "props": {
            "title": "Fresh bread daily",
            "images.main": "/img/loaf.jpg",
            "background": { "from": "#fde68a", "to": "#f59e0b" }
          }
        }
      ],
      "seoMetadata": { "title": "Acme Bakery", "description": "Baked every morning" }
    },
    "about": {
      "components": [
        {
          "type": "Features",
          "props": {
            "heading": "Our ovens",
            "items": [{ "title": "Wood fired" }, { "title": "Stone floor" }]
          }
        }
      ]
    }
  },
  "currentVersionNumber": 2
}"##;

/// A document whose second page uses an unregistered component.
pub const BROKEN_SITE: &str = r#"{
  "pages": {
    "home": { "components": [{ "type": "Hero", "props": {} }] },
    "about": { "components": [{ "type": "Carousel", "props": {} }] }
  }
}"#;

/// Files of an editor project checkout: site sources mixed with the editor.
pub const EDITOR_PROJECT: &[(&str, &str)] = &[
    ("package.json", "{ \"name\": \"bakery\" }\n"),
    ("next.config.js", "module.exports = {};\n"),
    ("src/app/layout.tsx", "export default function Layout() { return null; }\n"),
    ("src/components/PageRenderer.tsx", "export default function PageRenderer() { return null; }\n"),
    ("src/app/api/chat/route.ts", "export async function POST() {}\n"),
    ("src/app/editor/page.tsx", "export default function Editor() { return null; }\n"),
    ("src/lib/github/client.ts", "export const client = {};\n"),
    ("src/components/Inspector.tsx", "// @editor-only\nexport default function Inspector() { return null; }\n"),
    ("README.md", "# Bakery editor\n"),
];

/// Editor files that must never ship to production.
pub const EDITOR_ONLY_PATHS: &[&str] = &[
    "src/app/api/chat/route.ts",
    "src/app/editor/page.tsx",
    "src/lib/github/client.ts",
    "src/components/Inspector.tsx",
    "README.md",
];

/// The bakery site built through the API.
pub fn bakery_document() -> WebsiteDocument {
    WebsiteDocument::new()
        .with_page(
            "home",
            Page::new(vec![
                ComponentInstance::new("Navbar").with_prop("brandName", json!("Acme Bakery")),
                ComponentInstance::new("Hero").with_prop("title", json!("Fresh bread daily")),
            ])
            .with_seo(SeoMetadata {
                title: Some("Acme Bakery".to_string()),
                description: Some("Baked every morning".to_string()),
                ..SeoMetadata::default()
            }),
        )
        .with_page(
            "about",
            Page::new(vec![
                ComponentInstance::new("Features").with_prop("heading", json!("Our ovens"))
            ]),
        )
}

/// Write `EDITOR_PROJECT` into `root`.
pub fn write_editor_project(root: &std::path::Path) {
    for (path, content) in EDITOR_PROJECT {
        let full = root.join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }
}
