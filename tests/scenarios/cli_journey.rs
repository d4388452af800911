//! Scenario: checking a site from the command line before publishing
//!
//! Journey:
//! 1. Owner keeps `siteforge.toml` in the editor checkout
//! 2. Asks which project files would ship
//! 3. Previews the document with an SEO override file
//! 4. Dry-runs the deploy and gets the same fingerprint
//!
//! Success Criteria:
//! - No credentials are needed for any step
//! - The document on disk is never rewritten by a dry run

use serde_json::{json, Value};

use crate::common::*;

const CONFIG: &str = r#"
[source_control]
owner = "acme"
repo = "bakery"

[project]
root = "."

[filter]
exclude = ["public/drafts/**"]
"#;

fn data(result: &TestResult) -> Value {
    assert!(result.success, "stderr:\n{}", result.stderr);
    result.envelope()["data"].clone()
}

/// SCENARIO: classify, preview and dry-run without credentials
#[test]
fn scenario_check_before_publish() {
    // Step 1
    let env = TestEnv::new();
    write_editor_project(env.project_root.path());
    env.write("public/drafts/menu.png", "draft");
    env.write("public/logo.svg", "<svg/>");
    env.write("siteforge.toml", CONFIG);
    env.write("site.json", BAKERY_SITE);
    env.write(
        "seo.json",
        r#"{ "about": { "title": "About the bakery" } }"#,
    );

    // Step 2
    let files: Vec<Value> = ["public/logo.svg", "public/drafts/menu.png", "src/app/editor/page.tsx"]
        .iter()
        .map(|p| json!({ "path": p }))
        .collect();
    env.write("files.json", &serde_json::to_string(&files).unwrap());
    let report = data(&env.run(&["classify", "--from", "files.json", "--json"]));
    assert_eq!(report["stats"]["included"], json!(1));
    assert_eq!(report["included"][0]["file"]["path"], json!("public/logo.svg"));
    let rules: Vec<&str> = report["excluded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["decision"]["rule"].as_str().unwrap())
        .collect();
    assert_eq!(rules, ["config-pattern", "editor-ui"]);

    // Step 3
    let preview = data(&env.run(&["preview", "site.json", "--seo", "seo.json", "--json"]));
    assert!(preview["files"]
        .as_array()
        .unwrap()
        .contains(&json!("public/logo.svg")));
    assert!(!preview["files"]
        .as_array()
        .unwrap()
        .contains(&json!("public/drafts/menu.png")));

    // Step 4
    let before = env.read("site.json");
    let dry = data(&env.run(&[
        "deploy",
        "site.json",
        "--seo",
        "seo.json",
        "--target",
        "production",
        "--dry-run",
        "--json",
    ]));
    assert_eq!(dry["fingerprint"], preview["fingerprint"]);
    assert_eq!(dry["commit"], Value::Null);
    assert_eq!(env.read("site.json"), before);
}
