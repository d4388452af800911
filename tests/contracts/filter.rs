//! Production filter contracts
//!
//! Editor-only code never ships; site content always does.

use siteforge::domain::policies::{FileInput, FilterRule, ProductionFilter};

use crate::common::{EDITOR_ONLY_PATHS, EDITOR_PROJECT};

/// CONTRACT: every editor API namespace is excluded, with or without `src/`.
#[test]
fn contract_editor_api_routes_never_ship() {
    let filter = ProductionFilter::new();
    for path in [
        "src/app/api/chat/route.ts",
        "app/api/deploy/route.ts",
        "src/app/api/vector-search/route.ts",
        "src/app/api/images/upload/route.ts",
    ] {
        let decision = filter.classify(path, None);
        assert!(!decision.include, "{path} shipped");
        assert_eq!(decision.rule, FilterRule::EditorApi, "{path}");
    }
}

/// CONTRACT: public API routes of the site itself ship.
#[test]
fn contract_site_api_routes_ship() {
    let filter = ProductionFilter::new();
    let decision = filter.classify("src/app/api/contact/route.ts", None);
    assert!(decision.include);
    assert_eq!(decision.rule, FilterRule::SiteContent);
}

/// CONTRACT: namespaces match whole segments only.
#[test]
fn contract_namespace_prefix_is_not_a_match() {
    let filter = ProductionFilter::new();
    assert!(filter.classify("src/app/api/chatter/route.ts", None).include);
    assert!(filter.classify("src/app/editorial/page.tsx", None).include);
}

/// CONTRACT: the marker pins a file to the editor, but only near the top.
#[test]
fn contract_editor_marker_excludes() {
    let filter = ProductionFilter::new();
    let marked = filter.classify(
        "src/components/Inspector.tsx",
        Some("// @editor-only\nexport default function Inspector() {}\n"),
    );
    assert!(!marked.include);
    assert_eq!(marked.rule, FilterRule::EditorMarker);

    let late = format!("{}// @editor-only\n", "// filler\n".repeat(10));
    assert!(filter.classify("src/components/Footer.tsx", Some(&late)).include);
}

/// CONTRACT: paths escaping the root are always excluded, never an error.
#[test]
fn contract_path_escape_is_excluded() {
    let filter = ProductionFilter::new();
    for path in ["../secrets.env", "src/../../etc/passwd", ""] {
        let decision = filter.classify(path, None);
        assert!(!decision.include, "{path:?} shipped");
        assert_eq!(decision.rule, FilterRule::PathEscape);
    }
}

/// CONTRACT: root build files ship; stray root files do not.
#[test]
fn contract_root_files() {
    let filter = ProductionFilter::new();
    for path in ["package.json", "next.config.mjs", "tailwind.config.ts", "middleware.ts"] {
        assert!(filter.classify(path, None).include, "{path} dropped");
    }
    for path in ["notes.txt", "deploy.sh", "docs/setup.md", "README.md"] {
        let decision = filter.classify(path, None);
        assert!(!decision.include, "{path} shipped");
        assert_eq!(decision.rule, FilterRule::NonProject, "{path}");
    }
}

/// CONTRACT: the first matching rule decides.
#[test]
fn contract_first_match_wins() {
    let filter = ProductionFilter::with_patterns(&["src/app/api/**"], &[] as &[&str]).unwrap();
    // The editor API rule precedes configured patterns.
    let decision = filter.classify("src/app/api/chat/route.ts", None);
    assert!(!decision.include);
    assert_eq!(decision.rule, FilterRule::EditorApi);

    // A configured include precedes the non-project rule.
    let filter = ProductionFilter::with_patterns(&["docs/public/**"], &[] as &[&str]).unwrap();
    let decision = filter.classify("docs/public/terms.md", None);
    assert!(decision.include);
    assert_eq!(decision.rule, FilterRule::ConfigPattern);
}

/// CONTRACT: a path matching both an include and an exclude pattern is
/// excluded and flagged.
#[test]
fn contract_conflicting_patterns_exclude_and_report() {
    let filter =
        ProductionFilter::with_patterns(&["src/app/admin/**"], &["src/app/admin/**"]).unwrap();
    let decision = filter.classify("src/app/admin/page.tsx", None);
    assert!(!decision.include);
    let error = decision.config_error.expect("conflict is reported");
    assert_eq!(error.path, "src/app/admin/page.tsx");
}

/// CONTRACT: the batch keeps input order and its stats add up.
#[test]
fn contract_batch_partitions_the_project() {
    let filter = ProductionFilter::new();
    let files: Vec<FileInput> = EDITOR_PROJECT
        .iter()
        .map(|(path, content)| FileInput::new(*path).with_content(*content))
        .collect();

    let batch = filter.classify_batch(files);

    let excluded: Vec<&str> = batch.excluded.iter().map(|c| c.file.path.as_str()).collect();
    assert_eq!(excluded, EDITOR_ONLY_PATHS);
    let included: Vec<&str> = batch.included.iter().map(|c| c.file.path.as_str()).collect();
    assert_eq!(
        included,
        [
            "package.json",
            "next.config.js",
            "src/app/layout.tsx",
            "src/components/PageRenderer.tsx"
        ]
    );
    assert_eq!(batch.stats.total, EDITOR_PROJECT.len());
    assert_eq!(batch.stats.included + batch.stats.excluded, batch.stats.total);
    assert_eq!(batch.stats.by_rule.values().sum::<usize>(), batch.stats.total);
}

/// CONTRACT: the rule order is fixed.
#[test]
fn contract_rule_order() {
    assert_eq!(
        ProductionFilter::rule_order(),
        vec![
            FilterRule::PathEscape,
            FilterRule::EditorApi,
            FilterRule::EditorUi,
            FilterRule::DeployInfra,
            FilterRule::ConfigPattern,
            FilterRule::NonProject,
            FilterRule::EditorMarker,
            FilterRule::SiteContent,
        ]
    );
}
