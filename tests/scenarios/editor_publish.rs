//! Scenario: a site owner publishes, edits and republishes
//!
//! Journey:
//! 1. Bootstrap a new instance: dry-run the initial document, provision hosting
//! 2. Check the preview environment
//! 3. Publish to production
//! 4. Edit one page and publish again
//! 5. Publish without edits
//! 6. Browse the version history
//!
//! Success Criteria:
//! - Each edit becomes exactly one numbered version
//! - Only files that changed are written
//! - Editor files never reach production

use std::sync::Arc;

use serde_json::json;
use siteforge::application::{BootstrapOptions, DeployOptions, VersionHistory};
use siteforge::domain::ports::{NoopEventSink, RepoRef};
use siteforge::{DeployPhase, DeployTarget};

use crate::common::*;

/// SCENARIO: from a fresh instance to three production versions
#[test]
fn scenario_publish_edit_and_browse_history() {
    let h = Harness::new();
    let mut document = bakery_document();
    document.current_version_number = 0;

    // Step 1: bootstrap touches no branch
    let boot = h
        .use_case
        .bootstrap(
            &document,
            &BootstrapOptions::new().with_custom_domain("bakery.example"),
            Arc::new(NoopEventSink),
        )
        .unwrap();
    assert!(boot.preview.dry_run);
    assert_eq!(boot.project.domain.as_deref(), Some("bakery.example"));
    assert_eq!(h.hosting.projects().len(), 1);
    assert_eq!(h.source_control.commit_count("main"), 0);

    // Step 2: the preview keeps the editor so it can be used in place
    let preview = h
        .use_case
        .execute(&document, &DeployOptions::new(DeployTarget::Preview))
        .unwrap();
    assert_eq!(preview.phase, DeployPhase::Succeeded);
    assert!(h
        .source_control
        .paths("preview")
        .contains(&"src/app/editor/page.tsx".to_string()));

    // Step 3: first production version
    let first = h
        .use_case
        .execute(&document, &DeployOptions::new(DeployTarget::Production))
        .unwrap();
    assert_eq!(first.version_number, 1);
    document.advance_version(first.version_number);
    for path in EDITOR_ONLY_PATHS {
        assert!(!h.source_control.paths("main").contains(&path.to_string()));
    }

    // Step 4: edit the hero title on the home page
    document.pages["home"].components[1]
        .props
        .insert("title".to_string(), json!("Sourdough on Sundays"));
    let second = h
        .use_case
        .execute(&document, &DeployOptions::new(DeployTarget::Production))
        .unwrap();
    assert_eq!(second.version_number, 2);
    assert!(second.written.contains(&"src/data/pages/index.ts".to_string()));
    assert!(!second.written.contains(&"src/app/about/page.tsx".to_string()));
    assert!(!second.written.contains(&"src/app/layout.tsx".to_string()));
    let home = h.source_control.file("main", "src/data/pages/index.ts").unwrap();
    assert!(String::from_utf8(home).unwrap().contains("Sourdough on Sundays"));
    document.advance_version(second.version_number);

    // Step 5: nothing changed, so no version either
    let third = h
        .use_case
        .execute(&document, &DeployOptions::new(DeployTarget::Production))
        .unwrap();
    assert!(third.no_changes);
    assert_eq!(third.version_number, 2);

    // Step 6: history numbers the newest commit highest
    let history = VersionHistory::new(h.source_control.clone(), RepoRef::new("acme", "bakery"));
    let versions = history.list_versions("main", 30).unwrap();
    let numbers: Vec<u64> = versions.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![2, 1]);
    assert!(versions[0].title().starts_with("Deploy v2"));
    assert_eq!(
        versions[0].commit_identifier,
        second.commit.as_ref().unwrap().id
    );
}

/// SCENARIO: an edit that breaks the document never reaches the branch
#[test]
fn scenario_broken_edit_is_rejected_before_commit() {
    let h = Harness::new();
    let document: siteforge::WebsiteDocument = serde_json::from_str(BROKEN_SITE).unwrap();

    let err = h
        .use_case
        .execute(&document, &DeployOptions::new(DeployTarget::Production))
        .unwrap_err();
    assert_eq!(err.phase, DeployPhase::Generating);
    assert!(err.commit_id.is_none());
    assert_eq!(h.source_control.commit_count("main"), 0);
    assert!(h.hosting.deployments().is_empty());
}
