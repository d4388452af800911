//! Deployment orchestrator contracts

use std::sync::Arc;

use siteforge::application::{DeployOptions, RepublishOptions};
use siteforge::domain::entities::FileContent;
use siteforge::domain::ports::NoopEventSink;
use siteforge::domain::ports::{FileWrite, HostingError, RepoRef, SourceControl, SourceControlError};
use siteforge::domain::value_objects::SitePath;
use siteforge::{DeployPhase, DeployTarget};

use crate::common::{bakery_document, Harness, EDITOR_ONLY_PATHS};

fn production() -> DeployOptions {
    DeployOptions::new(DeployTarget::Production)
}

/// CONTRACT: editor-only files never reach the production branch.
#[test]
fn contract_production_branch_holds_no_editor_files() {
    let h = Harness::new();
    let result = h.use_case.execute(&bakery_document(), &production()).unwrap();

    assert_eq!(result.phase, DeployPhase::Succeeded);
    let shipped = h.source_control.paths("main");
    for path in EDITOR_ONLY_PATHS {
        assert!(!shipped.contains(&path.to_string()), "{path} was committed");
        assert!(!result.files.contains(&path.to_string()));
    }
    assert!(shipped.contains(&"src/app/layout.tsx".to_string()));
    assert!(shipped.contains(&"src/data/pages/_index.ts".to_string()));
}

/// CONTRACT: a dry run reports exactly what the deploy then ships.
#[test]
fn contract_dry_run_matches_deploy() {
    let h = Harness::new();
    let document = bakery_document();

    let dry = h
        .use_case
        .execute(&document, &production().with_dry_run(true))
        .unwrap();
    assert_eq!(dry.phase, DeployPhase::Succeeded);
    assert!(dry.commit.is_none());
    assert_eq!(h.source_control.commit_count("main"), 0);
    assert!(h.hosting.deployments().is_empty());

    let real = h.use_case.execute(&document, &production()).unwrap();
    assert_eq!(dry.fingerprint, real.fingerprint);
    assert_eq!(dry.files, real.files);
    assert_eq!(dry.excluded, real.excluded);
}

/// CONTRACT: deploying unchanged input twice creates one commit.
#[test]
fn contract_redeploy_is_idempotent() {
    let h = Harness::new();
    let document = bakery_document();

    let first = h.use_case.execute(&document, &production()).unwrap();
    let second = h.use_case.execute(&document, &production()).unwrap();

    assert!(first.has_changes());
    assert!(second.no_changes);
    assert!(second.commit.is_none());
    assert_eq!(h.source_control.commit_count("main"), 1);
    assert_eq!(second.version_number, document.current_version_number);
    // The unchanged branch is still published.
    assert_eq!(h.hosting.deployments().len(), 2);
}

/// CONTRACT: a page removed from the document is removed from the branch.
#[test]
fn contract_removed_page_leaves_the_branch() {
    let h = Harness::new();
    let mut document = bakery_document();
    h.use_case.execute(&document, &production()).unwrap();
    assert!(h.source_control.paths("main").contains(&"src/app/about/page.tsx".to_string()));

    document.pages.shift_remove("about");
    let result = h.use_case.execute(&document, &production()).unwrap();

    assert_eq!(
        result.deleted,
        vec!["src/app/about/page.tsx", "src/data/pages/about.ts"]
    );
    assert!(result.written.contains(&"src/data/pages/_index.ts".to_string()));
    let shipped = h.source_control.paths("main");
    assert!(!shipped.contains(&"src/app/about/page.tsx".to_string()));
    assert!(!shipped.contains(&"src/data/pages/about.ts".to_string()));
    assert!(shipped.contains(&"src/app/page.tsx".to_string()));
    assert!(shipped.contains(&"src/app/layout.tsx".to_string()));
    assert_eq!(shipped, result.files);
}

/// CONTRACT: files the generator does not own survive a deploy.
#[test]
fn contract_deploy_keeps_files_it_does_not_own() {
    let h = Harness::new();
    let document = bakery_document();
    let first = h.use_case.execute(&document, &production()).unwrap();

    let head = first.commit.unwrap().id;
    h.source_control
        .write_files(
            &RepoRef::new("acme", "bakery"),
            "main",
            Some(&head),
            &[
                FileWrite::put(
                    SitePath::new("public/robots.txt").unwrap(),
                    FileContent::Text("User-agent: *\n".into()),
                ),
                FileWrite::put(
                    SitePath::new("src/app/specials/page.tsx").unwrap(),
                    FileContent::Text("export default function Specials() {}\n".into()),
                ),
            ],
            "hand edit",
        )
        .unwrap();

    let result = h.use_case.execute(&document, &production()).unwrap();

    // Only the stale route module needs changing, so this is not a no-op.
    assert!(!result.no_changes);
    assert!(result.written.is_empty());
    assert_eq!(result.deleted, vec!["src/app/specials/page.tsx"]);
    let shipped = h.source_control.paths("main");
    assert!(shipped.contains(&"public/robots.txt".to_string()));
    assert!(!shipped.contains(&"src/app/specials/page.tsx".to_string()));
}

/// CONTRACT: the version number moves by one per commit, never otherwise.
#[test]
fn contract_version_advances_only_on_commit() {
    let h = Harness::new();
    let mut document = bakery_document();
    document.current_version_number = 7;

    let result = h.use_case.execute(&document, &production()).unwrap();
    assert_eq!(result.version_number, 8);

    let dry = h
        .use_case
        .execute(&document, &production().with_dry_run(true))
        .unwrap();
    assert_eq!(dry.version_number, 7);
}

/// CONTRACT: a failed commit never publishes.
#[test]
fn contract_commit_failure_skips_publish() {
    let h = Harness::new();
    h.source_control.fail_next_write(SourceControlError::Transport("reset".into()));

    let err = h.use_case.execute(&bakery_document(), &production()).unwrap_err();
    assert_eq!(err.phase, DeployPhase::Committing);
    assert!(err.commit_id.is_none());
    assert!(h.hosting.deployments().is_empty());
}

/// CONTRACT: a failed publish keeps the commit and reports it.
#[test]
fn contract_publish_failure_keeps_commit() {
    let h = Harness::new();
    h.hosting.fail_next(HostingError::Transport("timed out".into()));

    let err = h.use_case.execute(&bakery_document(), &production()).unwrap_err();
    assert_eq!(err.phase, DeployPhase::Publishing);
    assert!(err.commit_id.is_some());
    assert_eq!(h.source_control.commit_count("main"), 1);

    let retried = h
        .use_case
        .republish(
            &RepublishOptions::new(DeployTarget::Production),
            Arc::new(NoopEventSink),
        )
        .unwrap();
    assert_eq!(retried.branch, "main");
    let deployments = h.hosting.deployments();
    assert_eq!(deployments.len(), 1);
    assert_eq!(deployments[0].branch, "main");
    // Republish deploys the branch head, which is still the failed attempt's commit.
    assert!(deployments[0].commit.is_none());
    assert_eq!(h.source_control.commit_count("main"), 1);
}

/// CONTRACT: previews keep editor files but report them.
#[test]
fn contract_preview_reports_without_dropping() {
    let h = Harness::new();
    let result = h
        .use_case
        .execute(&bakery_document(), &DeployOptions::new(DeployTarget::Preview))
        .unwrap();

    assert_eq!(result.branch, "preview");
    let reported: Vec<&str> = result.excluded.iter().map(|e| e.path.as_str()).collect();
    for path in EDITOR_ONLY_PATHS {
        assert!(reported.contains(path), "{path} not reported");
        assert!(result.files.contains(&path.to_string()), "{path} dropped");
    }
}
