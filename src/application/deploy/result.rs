//! Deploy Result
//!
//! Result types for deploy operations.

use serde::Serialize;

use crate::domain::policies::{FilterRule, FilterStats};
use crate::domain::value_objects::{ContentHash, DeployPhase, DeployTarget};

/// A candidate kept out of the deployment (or, for previews, one that would be).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedFile {
    pub path: String,
    pub rule: FilterRule,
    pub reason: String,
}

/// Identifiers of a created commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub id: String,
    pub url: String,
}

/// Identifiers of a hosting deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentInfo {
    pub id: String,
    pub url: String,
}

/// Result of a deploy operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    pub target: DeployTarget,
    pub branch: String,
    pub dry_run: bool,
    /// Terminal phase reached
    pub phase: DeployPhase,
    /// Files that ship (or would ship), sorted by path
    pub files: Vec<String>,
    /// Files the filter excluded; for previews these are reported but kept
    pub excluded: Vec<ExcludedFile>,
    pub stats: FilterStats,
    /// Hash of the retained file set; equal between preview and deploy of the
    /// same input
    pub fingerprint: ContentHash,
    /// Files written by the commit
    pub written: Vec<String>,
    /// Stale generated files the commit removed from the branch
    pub deleted: Vec<String>,
    /// Files already identical on the branch
    pub unchanged: usize,
    /// True when the branch already held this exact content
    pub no_changes: bool,
    pub commit: Option<CommitInfo>,
    pub deployment: Option<DeploymentInfo>,
    /// Version number after this deploy
    pub version_number: u64,
}

impl DeployResult {
    pub fn is_success(&self) -> bool {
        self.phase == DeployPhase::Succeeded
    }

    pub fn has_changes(&self) -> bool {
        self.commit.is_some()
    }

    pub fn url(&self) -> Option<&str> {
        self.deployment.as_ref().map(|d| d.url.as_str())
    }
}

/// Result of re-publishing a branch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepublishResult {
    pub target: DeployTarget,
    pub branch: String,
    pub deployment: DeploymentInfo,
}

/// A hosting project created by bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Result of bootstrapping a new editor instance
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapResult {
    /// The dry-run pipeline output for the initial document
    pub preview: DeployResult,
    pub project: ProjectInfo,
}
