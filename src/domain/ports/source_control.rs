//! Source Control Port
//!
//! The git remote that stores every deployed revision of the site. The
//! orchestrator writes through it and the version reader lists from it.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::domain::entities::{Commit, FileContent};
use crate::domain::value_objects::{BlobId, SitePath};

/// `owner/repo` on the remote.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse `owner/repo`.
    pub fn parse(s: &str) -> Option<Self> {
        let (owner, repo) = s.trim().split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self::new(owner, repo))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Every file at a branch head, as blob ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchSnapshot {
    /// Commit id the branch pointed at when the snapshot was taken
    pub head: String,
    pub blobs: BTreeMap<SitePath, BlobId>,
}

impl BranchSnapshot {
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            blobs: BTreeMap::new(),
        }
    }

    pub fn with_blob(mut self, path: SitePath, blob: BlobId) -> Self {
        self.blobs.insert(path, blob);
        self
    }

    pub fn blob(&self, path: &SitePath) -> Option<&BlobId> {
        self.blobs.get(path)
    }
}

/// What a commit does to one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// Add the file or replace its content
    Put(FileContent),
    /// Remove the file from the branch
    Delete,
}

/// One path changed by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub path: SitePath,
    pub change: FileChange,
}

impl FileWrite {
    pub fn put(path: SitePath, content: FileContent) -> Self {
        Self {
            path,
            change: FileChange::Put(content),
        }
    }

    pub fn delete(path: SitePath) -> Self {
        Self {
            path,
            change: FileChange::Delete,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self.change, FileChange::Delete)
    }
}

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    pub commit_id: String,
    pub url: String,
}

/// Source-control failures. All of them are transport-level from the
/// orchestrator's point of view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceControlError {
    #[error("not authorized for {repo} (HTTP {status}): {message}")]
    Unauthorized {
        repo: String,
        status: u16,
        message: String,
    },

    #[error("{what} not found")]
    NotFound { what: String },

    /// The branch moved between snapshot and write.
    #[error("branch '{branch}' moved: expected head {expected}")]
    HeadMoved { branch: String, expected: String },

    #[error("source control returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("source control request failed: {0}")]
    Transport(String),

    #[error("unexpected source control response: {0}")]
    InvalidResponse(String),
}

impl SourceControlError {
    /// Upstream HTTP status, when the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::HeadMoved { .. } => Some(409),
            Self::Transport(_) | Self::InvalidResponse(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Trait for source-control remotes
///
/// Implementations:
/// - `GitHubClient` - GitHub REST (git data API)
/// - in-memory fakes in tests
pub trait SourceControl: Send + Sync {
    /// The most recent `per_page` commits on `branch`, newest first.
    fn list_commits(
        &self,
        repo: &RepoRef,
        branch: &str,
        per_page: u32,
    ) -> Result<Vec<Commit>, SourceControlError>;

    /// Blob ids of every file at the branch head; `None` when the branch does
    /// not exist yet.
    fn snapshot(
        &self,
        repo: &RepoRef,
        branch: &str,
    ) -> Result<Option<BranchSnapshot>, SourceControlError>;

    /// Commit `files` on top of `expected_head` (or as the first commit of a
    /// new branch when `None`). Paths not named in `files` keep their content.
    /// Must fail with `HeadMoved` instead of overwriting a branch that
    /// advanced in the meantime.
    fn write_files(
        &self,
        repo: &RepoRef,
        branch: &str,
        expected_head: Option<&str>,
        files: &[FileWrite],
        message: &str,
    ) -> Result<CommitResult, SourceControlError>;
}

impl<T: SourceControl + ?Sized> SourceControl for std::sync::Arc<T> {
    fn list_commits(
        &self,
        repo: &RepoRef,
        branch: &str,
        per_page: u32,
    ) -> Result<Vec<Commit>, SourceControlError> {
        (**self).list_commits(repo, branch, per_page)
    }

    fn snapshot(
        &self,
        repo: &RepoRef,
        branch: &str,
    ) -> Result<Option<BranchSnapshot>, SourceControlError> {
        (**self).snapshot(repo, branch)
    }

    fn write_files(
        &self,
        repo: &RepoRef,
        branch: &str,
        expected_head: Option<&str>,
        files: &[FileWrite],
        message: &str,
    ) -> Result<CommitResult, SourceControlError> {
        (**self).write_files(repo, branch, expected_head, files, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_ref_parse() {
        assert_eq!(RepoRef::parse("acme/site"), Some(RepoRef::new("acme", "site")));
        assert_eq!(RepoRef::parse("acme"), None);
        assert_eq!(RepoRef::parse("/site"), None);
        assert_eq!(RepoRef::parse("a/b/c"), None);
        assert_eq!(RepoRef::new("acme", "site").to_string(), "acme/site");
    }

    #[test]
    fn error_status() {
        assert_eq!(
            SourceControlError::Unauthorized {
                repo: "a/b".into(),
                status: 401,
                message: "Bad credentials".into()
            }
            .status(),
            Some(401)
        );
        assert_eq!(SourceControlError::Transport("reset".into()).status(), None);
    }
}
