//! Version History Use Case
//!
//! Lists the deployed versions of a branch, newest first. Version numbers are
//! derived from position within the fetched page (`total - index`), so they
//! are relative: asking for a different page size renumbers the same commits.

use thiserror::Error;
use tracing::instrument;

use crate::domain::entities::VersionRecord;
use crate::domain::ports::{RepoRef, SourceControl, SourceControlError};

/// GitHub caps a commits page at 100 entries.
pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_PER_PAGE: u32 = 30;

/// The version list could not be fetched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to fetch versions: {message}")]
pub struct VersionFetchError {
    /// Upstream HTTP status, when the remote answered
    pub status: Option<u16>,
    pub message: String,
}

impl VersionFetchError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

impl From<SourceControlError> for VersionFetchError {
    fn from(err: SourceControlError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Version history use case
pub struct VersionHistory<SC: SourceControl> {
    source_control: SC,
    repo: RepoRef,
}

impl<SC: SourceControl> VersionHistory<SC> {
    pub fn new(source_control: SC, repo: RepoRef) -> Self {
        Self {
            source_control,
            repo,
        }
    }

    /// Versions on `branch`, newest first. `per_page` is clamped to 1..=100.
    #[instrument(skip(self), fields(repo = %self.repo))]
    pub fn list_versions(
        &self,
        branch: &str,
        per_page: u32,
    ) -> Result<Vec<VersionRecord>, VersionFetchError> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let commits = self
            .source_control
            .list_commits(&self.repo, branch, per_page)
            .map_err(|err| {
                tracing::warn!(error = %err, "version history fetch failed");
                VersionFetchError::from(err)
            })?;
        tracing::debug!(count = commits.len(), "versions fetched");
        Ok(VersionRecord::number_page(commits))
    }
}
