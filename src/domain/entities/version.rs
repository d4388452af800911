//! Commits and the user-facing version records projected from them

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Length of the abbreviated commit id shown to users.
pub const SHORT_ID_LEN: usize = 7;

/// A commit as reported by the source-control remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub author: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub url: String,
}

/// One entry of the version list shown in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    /// Position-derived number; relative to the fetched page.
    pub version_number: u64,
    pub commit_identifier: String,
    pub short_identifier: String,
    pub message: String,
    pub author: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub url: String,
}

impl VersionRecord {
    /// Project a page of commits (newest first) into version records.
    ///
    /// The newest commit gets the highest number: `version = len - index`.
    /// Numbers are relative to the page, so a different page size renumbers
    /// the same commit.
    pub fn number_page(commits: Vec<Commit>) -> Vec<VersionRecord> {
        let total = commits.len() as u64;
        commits
            .into_iter()
            .enumerate()
            .map(|(index, commit)| VersionRecord::from_commit(commit, total - index as u64))
            .collect()
    }

    fn from_commit(commit: Commit, version_number: u64) -> Self {
        let short_identifier = commit.id.chars().take(SHORT_ID_LEN).collect();
        Self {
            version_number,
            commit_identifier: commit.id,
            short_identifier,
            message: commit.message,
            author: commit.author,
            timestamp: commit.timestamp,
            url: commit.url,
        }
    }

    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}
